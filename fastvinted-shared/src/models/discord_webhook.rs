/// Discord webhook URLs
///
/// Each user has at most one webhook, enforced by a unique constraint on
/// `user_id`. Only the URL is stored; posting notifications is the
/// scraper's job.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE discord_webhooks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
///     url TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DiscordWebhook {
    pub id: Uuid,

    pub user_id: Uuid,

    pub url: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl DiscordWebhook {
    /// Creates the user's webhook, or replaces its URL if one exists
    ///
    /// Single statement, so two concurrent calls still leave one row.
    pub async fn upsert(pool: &PgPool, user_id: Uuid, url: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, DiscordWebhook>(
            r#"
            INSERT INTO discord_webhooks (user_id, url)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET url = EXCLUDED.url, updated_at = NOW()
            RETURNING id, user_id, url, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(url)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, DiscordWebhook>(
            r#"
            SELECT id, user_id, url, created_at, updated_at
            FROM discord_webhooks
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// All configured webhooks, for the scraper integration
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DiscordWebhook>(
            r#"
            SELECT id, user_id, url, created_at, updated_at
            FROM discord_webhooks
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM discord_webhooks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
