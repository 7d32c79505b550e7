/// Saved searches
///
/// A search item is the query a user wants the scraper to run on their
/// behalf: free text, an optional price window and a set of tags. Every
/// per-user operation filters on `user_id` in SQL, so a row owned by
/// someone else behaves exactly like a missing one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE search_items (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     search_text TEXT NOT NULL,
///     min_price DOUBLE PRECISION,
///     max_price DOUBLE PRECISION,
///     tags TEXT[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::item::Item;

const COLUMNS: &str =
    "id, user_id, search_text, min_price, max_price, tags, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub id: Uuid,

    /// Owner
    pub user_id: Uuid,

    pub search_text: String,

    pub min_price: Option<f64>,

    pub max_price: Option<f64>,

    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// A search item together with the listings matched for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemWithItems {
    #[serde(flatten)]
    pub search_item: SearchItem,

    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub struct CreateSearchItem {
    pub user_id: Uuid,
    pub search_text: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub tags: Vec<String>,
}

/// Partial update; `None` leaves a field untouched
///
/// The price fields are doubly optional: `Some(None)` clears the bound.
#[derive(Debug, Clone, Default)]
pub struct UpdateSearchItem {
    pub search_text: Option<String>,
    pub min_price: Option<Option<f64>>,
    pub max_price: Option<Option<f64>>,
    pub tags: Option<Vec<String>>,
}

impl UpdateSearchItem {
    pub fn is_empty(&self) -> bool {
        self.search_text.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.tags.is_none()
    }
}

impl SearchItem {
    pub async fn create(pool: &PgPool, data: CreateSearchItem) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO search_items (user_id, search_text, min_price, max_price, tags)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, SearchItem>(&query)
            .bind(data.user_id)
            .bind(data.search_text)
            .bind(data.min_price)
            .bind(data.max_price)
            .bind(&data.tags)
            .fetch_one(pool)
            .await
    }

    /// Finds a search item only if `user_id` owns it
    pub async fn find_by_id_and_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM search_items WHERE id = $1 AND user_id = $2");

        sqlx::query_as::<_, SearchItem>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Unscoped lookup, for the scraper integration only
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM search_items WHERE id = $1");

        sqlx::query_as::<_, SearchItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a user's searches, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM search_items
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, SearchItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Every search of every user, oldest first
    ///
    /// Used by the scraper integration, which is not user-scoped.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM search_items ORDER BY created_at ASC, id ASC");

        sqlx::query_as::<_, SearchItem>(&query).fetch_all(pool).await
    }

    /// Loads searches by id, in no particular order
    pub async fn list_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {COLUMNS} FROM search_items WHERE id = ANY($1)");

        sqlx::query_as::<_, SearchItem>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Applies a partial update to a search owned by `user_id`
    ///
    /// Returns `None` when the row does not exist or belongs to someone else.
    pub async fn update_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        data: UpdateSearchItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE search_items SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.search_text.is_some() {
            bind_count += 1;
            query.push_str(&format!(", search_text = ${}", bind_count));
        }
        if data.min_price.is_some() {
            bind_count += 1;
            query.push_str(&format!(", min_price = ${}", bind_count));
        }
        if data.max_price.is_some() {
            bind_count += 1;
            query.push_str(&format!(", max_price = ${}", bind_count));
        }
        if data.tags.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tags = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, SearchItem>(&query)
            .bind(id)
            .bind(user_id);

        if let Some(search_text) = data.search_text {
            q = q.bind(search_text);
        }
        if let Some(min_price) = data.min_price {
            q = q.bind(min_price);
        }
        if let Some(max_price) = data.max_price {
            q = q.bind(max_price);
        }
        if let Some(tags) = data.tags {
            q = q.bind(tags);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a search owned by `user_id`, returning the removed row
    ///
    /// Its items are removed by the foreign key cascade.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "DELETE FROM search_items WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, SearchItem>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM search_items WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Attaches matched items to each search, preserving input order
    ///
    /// One query for all items regardless of how many searches are passed.
    pub async fn with_items(
        pool: &PgPool,
        searches: Vec<SearchItem>,
    ) -> Result<Vec<SearchItemWithItems>, sqlx::Error> {
        let ids: Vec<Uuid> = searches.iter().map(|s| s.id).collect();
        let items = Item::list_by_search_items(pool, &ids).await?;

        Ok(group_items(searches, items))
    }
}

/// Distributes `items` over their parent searches
fn group_items(searches: Vec<SearchItem>, items: Vec<Item>) -> Vec<SearchItemWithItems> {
    let mut by_search: HashMap<Uuid, Vec<Item>> = HashMap::new();
    for item in items {
        by_search.entry(item.search_item_id).or_default().push(item);
    }

    searches
        .into_iter()
        .map(|search_item| {
            let items = by_search.remove(&search_item.id).unwrap_or_default();
            SearchItemWithItems { search_item, items }
        })
        .collect()
}
