/// Integration tests for schema migrations
///
/// Skipped unless DATABASE_URL points at a PostgreSQL server.

mod common;

use common::migrated_pool;
use fastvinted_shared::db::migrations::{get_migration_status, run_migrations, MIGRATOR};
use fastvinted_shared::db::pool::close_pool;

#[tokio::test]
async fn test_migrations_reach_latest_version() {
    let Some(pool) = migrated_pool().await else { return };

    let status = get_migration_status(&pool).await.expect("Failed to read status");

    assert_eq!(status.applied_migrations, MIGRATOR.iter().count());
    assert!(status.is_up_to_date);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(pool) = migrated_pool().await else { return };

    let before = get_migration_status(&pool).await.expect("Failed to read status");
    run_migrations(&pool).await.expect("Second run failed");
    let after = get_migration_status(&pool).await.expect("Failed to read status");

    assert_eq!(before, after);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_expected_tables_exist() {
    let Some(pool) = migrated_pool().await else { return };

    for table in ["users", "search_items", "items", "discord_webhooks"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = current_schema() AND table_name = $1
            )",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .expect("Query failed");

        assert!(exists, "table {} should exist", table);
    }

    close_pool(pool).await;
}
