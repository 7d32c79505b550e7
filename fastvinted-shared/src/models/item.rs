/// Marketplace listings matched by the scraper
///
/// Items carry no owner column of their own. Ownership is always resolved
/// through the parent search item, so every user-facing query joins
/// `search_items` and filters on its `user_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE items (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     search_item_id UUID NOT NULL REFERENCES search_items(id) ON DELETE CASCADE,
///     name TEXT NOT NULL,
///     price DOUBLE PRECISION NOT NULL,
///     size TEXT NOT NULL,
///     condition TEXT NOT NULL,
///     seller_name TEXT NOT NULL,
///     image_url TEXT NOT NULL,
///     url TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (search_item_id, url)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use super::search_item::SearchItem;
use crate::pagination::ListParams;

/// Item columns qualified with the `i` alias used by every query here
const COLUMNS: &str = "i.id, i.search_item_id, i.name, i.price, i.size, i.condition, \
                       i.seller_name, i.image_url, i.url, i.created_at, i.updated_at";

/// Insert, then read-back, at most this many times in `create_if_absent`
const INSERT_ATTEMPTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,

    pub search_item_id: Uuid,

    pub name: String,

    pub price: f64,

    pub size: String,

    pub condition: String,

    pub seller_name: String,

    pub image_url: String,

    /// Listing page on the marketplace
    pub url: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// An item with its parent search embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithSearchItem {
    #[serde(flatten)]
    pub item: Item,

    pub search_item: SearchItem,
}

#[derive(Debug, Clone)]
pub struct CreateItem {
    pub search_item_id: Uuid,
    pub name: String,
    pub price: f64,
    pub size: String,
    pub condition: String,
    pub seller_name: String,
    pub image_url: String,
    pub url: String,
}

impl Item {
    /// Records a listing unless the same url is already stored for the search
    ///
    /// Returns the row and whether it was newly inserted. Relies on the
    /// `(search_item_id, url)` unique constraint, so concurrent submissions
    /// of the same listing still produce a single row. If the conflicting
    /// row is deleted before it can be read back, the insert is retried.
    pub async fn create_if_absent(
        pool: &PgPool,
        data: CreateItem,
    ) -> Result<(Self, bool), sqlx::Error> {
        for _ in 0..INSERT_ATTEMPTS {
            if let Some(item) = Self::insert_new(pool, &data).await? {
                return Ok((item, true));
            }

            if let Some(existing) = Self::find_by_url(pool, data.search_item_id, &data.url).await? {
                return Ok((existing, false));
            }
        }

        Err(sqlx::Error::RowNotFound)
    }

    /// `None` when the url is already stored for the search
    async fn insert_new(pool: &PgPool, data: &CreateItem) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "INSERT INTO items AS i
                 (search_item_id, name, price, size, condition, seller_name, image_url, url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (search_item_id, url) DO NOTHING
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Item>(&query)
            .bind(data.search_item_id)
            .bind(&data.name)
            .bind(data.price)
            .bind(&data.size)
            .bind(&data.condition)
            .bind(&data.seller_name)
            .bind(&data.image_url)
            .bind(&data.url)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_url(
        pool: &PgPool,
        search_item_id: Uuid,
        url: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items i WHERE i.search_item_id = $1 AND i.url = $2");

        sqlx::query_as::<_, Item>(&query)
            .bind(search_item_id)
            .bind(url)
            .fetch_optional(pool)
            .await
    }

    /// Finds an item only if its parent search belongs to `user_id`
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items i
             JOIN search_items s ON s.id = i.search_item_id
             WHERE i.id = $1 AND s.user_id = $2"
        );

        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// One page of all items under any of the user's searches
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        params: &ListParams,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items i
             JOIN search_items s ON s.id = i.search_item_id
             WHERE s.user_id = $1
             ORDER BY {order}
             LIMIT $2 OFFSET $3",
            order = params.order_by_clause("i")
        );

        sqlx::query_as::<_, Item>(&query)
            .bind(user_id)
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    /// One page of the items under a single search
    ///
    /// Callers check ownership of the search first.
    pub async fn list_for_search_item(
        pool: &PgPool,
        search_item_id: Uuid,
        params: &ListParams,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items i
             WHERE i.search_item_id = $1
             ORDER BY {order}
             LIMIT $2 OFFSET $3",
            order = params.order_by_clause("i")
        );

        sqlx::query_as::<_, Item>(&query)
            .bind(search_item_id)
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    /// Every item under the given searches, newest first
    pub async fn list_by_search_items(
        pool: &PgPool,
        search_item_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        if search_item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM items i
             WHERE i.search_item_id = ANY($1)
             ORDER BY i.created_at DESC, i.id DESC"
        );

        sqlx::query_as::<_, Item>(&query)
            .bind(search_item_ids)
            .fetch_all(pool)
            .await
    }

    /// Total items across all of the user's searches
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM items i
             JOIN search_items s ON s.id = i.search_item_id
             WHERE s.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Items under one search; zero when the search is not the user's
    pub async fn count_for_search_item(
        pool: &PgPool,
        user_id: Uuid,
        search_item_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM items i
             JOIN search_items s ON s.id = i.search_item_id
             WHERE s.user_id = $1 AND i.search_item_id = $2",
        )
        .bind(user_id)
        .bind(search_item_id)
        .fetch_one(pool)
        .await
    }

    /// Deletes an item owned (through its search) by `user_id`
    pub async fn delete_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "DELETE FROM items i
             USING search_items s
             WHERE i.id = $1 AND s.id = i.search_item_id AND s.user_id = $2
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Embeds each item's parent search
    ///
    /// Items whose search vanished between the two queries are dropped.
    pub async fn attach_search_items(
        pool: &PgPool,
        items: Vec<Item>,
    ) -> Result<Vec<ItemWithSearchItem>, sqlx::Error> {
        let mut ids: Vec<Uuid> = items.iter().map(|i| i.search_item_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let searches = SearchItem::list_by_ids(pool, &ids).await?;

        Ok(join_search_items(items, searches))
    }
}

fn join_search_items(items: Vec<Item>, searches: Vec<SearchItem>) -> Vec<ItemWithSearchItem> {
    let by_id: HashMap<Uuid, SearchItem> = searches.into_iter().map(|s| (s.id, s)).collect();

    items
        .into_iter()
        .filter_map(|item| {
            by_id.get(&item.search_item_id).cloned().map(|search_item| ItemWithSearchItem {
                item,
                search_item,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search() -> SearchItem {
        SearchItem {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            search_text: "levis 501".to_string(),
            min_price: None,
            max_price: Some(40.0),
            tags: vec!["jeans".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(search_item_id: Uuid) -> Item {
        Item {
            id: Uuid::new_v4(),
            search_item_id,
            name: "Levi's 501".to_string(),
            price: 30.5,
            size: "W32".to_string(),
            condition: "Bon état".to_string(),
            seller_name: "jdoe".to_string(),
            image_url: "https://images.example.com/501.jpg".to_string(),
            url: "https://www.vinted.fr/items/501".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_item_wire_shape() {
        let json = serde_json::to_value(item(Uuid::new_v4())).unwrap();

        assert_eq!(json["sellerName"], "jdoe");
        assert_eq!(json["imageUrl"], "https://images.example.com/501.jpg");
        assert!(json["searchItemId"].is_string());
        assert_eq!(json["price"], 30.5);
    }

    #[test]
    fn test_join_embeds_parent_search() {
        let parent = search();
        let joined = join_search_items(vec![item(parent.id)], vec![parent.clone()]);

        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].search_item, parent);

        let json = serde_json::to_value(&joined[0]).unwrap();
        assert_eq!(json["searchItem"]["searchText"], "levis 501");
        assert_eq!(json["name"], "Levi's 501");
    }

    #[test]
    fn test_join_drops_orphans() {
        let joined = join_search_items(vec![item(Uuid::new_v4())], vec![search()]);
        assert!(joined.is_empty());
    }
}
