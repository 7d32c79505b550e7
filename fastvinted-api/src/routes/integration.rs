/// Scraper integration endpoints
///
/// Authenticated by the `x-api-key` header rather than a user token, and
/// deliberately not scoped to any user: the scraper works across every
/// account.
///
/// # Endpoints
///
/// - `GET /python-integration/search-items` - every saved search
/// - `POST /python-integration/items` - submit a matched listing
/// - `GET /python-integration/webhooks` - every configured webhook URL

use crate::{
    app::AppState,
    error::ApiResult,
    extract::ApiJson,
};
use axum::{extract::State, http::StatusCode, Json};
use fastvinted_shared::{
    auth::ownership::{require_owned, ResourceKind},
    models::{
        discord_webhook::DiscordWebhook,
        item::{CreateItem, Item},
        search_item::SearchItem,
    },
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub search_item_id: Uuid,

    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,

    #[validate(length(min = 1, message = "size must not be empty"))]
    pub size: String,

    #[validate(length(min = 1, message = "condition must not be empty"))]
    pub condition: String,

    #[validate(length(min = 1, message = "sellerName must not be empty"))]
    pub seller_name: String,

    #[validate(url(message = "imageUrl must be a URL"))]
    pub image_url: String,

    #[validate(url(message = "url must be a URL"))]
    pub url: String,
}

/// A stored listing and whether this request inserted it
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemSubmission {
    #[serde(flatten)]
    pub item: Item,

    pub created: bool,
}

/// Where to notify a user
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTarget {
    pub user_id: Uuid,

    pub url: String,
}

pub async fn list_search_items(State(state): State<AppState>) -> ApiResult<Json<Vec<SearchItem>>> {
    let searches = SearchItem::list_all(&state.db).await?;

    debug!(count = searches.len(), "Serving search items to scraper");

    Ok(Json(searches))
}

/// Records a listing for a search
///
/// Submitting a url already recorded for the same search returns the
/// existing row with 200 instead of inserting a duplicate.
pub async fn create_item(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<ItemSubmission>)> {
    req.validate()?;

    require_owned(
        ResourceKind::SearchItem,
        req.search_item_id,
        SearchItem::find_by_id(&state.db, req.search_item_id),
    )
    .await?;

    let (item, created) = Item::create_if_absent(
        &state.db,
        CreateItem {
            search_item_id: req.search_item_id,
            name: req.name,
            price: req.price,
            size: req.size,
            condition: req.condition,
            seller_name: req.seller_name,
            image_url: req.image_url,
            url: req.url,
        },
    )
    .await?;

    let status = if created {
        info!(item_id = %item.id, search_item_id = %item.search_item_id, "Item recorded");
        StatusCode::CREATED
    } else {
        debug!(item_id = %item.id, "Duplicate item submission");
        StatusCode::OK
    };

    Ok((status, Json(ItemSubmission { item, created })))
}

pub async fn list_webhooks(State(state): State<AppState>) -> ApiResult<Json<Vec<WebhookTarget>>> {
    let targets = DiscordWebhook::list_all(&state.db)
        .await?
        .into_iter()
        .map(|webhook| WebhookTarget {
            user_id: webhook.user_id,
            url: webhook.url,
        })
        .collect();

    Ok(Json(targets))
}
