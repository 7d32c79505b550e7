/// Matched listing endpoints
///
/// Items belong to users through their parent search. Listings take
/// `limit`, `page`, `orderBy` and `order` query parameters; see
/// [`fastvinted_shared::pagination`] for defaults and the sortable fields.
///
/// # Endpoints
///
/// - `GET /items` - one page across all of the caller's searches
/// - `GET /items/search/:id` - one page under a single search
/// - `GET /items/count` - total across all searches
/// - `GET /items/count/:id` - total under one search
/// - `GET /items/:id` - one item with its search
/// - `DELETE /items/:id`

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiPath, ApiQuery},
};
use axum::{extract::State, Extension, Json};
use fastvinted_shared::{
    auth::{
        middleware::AuthContext,
        ownership::{require_owned, ResourceKind},
    },
    models::{
        item::{Item, ItemWithSearchItem},
        search_item::SearchItem,
    },
    pagination::ItemQuery,
};
use tracing::info;
use uuid::Uuid;

pub async fn list_items(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<ItemQuery>,
) -> ApiResult<Json<Vec<ItemWithSearchItem>>> {
    let items = Item::list_for_user(&state.db, auth.user_id, &query.resolve()).await?;
    let items = Item::attach_search_items(&state.db, items).await?;

    Ok(Json(items))
}

/// A page of items under one search; 404 unless the caller owns it
pub async fn list_items_for_search(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(search_item_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ItemQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    require_owned(
        ResourceKind::SearchItem,
        search_item_id,
        SearchItem::find_by_id_and_user(&state.db, search_item_id, auth.user_id),
    )
    .await?;

    let items = Item::list_for_search_item(&state.db, search_item_id, &query.resolve()).await?;

    Ok(Json(items))
}

pub async fn count_items(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<i64>> {
    Ok(Json(Item::count_for_user(&state.db, auth.user_id).await?))
}

/// Plain count; a search the caller does not own simply counts zero
pub async fn count_items_for_search(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(search_item_id): ApiPath<Uuid>,
) -> ApiResult<Json<i64>> {
    let count = Item::count_for_search_item(&state.db, auth.user_id, search_item_id).await?;
    Ok(Json(count))
}

pub async fn get_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ItemWithSearchItem>> {
    let item = require_owned(
        ResourceKind::Item,
        id,
        Item::find_by_id_for_user(&state.db, id, auth.user_id),
    )
    .await?;

    // The parent can vanish between the two reads
    let item = require_owned(ResourceKind::Item, id, async {
        Ok::<_, sqlx::Error>(Item::attach_search_items(&state.db, vec![item]).await?.pop())
    })
    .await?;

    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Item>> {
    let item = require_owned(
        ResourceKind::Item,
        id,
        Item::delete_for_user(&state.db, id, auth.user_id),
    )
    .await?;

    info!(user_id = %auth.user_id, item_id = %id, "Item deleted");

    Ok(Json(item))
}
