/// Saved search endpoints
///
/// Every route is scoped to the caller: a search owned by someone else
/// behaves exactly like one that does not exist.
///
/// # Endpoints
///
/// - `GET /search-items` - the caller's searches, newest first, with items
/// - `POST /search-items` - create a search
/// - `GET /search-items/:id` - one search with its items
/// - `PATCH /search-items/:id` - partial update
/// - `DELETE /search-items/:id` - delete (its items go with it)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use fastvinted_shared::{
    auth::{
        middleware::AuthContext,
        ownership::{require_owned, ResourceKind},
    },
    models::{
        item::Item,
        search_item::{CreateSearchItem, SearchItem, SearchItemWithItems, UpdateSearchItem},
    },
    tags::{validate_tags, TagsInput},
};
use serde::{Deserialize, Deserializer};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSearchItemRequest {
    #[validate(length(min = 1, max = 255, message = "searchText must be 1 to 255 characters"))]
    pub search_text: String,

    #[validate(range(min = 0.0, message = "minPrice must not be negative"))]
    pub min_price: Option<f64>,

    #[validate(range(min = 0.0, message = "maxPrice must not be negative"))]
    pub max_price: Option<f64>,

    #[serde(default)]
    pub tags: TagsInput,
}

/// Partial update; absent fields are left alone
///
/// Prices distinguish "absent" from `null`: `null` clears the bound.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSearchItemRequest {
    #[validate(length(min = 1, max = 255, message = "searchText must be 1 to 255 characters"))]
    pub search_text: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub min_price: Option<Option<f64>>,

    #[serde(default, deserialize_with = "present")]
    pub max_price: Option<Option<f64>>,

    pub tags: Option<TagsInput>,
}

/// Marks a field that appeared in the body, even as `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

fn check_price_bounds(min: Option<f64>, max: Option<f64>) -> ApiResult<()> {
    for (field, price) in [("minPrice", min), ("maxPrice", max)] {
        if price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            return Err(ApiError::invalid(field, format!("{} must not be negative", field)));
        }
    }

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(ApiError::invalid("minPrice", "minPrice must not exceed maxPrice"));
        }
    }

    Ok(())
}

fn normalized_tags(input: TagsInput) -> ApiResult<Vec<String>> {
    let tags = input.into_tags();
    validate_tags(&tags).map_err(|msg| ApiError::invalid("tags", msg))?;
    Ok(tags)
}

fn normalized_text(text: &str) -> ApiResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ApiError::invalid("searchText", "searchText must not be empty"));
    }
    Ok(text.to_string())
}

impl UpdateSearchItemRequest {
    fn into_update(self) -> ApiResult<UpdateSearchItem> {
        check_price_bounds(self.min_price.flatten(), self.max_price.flatten())?;

        Ok(UpdateSearchItem {
            search_text: self.search_text.as_deref().map(normalized_text).transpose()?,
            min_price: self.min_price,
            max_price: self.max_price,
            tags: self.tags.map(normalized_tags).transpose()?,
        })
    }
}

pub async fn list_search_items(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<SearchItemWithItems>>> {
    let searches = SearchItem::list_by_user(&state.db, auth.user_id).await?;
    let searches = SearchItem::with_items(&state.db, searches).await?;

    Ok(Json(searches))
}

pub async fn create_search_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateSearchItemRequest>,
) -> ApiResult<(StatusCode, Json<SearchItem>)> {
    req.validate()?;
    check_price_bounds(req.min_price, req.max_price)?;

    let search = SearchItem::create(
        &state.db,
        CreateSearchItem {
            user_id: auth.user_id,
            search_text: normalized_text(&req.search_text)?,
            min_price: req.min_price,
            max_price: req.max_price,
            tags: normalized_tags(req.tags)?,
        },
    )
    .await?;

    info!(user_id = %auth.user_id, search_item_id = %search.id, "Search item created");

    Ok((StatusCode::CREATED, Json(search)))
}

pub async fn get_search_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<SearchItemWithItems>> {
    let search_item = require_owned(
        ResourceKind::SearchItem,
        id,
        SearchItem::find_by_id_and_user(&state.db, id, auth.user_id),
    )
    .await?;

    let items = Item::list_by_search_items(&state.db, &[search_item.id]).await?;

    Ok(Json(SearchItemWithItems { search_item, items }))
}

pub async fn update_search_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateSearchItemRequest>,
) -> ApiResult<Json<SearchItem>> {
    req.validate()?;
    let update = req.into_update()?;

    // Nothing to change: still an ownership-checked read
    if update.is_empty() {
        let search = require_owned(
            ResourceKind::SearchItem,
            id,
            SearchItem::find_by_id_and_user(&state.db, id, auth.user_id),
        )
        .await?;
        return Ok(Json(search));
    }

    let search = require_owned(
        ResourceKind::SearchItem,
        id,
        SearchItem::update_for_user(&state.db, id, auth.user_id, update),
    )
    .await?;

    info!(user_id = %auth.user_id, search_item_id = %id, "Search item updated");

    Ok(Json(search))
}

pub async fn delete_search_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<SearchItem>> {
    let search = require_owned(
        ResourceKind::SearchItem,
        id,
        SearchItem::delete_for_user(&state.db, id, auth.user_id),
    )
    .await?;

    info!(user_id = %auth.user_id, search_item_id = %id, "Search item deleted");

    Ok(Json(search))
}
