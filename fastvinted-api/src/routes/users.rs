/// Account endpoints
///
/// A user may only address their own id. Any other id answers 404, the same
/// as an id that does not exist.
///
/// - `GET /users/:id`
/// - `DELETE /users/:id` - removes the account, its searches, their items
///   and the webhook

use crate::{app::AppState, error::ApiResult, extract::ApiPath};
use axum::{extract::State, http::StatusCode, Extension, Json};
use fastvinted_shared::{
    auth::{
        middleware::AuthContext,
        ownership::{require_owned, require_self, OwnershipError, ResourceKind},
    },
    models::user::User,
};
use tracing::info;
use uuid::Uuid;

pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<User>> {
    require_self(id, auth.user_id)?;

    let user = require_owned(ResourceKind::User, id, User::find_by_id(&state.db, id)).await?;

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    require_self(id, auth.user_id)?;

    if !User::delete(&state.db, id).await? {
        return Err(OwnershipError::NotFound {
            kind: ResourceKind::User,
            id,
        }
        .into());
    }

    info!(user_id = %id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}
