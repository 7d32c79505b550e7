/// Discord webhook endpoints
///
/// Each user has at most one webhook URL.
///
/// - `GET /discord-webhook` - the caller's webhook, or `null`
/// - `POST /discord-webhook` - create or replace it

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
};
use axum::{extract::State, Extension, Json};
use fastvinted_shared::{auth::middleware::AuthContext, models::discord_webhook::DiscordWebhook};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SetWebhookRequest {
    #[validate(length(max = 2048, message = "url must be at most 2048 characters"))]
    pub url: String,
}

/// The caller's webhook
///
/// Answers `200 null` when none is configured; the dashboard reads that as
/// "not set up yet".
pub async fn get_webhook(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Option<DiscordWebhook>>> {
    let webhook = DiscordWebhook::find_by_user(&state.db, auth.user_id).await?;
    Ok(Json(webhook))
}

/// Creates the caller's webhook or replaces its URL
pub async fn set_webhook(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<SetWebhookRequest>,
) -> ApiResult<Json<DiscordWebhook>> {
    req.validate()?;

    let url = req.url.trim();
    if url.is_empty() {
        return Err(ApiError::invalid("url", "url must not be empty"));
    }

    let webhook = DiscordWebhook::upsert(&state.db, auth.user_id, url).await?;

    info!(user_id = %auth.user_id, webhook_id = %webhook.id, "Discord webhook saved");

    Ok(Json(webhook))
}
