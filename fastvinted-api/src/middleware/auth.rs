/// Authentication layers
///
/// Two separate layers for the two kinds of caller. Each runs before any
/// handler on the routers it wraps and rejects with 401 on failure.
///
/// - [`jwt_auth_layer`] inserts an [`AuthContext`] for end users.
/// - [`integration_key_layer`] inserts an [`IntegrationCaller`] for the
///   scraper. It never yields a user identity.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use fastvinted_shared::auth::middleware::{
    authenticate_bearer, authenticate_integration, AuthContext, IntegrationCaller,
};
use tracing::{debug, warn};

pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth: AuthContext = authenticate_bearer(req.headers(), state.jwt_secret())
        .inspect_err(|e| debug!(error = %e, path = %req.uri().path(), "Bearer authentication failed"))?;

    debug!(user_id = %auth.user_id, "Authenticated request");
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

pub async fn integration_key_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let caller: IntegrationCaller = authenticate_integration(req.headers(), &state.integration_key)
        .inspect_err(|e| warn!(error = %e, path = %req.uri().path(), "Rejected integration request"))?;

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}
