/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use fastvinted_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config)?);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:4200").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        auth::{integration_key_layer, jwt_auth_layer},
        security::SecurityHeadersLayer,
    },
    routes,
};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use fastvinted_shared::auth::api_key::{IntegrationKey, API_KEY_HEADER};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler; the pool and the `Arc`s make that cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,

    pub config: Arc<Config>,

    /// Digest of the scraper's shared secret
    pub integration_key: Arc<IntegrationKey>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> anyhow::Result<Self> {
        let integration_key = IntegrationKey::new(&config.integration.api_key)?;

        Ok(Self {
            db,
            config: Arc::new(config),
            integration_key: Arc::new(integration_key),
        })
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Lifetime of newly issued access tokens
    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(self.config.jwt.expiration_hours)
    }
}

/// Builds the complete router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health
/// ├── /auth
/// │   ├── POST /register
/// │   ├── POST /login
/// │   └── GET  /profile                       (bearer)
/// ├── /users/:id           GET, DELETE        (bearer)
/// ├── /search-items        GET, POST          (bearer)
/// │   └── /:id             GET, PATCH, DELETE
/// ├── /items               GET                (bearer)
/// │   ├── /count           GET
/// │   ├── /count/:id       GET
/// │   ├── /search/:id      GET
/// │   └── /:id             GET, DELETE
/// ├── /discord-webhook     GET, POST          (bearer)
/// └── /python-integration                     (x-api-key)
///     ├── GET  /search-items
///     ├── POST /items
///     └── GET  /webhooks
/// ```
///
/// Authentication is a `route_layer`, so unknown paths still answer 404.
pub fn build_router(state: AppState) -> Router {
    let jwt = || from_fn_with_state(state.clone(), jwt_auth_layer);

    let auth_routes = Router::new()
        .route("/profile", get(routes::auth::profile))
        .route_layer(jwt())
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let user_routes = Router::new()
        .route(
            "/:id",
            get(routes::users::get_user).delete(routes::users::delete_user),
        )
        .route_layer(jwt());

    let search_item_routes = Router::new()
        .route(
            "/",
            get(routes::search_items::list_search_items)
                .post(routes::search_items::create_search_item),
        )
        .route(
            "/:id",
            get(routes::search_items::get_search_item)
                .patch(routes::search_items::update_search_item)
                .delete(routes::search_items::delete_search_item),
        )
        .route_layer(jwt());

    let item_routes = Router::new()
        .route("/", get(routes::items::list_items))
        .route("/count", get(routes::items::count_items))
        .route("/count/:id", get(routes::items::count_items_for_search))
        .route("/search/:id", get(routes::items::list_items_for_search))
        .route(
            "/:id",
            get(routes::items::get_item).delete(routes::items::delete_item),
        )
        .route_layer(jwt());

    let webhook_routes = Router::new()
        .route(
            "/",
            get(routes::discord_webhook::get_webhook).post(routes::discord_webhook::set_webhook),
        )
        .route_layer(jwt());

    let integration_routes = Router::new()
        .route("/search-items", get(routes::integration::list_search_items))
        .route("/items", post(routes::integration::create_item))
        .route("/webhooks", get(routes::integration::list_webhooks))
        .route_layer(from_fn_with_state(state.clone(), integration_key_layer));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/search-items", search_item_routes)
        .nest("/items", item_routes)
        .nest("/discord-webhook", webhook_routes)
        .nest("/python-integration", integration_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allows_any() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
