/// API route handlers, one module per resource
///
/// - `health`: liveness and database probe
/// - `auth`: register, login, profile
/// - `users`: the caller's own account
/// - `search_items`: saved searches
/// - `items`: matched listings, paginated
/// - `discord_webhook`: the caller's notification URL
/// - `integration`: scraper endpoints behind the API key

pub mod auth;
pub mod discord_webhook;
pub mod health;
pub mod integration;
pub mod items;
pub mod search_items;
pub mod users;
