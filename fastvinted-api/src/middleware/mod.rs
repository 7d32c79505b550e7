/// Middleware for the API server
///
/// - `auth`: bearer-token and integration-key layers
/// - `security`: security response headers

pub mod auth;
pub mod security;
