/// Persistence gateway
///
/// - `pool`: PostgreSQL connection pool setup and health checks
/// - `migrations`: embedded schema migrations
///
/// Query construction lives next to each model in `crate::models`.

pub mod migrations;
pub mod pool;
