/// Database models
///
/// Each model owns its SQL. Per-user operations take the caller's id and
/// filter on it in the query itself.
///
/// - `user`: accounts
/// - `search_item`: saved searches (owned by a user)
/// - `item`: matched listings (owned through their search item)
/// - `discord_webhook`: one notification URL per user

pub mod discord_webhook;
pub mod item;
pub mod search_item;
pub mod user;
