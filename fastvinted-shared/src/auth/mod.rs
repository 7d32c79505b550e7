/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: bearer token issuing and validation
/// - [`api_key`]: the shared secret presented by the scraper integration
/// - [`middleware`]: turning request headers into a caller identity
/// - [`ownership`]: per-user scoping of every resource lookup
///
/// # Example
///
/// ```no_run
/// use fastvinted_shared::auth::password::{hash_password, verify_password};
/// use fastvinted_shared::auth::jwt::{create_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com", Duration::hours(24));
/// let token = create_token(&claims, "a-secret-that-is-at-least-32-bytes!")?;
/// # Ok(())
/// # }
/// ```

pub mod api_key;
pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;
