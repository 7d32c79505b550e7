/// Ownership checks for user-scoped resources
///
/// Every user-facing read or write first proves that the caller owns the
/// target, directly (search items, webhooks, the account itself) or through
/// a parent (items belong to whoever owns their search item). The lookups
/// themselves live on the models and already filter on the caller's id;
/// [`require_owned`] turns an empty result into [`OwnershipError::NotFound`].
///
/// "Not found" and "not yours" are deliberately the same error, so one user
/// cannot probe for another user's ids.
///
/// # Example
///
/// ```no_run
/// use fastvinted_shared::auth::ownership::{require_owned, ResourceKind};
/// use fastvinted_shared::models::search_item::SearchItem;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, id: Uuid, caller: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let search = require_owned(
///     ResourceKind::SearchItem,
///     id,
///     SearchItem::find_by_id_and_user(&pool, id, caller),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

use std::{fmt, future::Future};
use tracing::debug;
use uuid::Uuid;

/// Kinds of user-owned resources, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    SearchItem,
    Item,
    DiscordWebhook,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::User => "User",
            ResourceKind::SearchItem => "Search item",
            ResourceKind::Item => "Item",
            ResourceKind::DiscordWebhook => "Discord webhook",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// Absent, or owned by someone else
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: ResourceKind, id: Uuid },

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Awaits an owner-filtered lookup and requires it to find a row
pub async fn require_owned<T, Fut>(
    kind: ResourceKind,
    id: Uuid,
    lookup: Fut,
) -> Result<T, OwnershipError>
where
    Fut: Future<Output = Result<Option<T>, sqlx::Error>>,
{
    match lookup.await? {
        Some(resource) => Ok(resource),
        None => {
            debug!(%kind, %id, "Resource absent or not owned by caller");
            Err(OwnershipError::NotFound { kind, id })
        }
    }
}

/// For the account itself: the caller may only address their own id
pub fn require_self(id: Uuid, caller: Uuid) -> Result<(), OwnershipError> {
    if id == caller {
        Ok(())
    } else {
        Err(OwnershipError::NotFound {
            kind: ResourceKind::User,
            id,
        })
    }
}
