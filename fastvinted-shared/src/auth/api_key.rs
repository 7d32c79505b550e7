/// Shared-secret check for the scraper integration
///
/// The scraper is a trusted backend job, not a user. It authenticates with a
/// single static key sent in the `x-api-key` header and configured on the
/// server as `PYTHON_API_KEY`. Both sides are hashed with SHA-256 before
/// comparison so the check takes the same time wherever the first differing
/// byte is.
///
/// ```
/// use fastvinted_shared::auth::api_key::IntegrationKey;
///
/// let key = IntegrationKey::new("scraper-secret").unwrap();
/// assert!(key.verify(Some("scraper-secret")).is_ok());
/// assert!(key.verify(Some("guess")).is_err());
/// assert!(key.verify(None).is_err());
/// ```

use sha2::{Digest, Sha256};

/// Header carrying the integration key
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrationKeyError {
    #[error("Missing API key")]
    Missing,

    #[error("Invalid API key")]
    Invalid,

    #[error("Integration API key must not be empty")]
    EmptySecret,
}

/// The configured integration secret, kept only as its digest
#[derive(Clone)]
pub struct IntegrationKey {
    digest: [u8; 32],
}

impl std::fmt::Debug for IntegrationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationKey")
            .field("digest", &hex::encode(&self.digest[..4]))
            .finish_non_exhaustive()
    }
}

impl IntegrationKey {
    pub fn new(secret: &str) -> Result<Self, IntegrationKeyError> {
        if secret.trim().is_empty() {
            return Err(IntegrationKeyError::EmptySecret);
        }

        Ok(Self {
            digest: digest(secret),
        })
    }

    /// Checks the value of the `x-api-key` header, if any
    pub fn verify(&self, presented: Option<&str>) -> Result<(), IntegrationKeyError> {
        let presented = presented
            .filter(|value| !value.is_empty())
            .ok_or(IntegrationKeyError::Missing)?;

        let candidate = digest(presented);
        let diff = self
            .digest
            .iter()
            .zip(candidate.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));

        if diff == 0 {
            Ok(())
        } else {
            Err(IntegrationKeyError::Invalid)
        }
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}
