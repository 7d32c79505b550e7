/// Client error types
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status
    #[error("{status}: {message}")]
    Api {
        status: StatusCode,
        error: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A call that needs a token was made before logging in
    #[error("Not logged in")]
    NotLoggedIn,
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            ClientError::NotLoggedIn => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Builds an [`ClientError::Api`] from a response body
    ///
    /// Bodies that are not the server's error shape (a proxy's HTML page,
    /// an empty 502) keep the status and fall back to its reason phrase.
    pub(crate) fn from_body(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(body) => ClientError::Api {
                status,
                error: body.error,
                message: body.message,
            },
            Err(_) => ClientError::Api {
                status,
                error: "unknown".to_string(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unexpected response")
                    .to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_server_body() {
        let err = ClientError::from_body(
            StatusCode::NOT_FOUND,
            r#"{"error":"not_found","message":"Search item with ID x not found"}"#,
        );

        assert!(err.is_not_found());
        match err {
            ClientError::Api { error, message, .. } => {
                assert_eq!(error, "not_found");
                assert_eq!(message, "Search item with ID x not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_foreign_body() {
        let err = ClientError::from_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(err.to_string(), "502 Bad Gateway: Bad Gateway");
    }

    #[test]
    fn test_not_logged_in_has_no_status() {
        assert_eq!(ClientError::NotLoggedIn.status(), None);
        assert!(!ClientError::NotLoggedIn.is_unauthorized());
    }
}
