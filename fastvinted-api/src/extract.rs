/// Request extractors that reject with [`ApiError`]
///
/// axum's own `Json`, `Path` and `Query` reject with plain-text bodies.
/// These wrappers behave the same on success but turn a rejection into the
/// usual JSON error body: malformed syntax is a 400, a well-formed body of
/// the wrong shape is a 422.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::{get, post},
        Router,
    };
    use serde::Deserialize;
    use tower::Service as _;
    use uuid::Uuid;

    #[derive(Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        name: String,
    }

    fn app() -> Router {
        async fn body(ApiJson(_): ApiJson<Payload>) -> &'static str {
            "ok"
        }
        async fn path(ApiPath(_): ApiPath<Uuid>) -> &'static str {
            "ok"
        }

        Router::new()
            .route("/body", post(body))
            .route("/path/:id", get(path))
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        app().call(request).await.unwrap().status()
    }

    fn json(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/body")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        assert_eq!(status_of(json(r#"{"name":"x"}"#)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        assert_eq!(status_of(json("{not json")).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_field_is_unprocessable() {
        assert_eq!(status_of(json("{}")).await, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_invalid_uuid_is_bad_request() {
        let request = Request::builder()
            .uri("/path/not-a-uuid")
            .body(Body::empty())
            .unwrap();

        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }
}
