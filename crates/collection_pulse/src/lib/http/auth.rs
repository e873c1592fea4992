use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response};

use super::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// API key middleware. Skips `/health`. Every request passes when no key is
/// configured.
pub async fn check(req: Request, next: Next, expected: Option<Arc<str>>) -> Response {
    let Some(expected) = expected else {
        return next.run(req).await;
    };

    if req.uri().path() == "/health" {
        return next.run(req).await;
    }

    match req.headers().get(API_KEY_HEADER) {
        None => ApiError::unauthorized("API key required. Provide X-API-Key header.")
            .into_response(),
        Some(value) if value.as_bytes() == expected.as_bytes() => next.run(req).await,
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "Rejected request with invalid API key");
            ApiError::forbidden("Invalid API key").into_response()
        }
    }
}
