//! Pre-shared key check for the `/api` routes.
//!
//! The key travels in `x-api-key` or as a bearer token and is compared in
//! constant time.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Where a presented key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeySource {
    Header,
    Bearer,
}

/// Middleware guarding the API; a `None` key leaves the API open.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    match authorize(request.headers(), &expected) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::debug!(path = %request.uri().path(), "Rejected API request");
            err.into_response()
        }
    }
}

/// Check the presented key. `x-api-key` wins over the bearer token when both
/// are sent.
fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), AppError> {
    match presented_key(headers) {
        Some((_, key)) if keys_match(key, expected) => Ok(()),
        Some((KeySource::Header, _)) => {
            Err(AppError::Unauthorized("Invalid API key".to_string()))
        }
        _ => Err(AppError::Unauthorized(
            "Missing or invalid API key".to_string(),
        )),
    }
}

fn presented_key(headers: &HeaderMap) -> Option<(KeySource, &str)> {
    if let Some(key) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return Some((KeySource::Header, key));
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|key| (KeySource::Bearer, key))
}

fn keys_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
