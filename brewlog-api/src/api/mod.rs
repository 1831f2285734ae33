//! REST API implementation for the Brewlog journal

pub mod backup;
pub mod beans;
pub mod enrichment;
pub mod server;
pub mod settings;
pub mod wishlist;

use crate::services::EnrichmentError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error returned by any API handler
///
/// Every failure surfaces once as a single JSON error body; nothing is
/// retried and nothing crashes the process.
#[derive(Debug)]
pub enum ApiError {
    Store(brewlog_common::Error),
    Enrichment(EnrichmentError),
    BadRequest(String),
}

impl From<brewlog_common::Error> for ApiError {
    fn from(e: brewlog_common::Error) -> Self {
        ApiError::Store(e)
    }
}

impl From<EnrichmentError> for ApiError {
    fn from(e: EnrichmentError) -> Self {
        ApiError::Enrichment(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Store(brewlog_common::Error::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, format!("Not found: {}", msg))
            }
            ApiError::Store(brewlog_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, format!("Invalid input: {}", msg))
            }
            ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Enrichment(EnrichmentError::MissingApiKey) => (
                StatusCode::BAD_REQUEST,
                EnrichmentError::MissingApiKey.to_string(),
            ),
            ApiError::Enrichment(EnrichmentError::TimedOut) => (
                StatusCode::GATEWAY_TIMEOUT,
                EnrichmentError::TimedOut.to_string(),
            ),
            ApiError::Enrichment(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        tracing::error!("Request failed: {}", message);

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
