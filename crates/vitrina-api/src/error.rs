//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use vitrina_core::FlowError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("delivery failed: {0}")]
  Delivery(String),

  /// An invariant the handlers rely on was violated.
  #[error("internal error: {0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<FlowError> for ApiError {
  fn from(e: FlowError) -> Self {
    match e {
      FlowError::Validation(m) => Self::BadRequest(m),
      FlowError::DuplicateVote | FlowError::InvalidOrExpiredCode => {
        Self::BadRequest(e.to_string())
      }
      FlowError::NotFound(m) => Self::NotFound(m),
      FlowError::Delivery(d) => Self::Delivery(d.to_string()),
      FlowError::Store(inner) => Self::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Delivery(m) => (StatusCode::BAD_GATEWAY, m),
      // Store and invariant failures are logged, never echoed.
      ApiError::Internal(m) => {
        tracing::error!(error = %m, "handler invariant violated");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
