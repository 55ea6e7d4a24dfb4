//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

/// Registrar failures carry their own HTTP semantics: missing references map
/// to 404, a repeated withdrawal to 409, anything from the gateway to 500.
impl From<tutela_core::Error> for ApiError {
  fn from(err: tutela_core::Error) -> Self {
    use tutela_core::Error;
    match err {
      Error::RecordNotFound(id) => Self::NotFound(format!("record {id} not found")),
      Error::CategoryNotFound(id) => Self::NotFound(format!("risk category {id} not found")),
      Error::AlreadyWithdrawn(id) => {
        Self::Conflict(format!("record {id} is already withdrawn"))
      }
      Error::Store(e) => Self::Store(e),
    }
  }
}
