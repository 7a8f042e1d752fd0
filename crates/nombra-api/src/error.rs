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

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }
}

/// Walk a store error's source chain looking for a domain error so missing
/// names map to 404 and invalid duels to 400 instead of a blanket 500.
fn domain_status(e: &(dyn std::error::Error + 'static)) -> Option<StatusCode> {
  let mut current: Option<&(dyn std::error::Error + 'static)> = Some(e);
  while let Some(err) = current {
    if let Some(core) = err.downcast_ref::<nombra_core::Error>() {
      return Some(match core {
        nombra_core::Error::NameNotFound(_)
        | nombra_core::Error::OutcomeNotFound(_) => StatusCode::NOT_FOUND,
        nombra_core::Error::SelfDuel(_)
        | nombra_core::Error::CategoryMismatch { .. } => StatusCode::BAD_REQUEST,
      });
    }
    current = err.source();
  }
  None
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => (
        domain_status(e.as_ref()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        e.to_string(),
      ),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
