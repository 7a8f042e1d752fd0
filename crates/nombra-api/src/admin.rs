//! Administrative and corrective endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/voters/:id/recalculate` | Rebuild a voter's records from history |
//! | `DELETE` | `/voters/:id/votes` | Drop a voter's outcomes and records |
//! | `POST`   | `/admin/reset` | Full purge |

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
};
use nombra_core::store::VoteStore;
use uuid::Uuid;

use crate::error::ApiError;

/// `POST /voters/:id/recalculate`
pub async fn recalculate<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store.recalculate(id).await.map_err(ApiError::store)?;
  tracing::info!(voter = %id, "voter ratings recalculated");
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /voters/:id/votes`
pub async fn reset_voter<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store.reset_voter(id).await.map_err(ApiError::store)?;
  tracing::info!(voter = %id, "voter votes reset");
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /admin/reset`
pub async fn reset_all<S>(
  State(store): State<Arc<S>>,
) -> Result<StatusCode, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store.reset_all().await.map_err(ApiError::store)?;
  tracing::warn!("database reset: all names, outcomes, and scores purged");
  Ok(StatusCode::NO_CONTENT)
}
