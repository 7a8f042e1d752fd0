//! Handlers for `/names` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/names` | Optional `?category=girl\|boy` |
//! | `POST`   | `/names` | Body: `{"text":"Alma","category":"girl","suggested_by":"<uuid>"}` |
//! | `GET`    | `/names/:id` | 404 if not found |
//! | `DELETE` | `/names/:id` | Cascades and recalculates affected voters |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use nombra_core::{
  name::{Category, Name, NewName},
  store::{DeletionReport, VoteStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub category: Option<Category>,
}

/// `GET /names[?category=<category>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Name>>, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let names = store
    .list_names(params.category)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(names))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub text:         String,
  pub category:     Category,
  pub suggested_by: Uuid,
}

/// `POST /names`
///
/// Rejects blank text and case-insensitive duplicates within the category.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let text = body.text.trim();
  if text.is_empty() {
    return Err(ApiError::BadRequest("name text must not be blank".into()));
  }

  let existing = store
    .list_names(Some(body.category))
    .await
    .map_err(ApiError::store)?;
  if existing.iter().any(|n| n.text.eq_ignore_ascii_case(text)) {
    return Err(ApiError::BadRequest(format!(
      "{text:?} is already suggested for {}",
      body.category
    )));
  }

  let name = store
    .add_name(NewName::new(text, body.category, body.suggested_by))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(name)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /names/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Name>, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let name = store
    .get_name(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("name {id} not found")))?;
  Ok(Json(name))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /names/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<DeletionReport>, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report = store.delete_name(id).await.map_err(ApiError::store)?;
  tracing::info!(
    name_id = %id,
    outcomes = report.outcomes_removed,
    voters = report.voters_recalculated.len(),
    "name deleted; affected voters recalculated"
  );
  Ok(Json(report))
}
