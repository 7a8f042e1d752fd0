//! Handler for `/rankings/:category`.
//!
//! With `?voter=<uuid>` the response is that voter's personal ranking;
//! without it, the cross-voter combined ranking.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use nombra_core::{
  name::Category,
  ranking::{RankedName, combined_ranking, personal_ranking},
  store::VoteStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RankingParams {
  pub voter: Option<Uuid>,
}

/// `GET /rankings/:category[?voter=<uuid>]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Path(category): Path<Category>,
  Query(params): Query<RankingParams>,
) -> Result<Json<Vec<RankedName>>, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let names = store
    .list_names(Some(category))
    .await
    .map_err(ApiError::store)?;
  let scores = store
    .scores_for_category(category)
    .await
    .map_err(ApiError::store)?;

  let ranked = match params.voter {
    Some(voter_id) => personal_ranking(&names, &scores, voter_id),
    None => combined_ranking(&names, &scores),
  };
  Ok(Json(ranked))
}
