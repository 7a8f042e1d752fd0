//! Handlers for `/duels` endpoints — the vote path.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/duels/next?voter=<uuid>` | Matchmake the voter's next pair |
//! | `POST`   | `/duels` | Body: `{"voter_id":..,"winner_id":..,"loser_id":..}` |
//! | `DELETE` | `/duels/:id` | Corrective reversal; replays the voter |

use std::{collections::HashMap, sync::Arc};

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use nombra_core::{
  matchmaker::{PairSelection, select_pair},
  name::Name,
  store::{DuelResult, VoteStore},
};
use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Next pair ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NextParams {
  pub voter: Uuid,
}

/// JSON form of the three-way matchmaking result.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextDuel {
  Pair { pair: [Name; 2] },
  Exhausted,
  NotEnoughNames,
}

/// `GET /duels/next?voter=<uuid>`
pub async fn next_pair<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<NextParams>,
) -> Result<Json<NextDuel>, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let names = store.list_names(None).await.map_err(ApiError::store)?;
  let scores = store
    .scores_for_voter(params.voter)
    .await
    .map_err(ApiError::store)?;
  let voted = store
    .voted_pairs(params.voter)
    .await
    .map_err(ApiError::store)?;

  let match_counts: HashMap<Uuid, u32> =
    scores.iter().map(|s| (s.name_id, s.matches)).collect();

  let mut rng = SmallRng::from_entropy();
  let selection = select_pair(&names, &match_counts, &voted, &mut rng);

  Ok(Json(match selection {
    PairSelection::Pair(a, b) => NextDuel::Pair { pair: [a, b] },
    PairSelection::Exhausted => NextDuel::Exhausted,
    PairSelection::NotEnoughNames => NextDuel::NotEnoughNames,
  }))
}

// ─── Vote ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VoteBody {
  pub voter_id:  Uuid,
  pub winner_id: Uuid,
  pub loser_id:  Uuid,
}

/// `POST /duels`
pub async fn vote<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<VoteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let result: DuelResult = store
    .record_duel(body.voter_id, body.winner_id, body.loser_id)
    .await
    .map_err(ApiError::store)?;

  tracing::debug!(
    voter = %body.voter_id,
    winner = %body.winner_id,
    loser = %body.loser_id,
    "duel recorded"
  );
  Ok((StatusCode::CREATED, Json(result)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /duels/:id` — reverse one outcome and replay the voter.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: VoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store.delete_outcome(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
