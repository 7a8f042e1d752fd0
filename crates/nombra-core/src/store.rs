//! The `VoteStore` trait and supporting result types.
//!
//! The trait is implemented by storage backends (e.g. `nombra-store-sqlite`).
//! Higher layers (`nombra-api`) depend on this abstraction, not on any
//! concrete backend.

use std::{collections::HashSet, future::Future};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  matchmaker::PairKey,
  name::{Category, Name, NewName},
  outcome::Outcome,
  score::RatingRecord,
};

// ─── Result types ────────────────────────────────────────────────────────────

/// Everything a successful [`VoteStore::record_duel`] persisted, committed
/// as one atomic unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuelResult {
  pub outcome: Outcome,
  pub winner:  RatingRecord,
  pub loser:   RatingRecord,
}

/// What a [`VoteStore::delete_name`] cascade removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionReport {
  pub outcomes_removed:    usize,
  pub scores_removed:      usize,
  /// Voters whose rating records were rebuilt because one of their
  /// outcomes referenced the deleted name.
  pub voters_recalculated: Vec<Uuid>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Nombra vote store backend.
///
/// Outcomes are append-only on the vote path; the only mutations beyond
/// appending are the corrective actions (`delete_outcome`, `delete_name`,
/// the resets), each of which leaves ratings consistent by triggering a
/// full chronological replay for the affected voters.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait VoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Names ─────────────────────────────────────────────────────────────

  /// Create and persist a new candidate name. The id and `created_at`
  /// timestamp are set by the store.
  fn add_name(
    &self,
    input: NewName,
  ) -> impl Future<Output = Result<Name, Self::Error>> + Send + '_;

  /// Retrieve a name by id. Returns `None` if not found.
  fn get_name(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Name>, Self::Error>> + Send + '_;

  /// List all names, optionally filtered by category, ordered by creation
  /// time.
  fn list_names(
    &self,
    category: Option<Category>,
  ) -> impl Future<Output = Result<Vec<Name>, Self::Error>> + Send + '_;

  /// Delete a name, cascading downward: every rating record for it, every
  /// outcome naming it as winner or loser, then a full replay for every
  /// voter who had such an outcome (removing an outcome mid-history changes
  /// the correct trajectory of everything that voter compared afterwards).
  fn delete_name(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<DeletionReport, Self::Error>> + Send + '_;

  // ── Duels — the vote path ─────────────────────────────────────────────

  /// Record one duel: compute both sides' new ratings, bump counters,
  /// persist both records and append the outcome as a single atomic unit.
  /// No partial write is ever observable; on failure nothing was mutated.
  ///
  /// Unseen names are materialised at the default rating inside the same
  /// transaction. Rejects self-duels and cross-category duels.
  fn record_duel(
    &self,
    voter_id: Uuid,
    winner_id: Uuid,
    loser_id: Uuid,
  ) -> impl Future<Output = Result<DuelResult, Self::Error>> + Send + '_;

  // ── Scores ────────────────────────────────────────────────────────────

  /// A voter's record for one name, if they ever compared it.
  fn get_score(
    &self,
    voter_id: Uuid,
    name_id: Uuid,
  ) -> impl Future<Output = Result<Option<RatingRecord>, Self::Error>> + Send + '_;

  /// All of one voter's rating records.
  fn scores_for_voter(
    &self,
    voter_id: Uuid,
  ) -> impl Future<Output = Result<Vec<RatingRecord>, Self::Error>> + Send + '_;

  /// Every voter's rating records for one category — the combined ranking's
  /// input.
  fn scores_for_category(
    &self,
    category: Category,
  ) -> impl Future<Output = Result<Vec<RatingRecord>, Self::Error>> + Send + '_;

  // ── Outcomes ──────────────────────────────────────────────────────────

  /// A voter's full outcome history, ascending by `recorded_at`. This is
  /// the exact order replay must process.
  fn outcomes_for_voter(
    &self,
    voter_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Outcome>, Self::Error>> + Send + '_;

  /// The set of pair keys a voter has already voted on.
  fn voted_pairs(
    &self,
    voter_id: Uuid,
  ) -> impl Future<Output = Result<HashSet<PairKey>, Self::Error>> + Send + '_;

  /// Corrective reversal of one outcome. Deletes it and replays the
  /// affected voter's remaining history.
  fn delete_outcome(
    &self,
    outcome_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Replay ────────────────────────────────────────────────────────────

  /// Rebuild a voter's rating records from scratch: wipe, fetch outcomes in
  /// chronological order, fold, bulk-persist. Idempotent; safe to re-invoke
  /// after a partial failure because the wipe always runs first.
  fn recalculate(
    &self,
    voter_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Administration ────────────────────────────────────────────────────

  /// Delete all of one voter's outcomes and rating records.
  fn reset_voter(
    &self,
    voter_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Full purge: every name, outcome, and rating record.
  fn reset_all(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
