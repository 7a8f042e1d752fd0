//! Chronological replay — rebuild a voter's rating records from scratch.
//!
//! Rating updates are path-dependent, so outcomes must be folded in the
//! exact order they were recorded. This module is the pure fold; the store
//! wraps it with the wipe / ordered-fetch / bulk-persist steps.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
  outcome::Outcome,
  score::{RatingRecord, apply_duel},
};

/// Fold a voter's chronologically ordered outcome history into their
/// complete set of rating records.
///
/// Records are minted lazily at default rating as names are first
/// encountered, exactly as the incremental vote path does, so replaying a
/// history yields the same records incremental application would have.
pub fn replay_outcomes(voter_id: Uuid, outcomes: &[Outcome]) -> HashMap<Uuid, RatingRecord> {
  let mut records: HashMap<Uuid, RatingRecord> = HashMap::new();

  for outcome in outcomes {
    debug_assert_eq!(outcome.voter_id, voter_id);

    let mut winner = records
      .remove(&outcome.winner_id)
      .unwrap_or_else(|| RatingRecord::fresh(voter_id, outcome.winner_id, outcome.category));
    let mut loser = records
      .remove(&outcome.loser_id)
      .unwrap_or_else(|| RatingRecord::fresh(voter_id, outcome.loser_id, outcome.category));

    apply_duel(&mut winner, &mut loser);

    records.insert(outcome.winner_id, winner);
    records.insert(outcome.loser_id, loser);
  }

  records
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, Utc};

  use super::*;
  use crate::name::Category;

  fn history(voter_id: Uuid, duels: &[(Uuid, Uuid)]) -> Vec<Outcome> {
    let start = Utc::now();
    duels
      .iter()
      .enumerate()
      .map(|(i, &(winner_id, loser_id))| Outcome {
        outcome_id: Uuid::new_v4(),
        voter_id,
        winner_id,
        loser_id,
        category: Category::Girl,
        recorded_at: start + Duration::seconds(i as i64),
      })
      .collect()
  }

  #[test]
  fn empty_history_yields_no_records() {
    assert!(replay_outcomes(Uuid::new_v4(), &[]).is_empty());
  }

  #[test]
  fn replay_is_idempotent() {
    let voter = Uuid::new_v4();
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let outcomes = history(voter, &[(a, b), (a, c), (c, b), (b, a)]);

    let first = replay_outcomes(voter, &outcomes);
    let second = replay_outcomes(voter, &outcomes);
    assert_eq!(first, second);
  }

  #[test]
  fn replay_matches_incremental_application() {
    let voter = Uuid::new_v4();
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let outcomes = history(voter, &[(a, b), (c, a), (b, c), (a, c), (a, b)]);

    // Incremental: apply each duel to live records, as the vote path does.
    let mut live: HashMap<Uuid, RatingRecord> = HashMap::new();
    for outcome in &outcomes {
      let mut winner = live
        .remove(&outcome.winner_id)
        .unwrap_or_else(|| RatingRecord::fresh(voter, outcome.winner_id, outcome.category));
      let mut loser = live
        .remove(&outcome.loser_id)
        .unwrap_or_else(|| RatingRecord::fresh(voter, outcome.loser_id, outcome.category));
      apply_duel(&mut winner, &mut loser);
      live.insert(outcome.winner_id, winner);
      live.insert(outcome.loser_id, loser);
    }

    assert_eq!(replay_outcomes(voter, &outcomes), live);
  }

  #[test]
  fn order_matters() {
    let voter = Uuid::new_v4();
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    let forward = history(voter, &[(a, b), (b, c)]);
    let reversed = history(voter, &[(b, c), (a, b)]);

    let forward_ratings = replay_outcomes(voter, &forward);
    let reversed_ratings = replay_outcomes(voter, &reversed);
    assert_ne!(
      forward_ratings.get(&b).map(|r| r.rating),
      reversed_ratings.get(&b).map(|r| r.rating),
    );
  }

  #[test]
  fn counters_reflect_full_history() {
    let voter = Uuid::new_v4();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let outcomes = history(voter, &[(a, b), (a, b), (b, a)]);

    let records = replay_outcomes(voter, &outcomes);
    let record_a = &records[&a];
    let record_b = &records[&b];

    assert_eq!((record_a.wins, record_a.losses, record_a.matches), (2, 1, 3));
    assert_eq!((record_b.wins, record_b.losses, record_b.matches), (1, 2, 3));
  }
}
