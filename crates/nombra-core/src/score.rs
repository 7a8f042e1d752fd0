//! Rating records — one per (voter, name) pair that has been compared.
//!
//! A record is never persisted before the first duel involving its name
//! completes; until then the name simply has no record for that voter and
//! reads as [`ScoreState::Unrecorded`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  elo::{self, DEFAULT_RATING},
  name::Category,
};

/// One voter's standing for one name.
///
/// Invariant: `wins + losses == matches`. Both mutation paths
/// ([`apply_duel`] and the replay fold) bump the counters together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRecord {
  pub voter_id: Uuid,
  pub name_id:  Uuid,
  pub category: Category,
  pub rating:   i32,
  pub wins:     u32,
  pub losses:   u32,
  pub matches:  u32,
}

impl RatingRecord {
  /// A default record for a never-compared name: rating 1000, all counters
  /// zero. Not meaningful to persist until a duel happens.
  pub fn fresh(voter_id: Uuid, name_id: Uuid, category: Category) -> Self {
    Self {
      voter_id,
      name_id,
      category,
      rating: DEFAULT_RATING,
      wins: 0,
      losses: 0,
      matches: 0,
    }
  }
}

/// What a voter's score for a name looks like on read.
///
/// The two cases are kept distinct so callers cannot accidentally persist a
/// default record before a real comparison occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreState {
  Recorded(RatingRecord),
  Unrecorded,
}

impl ScoreState {
  pub fn rating(&self) -> i32 {
    match self {
      Self::Recorded(record) => record.rating,
      Self::Unrecorded => DEFAULT_RATING,
    }
  }

  pub fn matches(&self) -> u32 {
    match self {
      Self::Recorded(record) => record.matches,
      Self::Unrecorded => 0,
    }
  }

  /// Turn the state into a concrete record, minting a fresh default for
  /// [`ScoreState::Unrecorded`]. Called at the moment a duel is applied.
  pub fn materialize(self, voter_id: Uuid, name_id: Uuid, category: Category) -> RatingRecord {
    match self {
      Self::Recorded(record) => record,
      Self::Unrecorded => RatingRecord::fresh(voter_id, name_id, category),
    }
  }
}

/// Apply one duel to both sides in place: new ratings via
/// [`elo::duel_ratings`], winner gets a win, loser gets a loss, both get a
/// match.
pub fn apply_duel(winner: &mut RatingRecord, loser: &mut RatingRecord) {
  let updated = elo::duel_ratings(winner.rating, loser.rating);

  winner.rating = updated.winner;
  winner.wins += 1;
  winner.matches += 1;

  loser.rating = updated.loser;
  loser.losses += 1;
  loser.matches += 1;
}
