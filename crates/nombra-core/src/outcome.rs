//! Outcome — one recorded duel result.
//!
//! Outcomes are append-only on the vote path. The only deletion paths are the
//! explicit corrective actions (reversing a vote, deleting a name), both of
//! which trigger a full replay for the affected voters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{matchmaker::PairKey, name::Category};

/// The recorded result of one voter comparing two names.
///
/// `category` caches the shared category of both names so replay and
/// matchmaking never need to join back to the name table. `recorded_at` is
/// store-assigned; replay depends on its total order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
  pub outcome_id:  Uuid,
  pub voter_id:    Uuid,
  pub winner_id:   Uuid,
  pub loser_id:    Uuid,
  pub category:    Category,
  pub recorded_at: DateTime<Utc>,
}

impl Outcome {
  /// The order-independent key of the pair this outcome compared.
  pub fn pair_key(&self) -> PairKey {
    PairKey::new(self.winner_id, self.loser_id)
  }
}
