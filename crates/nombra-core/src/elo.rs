//! The Elo rating update — the only place rating arithmetic happens.
//!
//! Pure and deterministic; both the incremental vote path and the replay
//! fold go through [`duel_ratings`], so the two can never drift apart.

/// Every name starts here; a voter who never compared a name reads it at
/// this rating with zero counters.
pub const DEFAULT_RATING: i32 = 1000;

/// Fixed K-factor.
pub const K: f64 = 32.0;

/// The logistic expected score of `rating_a` against `rating_b`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
  1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / 400.0))
}

/// The pair of ratings produced by one duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatedRatings {
  pub winner: i32,
  pub loser:  i32,
}

/// Compute both sides' new ratings after the winner beats the loser.
/// Results are rounded to the nearest integer. The winner always gains;
/// the loser never gains.
pub fn duel_ratings(winner_rating: i32, loser_rating: i32) -> UpdatedRatings {
  let w = f64::from(winner_rating);
  let l = f64::from(loser_rating);

  let expected_winner = expected_score(w, l);
  let expected_loser = expected_score(l, w);

  UpdatedRatings {
    winner: (w + K * (1.0 - expected_winner)).round() as i32,
    loser:  (l + K * (0.0 - expected_loser)).round() as i32,
  }
}
