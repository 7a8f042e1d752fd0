//! Ranking aggregation — per-voter and cross-voter leaderboards.
//!
//! Pure computation over a snapshot of names and rating records; the caller
//! (API handler, test) supplies the current state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  elo::DEFAULT_RATING,
  name::Name,
  score::RatingRecord,
};

/// One voter's rating for a name, for the combined ranking's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRating {
  pub voter_id: Uuid,
  pub rating:   i32,
}

/// A name with its displayed standing in a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedName {
  pub name:          Name,
  pub rating:        i32,
  pub wins:          u32,
  pub losses:        u32,
  pub matches:       u32,
  /// Per-voter breakdown; populated only by the combined ranking.
  pub voter_ratings: Vec<VoterRating>,
}

/// One voter's personal ranking: each name shows exactly that voter's
/// record, or the defaults if the voter never compared it.
pub fn personal_ranking(
  names: &[Name],
  scores: &[RatingRecord],
  voter_id: Uuid,
) -> Vec<RankedName> {
  let mut ranked: Vec<RankedName> = names
    .iter()
    .map(|name| {
      let mine = scores
        .iter()
        .find(|s| s.name_id == name.name_id && s.voter_id == voter_id);
      RankedName {
        name: name.clone(),
        rating: mine.map_or(DEFAULT_RATING, |s| s.rating),
        wins: mine.map_or(0, |s| s.wins),
        losses: mine.map_or(0, |s| s.losses),
        matches: mine.map_or(0, |s| s.matches),
        voter_ratings: Vec::new(),
      }
    })
    .collect();

  sort_ranked(&mut ranked);
  ranked
}

/// The cross-voter combined ranking.
///
/// A name's combined rating is the mean of its voters' ratings, counting
/// only records with `matches > 0` — a zero-match record means "never
/// compared", not "compared and neutral" — rounded to the nearest integer,
/// or 1000 if nobody compared it yet. Counters are summed over all records.
/// The breakdown lists every voter holding any record for the name.
pub fn combined_ranking(names: &[Name], scores: &[RatingRecord]) -> Vec<RankedName> {
  let mut ranked: Vec<RankedName> = names
    .iter()
    .map(|name| {
      let records: Vec<&RatingRecord> =
        scores.iter().filter(|s| s.name_id == name.name_id).collect();

      let voted: Vec<&&RatingRecord> =
        records.iter().filter(|s| s.matches > 0).collect();
      let rating = if voted.is_empty() {
        DEFAULT_RATING
      } else {
        let sum: f64 = voted.iter().map(|s| f64::from(s.rating)).sum();
        (sum / voted.len() as f64).round() as i32
      };

      RankedName {
        name: name.clone(),
        rating,
        wins: records.iter().map(|s| s.wins).sum(),
        losses: records.iter().map(|s| s.losses).sum(),
        matches: records.iter().map(|s| s.matches).sum(),
        voter_ratings: records
          .iter()
          .map(|s| VoterRating { voter_id: s.voter_id, rating: s.rating })
          .collect(),
      }
    })
    .collect();

  sort_ranked(&mut ranked);
  ranked
}

/// Descending by rating; ties broken by ascending name id so the order is
/// deterministic regardless of input order.
fn sort_ranked(ranked: &mut [RankedName]) {
  ranked.sort_by(|a, b| {
    b.rating
      .cmp(&a.rating)
      .then_with(|| a.name.name_id.cmp(&b.name.name_id))
  });
}
