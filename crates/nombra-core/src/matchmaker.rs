//! Coverage-weighted matchmaking — which duel to show a voter next.
//!
//! Pure selection over a snapshot of the live name set, the voter's match
//! counts, and the voter's already-voted pair set. The caller injects the
//! RNG so tests can seed it.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::name::{Category, Name};

// ─── PairKey ─────────────────────────────────────────────────────────────────

/// An order-independent key for an unordered pair of names: the two ids in
/// canonical (sorted) order. `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PairKey(Uuid, Uuid);

impl PairKey {
  pub fn new(a: Uuid, b: Uuid) -> Self {
    if a <= b { Self(a, b) } else { Self(b, a) }
  }
}

// ─── Selection result ────────────────────────────────────────────────────────

/// The three-way matchmaking result.
///
/// `Exhausted` and `NotEnoughNames` are distinct on purpose: the first means
/// the voter has voted every possible duel, the second that no category even
/// holds two names yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairSelection {
  Pair(Name, Name),
  Exhausted,
  NotEnoughNames,
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// Select the next unordered same-category pair for a voter.
///
/// Candidate pairs are every same-category pair of distinct names whose key
/// is not in `voted`. Each candidate is weighted
/// `1/(matches_a + 1) + 1/(matches_b + 1)` — names the voter has compared
/// less often surface sooner. Missing entries in `match_counts` count as
/// zero. One candidate is drawn by roulette-wheel sampling.
pub fn select_pair(
  names: &[Name],
  match_counts: &HashMap<Uuid, u32>,
  voted: &HashSet<PairKey>,
  rng: &mut impl Rng,
) -> PairSelection {
  let mut by_category: HashMap<Category, Vec<&Name>> = HashMap::new();
  for name in names {
    by_category.entry(name.category).or_default().push(name);
  }

  let pairable = by_category.values().any(|group| group.len() >= 2);

  let mut candidates: Vec<(&Name, &Name)> = Vec::new();
  let mut weights: Vec<f64> = Vec::new();

  for category in Category::ALL {
    let Some(group) = by_category.get(&category) else {
      continue;
    };
    for i in 0..group.len() {
      for j in (i + 1)..group.len() {
        let (a, b) = (group[i], group[j]);
        if voted.contains(&PairKey::new(a.name_id, b.name_id)) {
          continue;
        }
        candidates.push((a, b));
        weights.push(pair_weight(match_counts, a.name_id, b.name_id));
      }
    }
  }

  if candidates.is_empty() {
    return if pairable {
      PairSelection::Exhausted
    } else {
      PairSelection::NotEnoughNames
    };
  }

  let (a, b) = candidates[roulette(&weights, rng)];
  PairSelection::Pair(a.clone(), b.clone())
}

fn pair_weight(match_counts: &HashMap<Uuid, u32>, a: Uuid, b: Uuid) -> f64 {
  let matches_of = |id| f64::from(match_counts.get(&id).copied().unwrap_or(0));
  1.0 / (matches_of(a) + 1.0) + 1.0 / (matches_of(b) + 1.0)
}

/// Cumulative-weight draw over `weights`. Float underrun can exhaust the
/// loop without selecting; fall back to the last candidate.
fn roulette(weights: &[f64], rng: &mut impl Rng) -> usize {
  let total: f64 = weights.iter().sum();
  // `gen` is a reserved keyword in edition 2024; rand 0.8 documents the
  // raw-identifier escape.
  let mut r = rng.r#gen::<f64>() * total;
  for (i, w) in weights.iter().enumerate() {
    r -= w;
    if r <= 0.0 {
      return i;
    }
  }
  weights.len() - 1
}

#[cfg(test)]
mod tests {
  use std::collections::{HashMap, HashSet};

  use chrono::Utc;
  use rand::{SeedableRng, rngs::SmallRng};

  use super::*;

  fn name(category: Category) -> Name {
    Name {
      name_id: Uuid::new_v4(),
      text: "test".into(),
      category,
      suggested_by: Uuid::new_v4(),
      created_at: Utc::now(),
    }
  }

  fn rng() -> SmallRng {
    SmallRng::seed_from_u64(7)
  }

  #[test]
  fn pair_key_is_order_independent() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
  }

  #[test]
  fn fewer_than_two_names_anywhere_is_not_enough() {
    let names = vec![name(Category::Girl), name(Category::Boy)];
    let selection =
      select_pair(&names, &HashMap::new(), &HashSet::new(), &mut rng());
    assert_eq!(selection, PairSelection::NotEnoughNames);
  }

  #[test]
  fn no_names_at_all_is_not_enough() {
    let selection =
      select_pair(&[], &HashMap::new(), &HashSet::new(), &mut rng());
    assert_eq!(selection, PairSelection::NotEnoughNames);
  }

  #[test]
  fn all_pairs_voted_is_exhausted() {
    let names: Vec<Name> = (0..4).map(|_| name(Category::Girl)).collect();

    let mut voted = HashSet::new();
    for i in 0..names.len() {
      for j in (i + 1)..names.len() {
        voted.insert(PairKey::new(names[i].name_id, names[j].name_id));
      }
    }

    let selection = select_pair(&names, &HashMap::new(), &voted, &mut rng());
    assert_eq!(selection, PairSelection::Exhausted);
  }

  #[test]
  fn never_pairs_across_categories() {
    let names = vec![
      name(Category::Girl),
      name(Category::Girl),
      name(Category::Boy),
      name(Category::Boy),
    ];

    let mut rng = rng();
    for _ in 0..200 {
      match select_pair(&names, &HashMap::new(), &HashSet::new(), &mut rng) {
        PairSelection::Pair(a, b) => {
          assert_eq!(a.category, b.category);
          assert_ne!(a.name_id, b.name_id);
        }
        other => panic!("expected a pair, got {other:?}"),
      }
    }
  }

  #[test]
  fn excluded_pairs_are_never_selected() {
    let names: Vec<Name> = (0..3).map(|_| name(Category::Boy)).collect();
    let excluded = PairKey::new(names[0].name_id, names[1].name_id);
    let voted: HashSet<PairKey> = [excluded].into();

    let mut rng = rng();
    for _ in 0..200 {
      match select_pair(&names, &HashMap::new(), &voted, &mut rng) {
        PairSelection::Pair(a, b) => {
          assert_ne!(PairKey::new(a.name_id, b.name_id), excluded);
        }
        other => panic!("expected a pair, got {other:?}"),
      }
    }
  }

  /// An uncompared name should surface far more often than uniform chance.
  /// With 6 names where one has 0 matches and the rest have 10, the
  /// zero-match name sits in ~75% of selected pairs (uniform would be 1/3).
  #[test]
  fn undercompared_names_surface_sooner() {
    let names: Vec<Name> = (0..6).map(|_| name(Category::Girl)).collect();
    let cold = names[0].name_id;

    let mut match_counts = HashMap::new();
    for name in &names[1..] {
      match_counts.insert(name.name_id, 10);
    }

    let mut rng = rng();
    let trials = 20_000;
    let mut cold_hits = 0usize;
    for _ in 0..trials {
      match select_pair(&names, &match_counts, &HashSet::new(), &mut rng) {
        PairSelection::Pair(a, b) => {
          if a.name_id == cold || b.name_id == cold {
            cold_hits += 1;
          }
        }
        other => panic!("expected a pair, got {other:?}"),
      }
    }

    let frequency = cold_hits as f64 / trials as f64;
    assert!(
      frequency > 0.5,
      "cold name selected in only {frequency:.3} of trials"
    );
  }

  #[test]
  fn roulette_falls_back_to_last_candidate() {
    // All-zero weights leave r at 0 * total = 0; the first subtraction
    // already satisfies r <= 0, so any index is valid — the guarantee under
    // test is that it never panics and returns a real index.
    let weights = vec![0.0, 0.0, 0.0];
    let index = roulette(&weights, &mut rng());
    assert!(index < weights.len());
  }
}
