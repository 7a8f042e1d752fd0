//! Candidate names — the thin envelope the rating engine ranks.
//!
//! A name holds only identity metadata. Its standing for a given voter lives
//! in that voter's [`RatingRecord`](crate::score::RatingRecord)s.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The category a name belongs to. Duels are only ever formed within one
/// category, never across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Girl,
  Boy,
}

impl Category {
  /// Both categories, in a fixed iteration order.
  pub const ALL: [Category; 2] = [Category::Girl, Category::Boy];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Girl => "girl",
      Self::Boy => "boy",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A suggested candidate name. Immutable once created; deletion cascades to
/// every rating record and outcome that references it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
  pub name_id:      Uuid,
  pub text:         String,
  pub category:     Category,
  pub suggested_by: Uuid,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::VoteStore::add_name`].
/// `name_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewName {
  pub text:         String,
  pub category:     Category,
  pub suggested_by: Uuid,
}

impl NewName {
  pub fn new(text: impl Into<String>, category: Category, suggested_by: Uuid) -> Self {
    Self { text: text.into(), category, suggested_by }
  }
}
