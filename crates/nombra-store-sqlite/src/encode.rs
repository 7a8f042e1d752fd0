//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so lexicographic column order matches chronological
//! order. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use nombra_core::{
  name::{Category, Name},
  outcome::Outcome,
  score::RatingRecord,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Category ────────────────────────────────────────────────────────────────

pub fn encode_category(c: Category) -> &'static str { c.as_str() }

pub fn decode_category(s: &str) -> Result<Category> {
  match s {
    "girl" => Ok(Category::Girl),
    "boy" => Ok(Category::Boy),
    other => Err(Error::UnknownCategory(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `names` row.
pub struct RawName {
  pub name_id:      String,
  pub text:         String,
  pub category:     String,
  pub suggested_by: String,
  pub created_at:   String,
}

impl RawName {
  pub fn into_name(self) -> Result<Name> {
    Ok(Name {
      name_id:      decode_uuid(&self.name_id)?,
      text:         self.text,
      category:     decode_category(&self.category)?,
      suggested_by: decode_uuid(&self.suggested_by)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `outcomes` row.
pub struct RawOutcome {
  pub outcome_id:  String,
  pub voter_id:    String,
  pub winner_id:   String,
  pub loser_id:    String,
  pub category:    String,
  pub recorded_at: String,
}

impl RawOutcome {
  pub fn into_outcome(self) -> Result<Outcome> {
    Ok(Outcome {
      outcome_id:  decode_uuid(&self.outcome_id)?,
      voter_id:    decode_uuid(&self.voter_id)?,
      winner_id:   decode_uuid(&self.winner_id)?,
      loser_id:    decode_uuid(&self.loser_id)?,
      category:    decode_category(&self.category)?,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// A `scores` row; counters come back as native integers.
pub struct RawScore {
  pub voter_id: String,
  pub name_id:  String,
  pub category: String,
  pub rating:   i32,
  pub wins:     u32,
  pub losses:   u32,
  pub matches:  u32,
}

impl RawScore {
  pub fn into_record(self) -> Result<RatingRecord> {
    Ok(RatingRecord {
      voter_id: decode_uuid(&self.voter_id)?,
      name_id:  decode_uuid(&self.name_id)?,
      category: decode_category(&self.category)?,
      rating:   self.rating,
      wins:     self.wins,
      losses:   self.losses,
      matches:  self.matches,
    })
  }
}
