//! Error types for `nombra-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::name::Category;

#[derive(Debug, Error)]
pub enum Error {
  #[error("name not found: {0}")]
  NameNotFound(Uuid),

  #[error("outcome not found: {0}")]
  OutcomeNotFound(Uuid),

  #[error("cannot duel a name against itself: {0}")]
  SelfDuel(Uuid),

  #[error("cannot duel across categories: {winner} vs {loser}")]
  CategoryMismatch { winner: Category, loser: Category },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
