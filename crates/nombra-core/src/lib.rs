//! Core types and trait definitions for the Nombra name-duel engine.
//!
//! Everything with algorithmic content lives here: the Elo rating update,
//! the coverage-weighted matchmaker, the chronological replay fold, and the
//! ranking aggregator. This crate is deliberately free of HTTP and database
//! dependencies; storage backends implement [`store::VoteStore`].

pub mod elo;
pub mod error;
pub mod matchmaker;
pub mod name;
pub mod outcome;
pub mod ranking;
pub mod replay;
pub mod score;
pub mod session;
pub mod store;

pub use error::{Error, Result};
