//! JSON REST API for Nombra.
//!
//! Exposes an axum [`Router`] backed by any [`nombra_core::store::VoteStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", nombra_api::api_router(store.clone()))
//! ```

pub mod admin;
pub mod duels;
pub mod error;
pub mod names;
pub mod rankings;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use nombra_core::store::VoteStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: VoteStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Names
    .route("/names", get(names::list::<S>).post(names::create::<S>))
    .route("/names/{id}", get(names::get_one::<S>).delete(names::delete_one::<S>))
    // Duels
    .route("/duels/next", get(duels::next_pair::<S>))
    .route("/duels", post(duels::vote::<S>))
    .route("/duels/{id}", delete(duels::delete_one::<S>))
    // Rankings
    .route("/rankings/{category}", get(rankings::handler::<S>))
    // Administration
    .route("/voters/{id}/recalculate", post(admin::recalculate::<S>))
    .route("/voters/{id}/votes", delete(admin::reset_voter::<S>))
    .route("/admin/reset", post(admin::reset_all::<S>))
    .with_state(store)
}
