//! Per-voter vote session — optimistic pair exclusion with rollback.
//!
//! A pair is excluded the moment the voter picks it, before the store write
//! settles, so a rapid next pick can never re-select it. If the write fails
//! the staged key is rolled back and the pair becomes selectable again.
//!
//! This is a building block for interactive clients that matchmake locally
//! between submissions. The HTTP API takes the simpler route of reading
//! confirmed pairs from the store on every request, so nothing in this
//! repository consumes it server-side; pass [`VoteSession::excluded`] as the
//! `voted` set of [`select_pair`](crate::matchmaker::select_pair).

use std::collections::HashSet;

use uuid::Uuid;

use crate::matchmaker::PairKey;

/// The matchmaking exclusion state for one voter.
#[derive(Debug, Clone)]
pub struct VoteSession {
  voter_id:  Uuid,
  /// Pairs the store has confirmed as voted.
  confirmed: HashSet<PairKey>,
  /// Pairs voted locally but not yet confirmed by the store.
  pending:   HashSet<PairKey>,
}

impl VoteSession {
  pub fn new(voter_id: Uuid) -> Self {
    Self { voter_id, confirmed: HashSet::new(), pending: HashSet::new() }
  }

  pub fn voter_id(&self) -> Uuid {
    self.voter_id
  }

  /// Reconcile against the store's confirmed pair set. Pending keys now
  /// present in the confirmed set stop being pending.
  pub fn absorb(&mut self, confirmed: impl IntoIterator<Item = PairKey>) {
    self.confirmed.extend(confirmed);
    self.pending.retain(|key| !self.confirmed.contains(key));
  }

  /// Optimistically exclude a pair the voter just picked. Returns `false`
  /// if the pair was already excluded (duplicate submission).
  pub fn stage(&mut self, key: PairKey) -> bool {
    if self.confirmed.contains(&key) {
      return false;
    }
    self.pending.insert(key)
  }

  /// The store write settled; promote the staged key.
  pub fn confirm(&mut self, key: PairKey) {
    self.pending.remove(&key);
    self.confirmed.insert(key);
  }

  /// The store write failed; re-admit the pair.
  pub fn rollback(&mut self, key: PairKey) {
    self.pending.remove(&key);
  }

  pub fn is_excluded(&self, key: PairKey) -> bool {
    self.confirmed.contains(&key) || self.pending.contains(&key)
  }

  /// Snapshot of every excluded pair, for
  /// [`select_pair`](crate::matchmaker::select_pair).
  pub fn excluded(&self) -> HashSet<PairKey> {
    self.confirmed.union(&self.pending).copied().collect()
  }
}
