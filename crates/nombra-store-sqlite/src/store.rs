//! [`SqliteStore`] — the SQLite implementation of [`VoteStore`].

use std::{collections::HashSet, path::Path};

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use nombra_core::{
  matchmaker::PairKey,
  name::{Category, Name, NewName},
  outcome::Outcome,
  replay::replay_outcomes,
  score::{RatingRecord, ScoreState, apply_duel},
  store::{DeletionReport, DuelResult, VoteStore},
};

use crate::{
  Error, Result,
  encode::{
    RawName, RawOutcome, RawScore, decode_uuid, encode_category, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Nombra vote store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// A voter's score state for a name: their record, or
  /// [`ScoreState::Unrecorded`] if they never compared it.
  async fn score_state(&self, voter_id: Uuid, name_id: Uuid) -> Result<ScoreState> {
    Ok(match self.get_score(voter_id, name_id).await? {
      Some(record) => ScoreState::Recorded(record),
      None => ScoreState::Unrecorded,
    })
  }

  /// Voters holding at least one outcome that names `name_id` as winner or
  /// loser — the set whose ratings a name deletion invalidates.
  async fn voters_with_outcomes_for(&self, name_id: Uuid) -> Result<Vec<Uuid>> {
    let id_str = encode_uuid(name_id);

    let voter_strs: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT voter_id FROM outcomes
           WHERE winner_id = ?1 OR loser_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    voter_strs.iter().map(|s| decode_uuid(s)).collect()
  }
}

/// Insert or overwrite one rating record inside an open transaction.
fn upsert_score(
  tx: &rusqlite::Transaction<'_>,
  record: &RatingRecord,
) -> rusqlite::Result<()> {
  tx.execute(
    "INSERT INTO scores (voter_id, name_id, category, rating, wins, losses, matches)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
     ON CONFLICT (voter_id, name_id) DO UPDATE SET
       rating  = excluded.rating,
       wins    = excluded.wins,
       losses  = excluded.losses,
       matches = excluded.matches",
    rusqlite::params![
      encode_uuid(record.voter_id),
      encode_uuid(record.name_id),
      encode_category(record.category),
      record.rating,
      record.wins,
      record.losses,
      record.matches,
    ],
  )?;
  Ok(())
}

// ─── VoteStore impl ──────────────────────────────────────────────────────────

impl VoteStore for SqliteStore {
  type Error = Error;

  // ── Names ─────────────────────────────────────────────────────────────────

  async fn add_name(&self, input: NewName) -> Result<Name> {
    let name = Name {
      name_id:      Uuid::new_v4(),
      text:         input.text,
      category:     input.category,
      suggested_by: input.suggested_by,
      // Truncated to the microsecond precision the column stores, so the
      // returned entity equals the row read back.
      created_at:   Utc::now().trunc_subsecs(6),
    };

    let id_str       = encode_uuid(name.name_id);
    let text         = name.text.clone();
    let category_str = encode_category(name.category).to_owned();
    let by_str       = encode_uuid(name.suggested_by);
    let at_str       = encode_dt(name.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO names (name_id, text, category, suggested_by, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, text, category_str, by_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(name)
  }

  async fn get_name(&self, id: Uuid) -> Result<Option<Name>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawName> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT name_id, text, category, suggested_by, created_at
               FROM names WHERE name_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawName {
                  name_id:      row.get(0)?,
                  text:         row.get(1)?,
                  category:     row.get(2)?,
                  suggested_by: row.get(3)?,
                  created_at:   row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawName::into_name).transpose()
  }

  async fn list_names(&self, category: Option<Category>) -> Result<Vec<Name>> {
    let category_str = category.map(encode_category).map(str::to_owned);

    let raws: Vec<RawName> = self
      .conn
      .call(move |conn| {
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawName {
            name_id:      row.get(0)?,
            text:         row.get(1)?,
            category:     row.get(2)?,
            suggested_by: row.get(3)?,
            created_at:   row.get(4)?,
          })
        };

        let rows = if let Some(c) = category_str {
          let mut stmt = conn.prepare(
            "SELECT name_id, text, category, suggested_by, created_at
             FROM names WHERE category = ?1 ORDER BY created_at ASC",
          )?;
          stmt
            .query_map(rusqlite::params![c], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT name_id, text, category, suggested_by, created_at
             FROM names ORDER BY created_at ASC",
          )?;
          stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawName::into_name).collect()
  }

  async fn delete_name(&self, id: Uuid) -> Result<DeletionReport> {
    if self.get_name(id).await?.is_none() {
      return Err(nombra_core::Error::NameNotFound(id).into());
    }

    let voters = self.voters_with_outcomes_for(id).await?;

    // Scores and outcomes must go before the name row (FK order), all in
    // one transaction so a failure leaves the name fully intact.
    let id_str = encode_uuid(id);
    let (outcomes_removed, scores_removed) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let scores = tx.execute(
          "DELETE FROM scores WHERE name_id = ?1",
          rusqlite::params![id_str],
        )?;
        let outcomes = tx.execute(
          "DELETE FROM outcomes WHERE winner_id = ?1 OR loser_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM names WHERE name_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok((outcomes, scores))
      })
      .await?;

    // Removing outcomes mid-history invalidates every later rating update
    // those voters made; rebuild them all.
    for voter_id in &voters {
      self.recalculate(*voter_id).await?;
    }

    Ok(DeletionReport {
      outcomes_removed,
      scores_removed,
      voters_recalculated: voters,
    })
  }

  // ── Duels — the vote path ─────────────────────────────────────────────────

  async fn record_duel(
    &self,
    voter_id: Uuid,
    winner_id: Uuid,
    loser_id: Uuid,
  ) -> Result<DuelResult> {
    if winner_id == loser_id {
      return Err(nombra_core::Error::SelfDuel(winner_id).into());
    }

    let winner_name = self
      .get_name(winner_id)
      .await?
      .ok_or(nombra_core::Error::NameNotFound(winner_id))?;
    let loser_name = self
      .get_name(loser_id)
      .await?
      .ok_or(nombra_core::Error::NameNotFound(loser_id))?;

    if winner_name.category != loser_name.category {
      return Err(
        nombra_core::Error::CategoryMismatch {
          winner: winner_name.category,
          loser:  loser_name.category,
        }
        .into(),
      );
    }
    let category = winner_name.category;

    let mut winner = self
      .score_state(voter_id, winner_id)
      .await?
      .materialize(voter_id, winner_id, category);
    let mut loser = self
      .score_state(voter_id, loser_id)
      .await?
      .materialize(voter_id, loser_id, category);

    apply_duel(&mut winner, &mut loser);

    let outcome = Outcome {
      outcome_id: Uuid::new_v4(),
      voter_id,
      winner_id,
      loser_id,
      category,
      recorded_at: Utc::now().trunc_subsecs(6),
    };

    // Both record upserts and the outcome append commit as one unit.
    let winner_row     = winner.clone();
    let loser_row      = loser.clone();
    let outcome_id_str = encode_uuid(outcome.outcome_id);
    let voter_str      = encode_uuid(voter_id);
    let winner_id_str  = encode_uuid(winner_id);
    let loser_id_str   = encode_uuid(loser_id);
    let category_str   = encode_category(category).to_owned();
    let at_str         = encode_dt(outcome.recorded_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        upsert_score(&tx, &winner_row)?;
        upsert_score(&tx, &loser_row)?;
        tx.execute(
          "INSERT INTO outcomes (outcome_id, voter_id, winner_id, loser_id, category, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            outcome_id_str,
            voter_str,
            winner_id_str,
            loser_id_str,
            category_str,
            at_str,
          ],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(DuelResult { outcome, winner, loser })
  }

  // ── Scores ────────────────────────────────────────────────────────────────

  async fn get_score(&self, voter_id: Uuid, name_id: Uuid) -> Result<Option<RatingRecord>> {
    let voter_str = encode_uuid(voter_id);
    let name_str  = encode_uuid(name_id);

    let raw: Option<RawScore> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT voter_id, name_id, category, rating, wins, losses, matches
               FROM scores WHERE voter_id = ?1 AND name_id = ?2",
              rusqlite::params![voter_str, name_str],
              map_score_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawScore::into_record).transpose()
  }

  async fn scores_for_voter(&self, voter_id: Uuid) -> Result<Vec<RatingRecord>> {
    let voter_str = encode_uuid(voter_id);

    let raws: Vec<RawScore> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT voter_id, name_id, category, rating, wins, losses, matches
           FROM scores WHERE voter_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![voter_str], map_score_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawScore::into_record).collect()
  }

  async fn scores_for_category(&self, category: Category) -> Result<Vec<RatingRecord>> {
    let category_str = encode_category(category).to_owned();

    let raws: Vec<RawScore> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT voter_id, name_id, category, rating, wins, losses, matches
           FROM scores WHERE category = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![category_str], map_score_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawScore::into_record).collect()
  }

  // ── Outcomes ──────────────────────────────────────────────────────────────

  async fn outcomes_for_voter(&self, voter_id: Uuid) -> Result<Vec<Outcome>> {
    let voter_str = encode_uuid(voter_id);

    let raws: Vec<RawOutcome> = self
      .conn
      .call(move |conn| {
        // rowid breaks ties between outcomes recorded in the same
        // microsecond; it preserves insertion order.
        let mut stmt = conn.prepare(
          "SELECT outcome_id, voter_id, winner_id, loser_id, category, recorded_at
           FROM outcomes WHERE voter_id = ?1
           ORDER BY recorded_at ASC, rowid ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![voter_str], |row| {
            Ok(RawOutcome {
              outcome_id:  row.get(0)?,
              voter_id:    row.get(1)?,
              winner_id:   row.get(2)?,
              loser_id:    row.get(3)?,
              category:    row.get(4)?,
              recorded_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawOutcome::into_outcome).collect()
  }

  async fn voted_pairs(&self, voter_id: Uuid) -> Result<HashSet<PairKey>> {
    let voter_str = encode_uuid(voter_id);

    let id_pairs: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT winner_id, loser_id FROM outcomes WHERE voter_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![voter_str], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    id_pairs
      .iter()
      .map(|(w, l)| Ok(PairKey::new(decode_uuid(w)?, decode_uuid(l)?)))
      .collect()
  }

  async fn delete_outcome(&self, outcome_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(outcome_id);

    let voter_str: Option<String> = self
      .conn
      .call(move |conn| {
        let voter = conn
          .query_row(
            "SELECT voter_id FROM outcomes WHERE outcome_id = ?1",
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;
        if voter.is_some() {
          conn.execute(
            "DELETE FROM outcomes WHERE outcome_id = ?1",
            rusqlite::params![id_str],
          )?;
        }
        Ok(voter)
      })
      .await?;

    let voter_str =
      voter_str.ok_or(nombra_core::Error::OutcomeNotFound(outcome_id))?;
    self.recalculate(decode_uuid(&voter_str)?).await
  }

  // ── Replay ────────────────────────────────────────────────────────────────

  async fn recalculate(&self, voter_id: Uuid) -> Result<()> {
    // Step 1: full wipe. Running first is what makes a re-invocation after
    // a partial failure repair any half-written state.
    let voter_str = encode_uuid(voter_id);
    self
      .conn
      .call({
        let voter_str = voter_str.clone();
        move |conn| {
          conn.execute(
            "DELETE FROM scores WHERE voter_id = ?1",
            rusqlite::params![voter_str],
          )?;
          Ok(())
        }
      })
      .await?;

    // Steps 2–4: chronological fetch and fold.
    let outcomes = self.outcomes_for_voter(voter_id).await?;
    if outcomes.is_empty() {
      return Ok(());
    }
    let records: Vec<RatingRecord> =
      replay_outcomes(voter_id, &outcomes).into_values().collect();

    // Step 5: bulk-persist the rebuilt records in one transaction.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for record in &records {
          upsert_score(&tx, record)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  // ── Administration ────────────────────────────────────────────────────────

  async fn reset_voter(&self, voter_id: Uuid) -> Result<()> {
    let voter_str = encode_uuid(voter_id);
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM outcomes WHERE voter_id = ?1",
          rusqlite::params![voter_str],
        )?;
        tx.execute(
          "DELETE FROM scores WHERE voter_id = ?1",
          rusqlite::params![voter_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn reset_all(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM outcomes", [])?;
        tx.execute("DELETE FROM scores", [])?;
        tx.execute("DELETE FROM names", [])?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn map_score_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawScore> {
  Ok(RawScore {
    voter_id: row.get(0)?,
    name_id:  row.get(1)?,
    category: row.get(2)?,
    rating:   row.get(3)?,
    wins:     row.get(4)?,
    losses:   row.get(5)?,
    matches:  row.get(6)?,
  })
}
