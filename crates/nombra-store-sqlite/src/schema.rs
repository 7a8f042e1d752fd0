//! SQL schema for the Nombra SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS names (
    name_id      TEXT PRIMARY KEY,
    text         TEXT NOT NULL,
    category     TEXT NOT NULL,   -- 'girl' | 'boy'
    suggested_by TEXT NOT NULL,
    created_at   TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

-- Append-only on the vote path. Rows are removed only by the corrective
-- actions (outcome reversal, name deletion, resets), which always replay
-- the affected voters afterwards.
CREATE TABLE IF NOT EXISTS outcomes (
    outcome_id  TEXT PRIMARY KEY,
    voter_id    TEXT NOT NULL,
    winner_id   TEXT NOT NULL REFERENCES names(name_id),
    loser_id    TEXT NOT NULL REFERENCES names(name_id),
    category    TEXT NOT NULL,   -- cached shared category of both names
    recorded_at TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    CHECK (winner_id != loser_id)
);

-- One row per (voter, name) pair the voter has compared at least once.
-- Never written before the first duel involving that name completes.
CREATE TABLE IF NOT EXISTS scores (
    voter_id TEXT NOT NULL,
    name_id  TEXT NOT NULL REFERENCES names(name_id),
    category TEXT NOT NULL,
    rating   INTEGER NOT NULL,
    wins     INTEGER NOT NULL,
    losses   INTEGER NOT NULL,
    matches  INTEGER NOT NULL,
    PRIMARY KEY (voter_id, name_id),
    CHECK (wins + losses = matches)
);

CREATE INDEX IF NOT EXISTS outcomes_voter_time_idx ON outcomes(voter_id, recorded_at);
CREATE INDEX IF NOT EXISTS outcomes_winner_idx     ON outcomes(winner_id);
CREATE INDEX IF NOT EXISTS outcomes_loser_idx      ON outcomes(loser_id);
CREATE INDEX IF NOT EXISTS scores_name_idx         ON scores(name_id);
CREATE INDEX IF NOT EXISTS scores_category_idx     ON scores(category);

PRAGMA user_version = 1;
";
