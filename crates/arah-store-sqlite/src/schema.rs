//! SQL schema for the Arah SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated
//! on the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS interests (
    id   TEXT PRIMARY KEY,   -- 'MIN<nn>'
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS skills (
    id          TEXT PRIMARY KEY,   -- 'KEA<nn>'
    name        TEXT NOT NULL,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS careers (
    id                TEXT PRIMARY KEY,   -- 'KAR<nn>'
    name              TEXT NOT NULL,
    description       TEXT NOT NULL,
    development_notes TEXT
);

-- One row per interest × skill pair supporting a career. A career's
-- whole rule set shares one certainty factor; NULL means unweighted.
CREATE TABLE IF NOT EXISTS rules (
    id               TEXT PRIMARY KEY,   -- 'BAS<nn>'
    career_id        TEXT NOT NULL REFERENCES careers(id),
    interest_id      TEXT NOT NULL REFERENCES interests(id),
    skill_id         TEXT NOT NULL REFERENCES skills(id),
    certainty_factor REAL,
    UNIQUE (career_id, interest_id, skill_id)
);

-- Consultations are append-only. No UPDATE is ever issued against this
-- table; the ranked result is computed once and stored as JSON.
CREATE TABLE IF NOT EXISTS consultations (
    id           TEXT PRIMARY KEY,   -- 'KON<nn>'
    user_id      TEXT NOT NULL,
    interest_ids TEXT NOT NULL,      -- JSON array of interest IDs
    skill_ids    TEXT NOT NULL,      -- JSON array of skill IDs
    result       TEXT NOT NULL,      -- JSON array of ranked careers
    consulted_at TEXT NOT NULL       -- ISO 8601 UTC
);

-- Answer-history fan-out: |interests| × |skills| rows per consultation.
-- Interest/skill IDs are copied, not referenced, so the audit trail
-- survives later catalog edits.
CREATE TABLE IF NOT EXISTS consultation_answers (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    consultation_id TEXT NOT NULL
      REFERENCES consultations(id) ON DELETE CASCADE,
    user_id         TEXT NOT NULL,
    interest_id     TEXT NOT NULL,
    skill_id        TEXT NOT NULL,
    recorded_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS rules_career_idx  ON rules(career_id);
CREATE INDEX IF NOT EXISTS rules_pair_idx    ON rules(interest_id, skill_id);
CREATE INDEX IF NOT EXISTS answers_consultation_idx
    ON consultation_answers(consultation_id);
CREATE INDEX IF NOT EXISTS answers_user_idx
    ON consultation_answers(user_id, recorded_at);

PRAGMA user_version = 1;
";
