//! SQL schema for the Vitrina SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS projects (
    project_id  TEXT PRIMARY KEY,
    slug        TEXT NOT NULL,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    image_url   TEXT NOT NULL,
    project_url TEXT NOT NULL,
    tags        TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    views       INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,               -- ISO 8601 UTC; server-assigned
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    task_id      TEXT PRIMARY KEY,
    project_id   TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    title        TEXT NOT NULL,
    description  TEXT,
    status       TEXT NOT NULL DEFAULT 'pending',  -- 'pending' | 'in-progress' | 'completed'
    ordering     INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    name       TEXT NOT NULL,
    email      TEXT NOT NULL,
    message    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS features (
    feature_id  TEXT PRIMARY KEY,
    project_id  TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    user_name   TEXT NOT NULL,
    user_email  TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- One vote per identity per feature; the UNIQUE constraint is the
-- authoritative guard, the intake pre-check is only a fast path.
CREATE TABLE IF NOT EXISTS votes (
    vote_id    TEXT PRIMARY KEY,
    feature_id TEXT NOT NULL REFERENCES features(feature_id) ON DELETE CASCADE,
    user_name  TEXT NOT NULL,
    user_email TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (feature_id, user_email)
);

-- The verification ledger is append-then-flip: rows are never deleted,
-- `consumed` flips to 1 exactly once.
CREATE TABLE IF NOT EXISTS verification_codes (
    entry_id   TEXT PRIMARY KEY,
    email      TEXT NOT NULL,
    code       TEXT NOT NULL,   -- exactly 6 ASCII decimal digits
    kind       TEXT NOT NULL,   -- 'comment' | 'feature' | 'vote'
    payload    TEXT NOT NULL,   -- JSON payload (inner data only)
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL,
    consumed   INTEGER NOT NULL DEFAULT 0
);

-- Single-row table holding the site-wide visit counter.
CREATE TABLE IF NOT EXISTS site_stats (
    stats_id INTEGER PRIMARY KEY CHECK (stats_id = 1),
    visits   INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS comments_project_idx    ON comments(project_id);
CREATE INDEX IF NOT EXISTS tasks_project_idx       ON tasks(project_id);
CREATE INDEX IF NOT EXISTS features_project_idx    ON features(project_id);
CREATE INDEX IF NOT EXISTS votes_feature_idx       ON votes(feature_id);
CREATE INDEX IF NOT EXISTS verification_lookup_idx ON verification_codes(email, code, kind);

PRAGMA user_version = 1;
";
