//! SQL schema for the Golazo SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Owned by the identity component; the feed only references it.
CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tweets (
    tweet_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    content    TEXT NOT NULL,
    subject    TEXT NOT NULL,          -- player name, at most 255 chars
    author_id  INTEGER REFERENCES users(user_id) ON DELETE CASCADE,
    photo_url  TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL            -- RFC 3339 UTC; server-assigned
);

-- One row per (user, tweet); reacting again updates reaction_type.
CREATE TABLE IF NOT EXISTS reactions (
    reaction_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id       INTEGER NOT NULL REFERENCES users(user_id)   ON DELETE CASCADE,
    tweet_id      INTEGER NOT NULL REFERENCES tweets(tweet_id) ON DELETE CASCADE,
    reaction_type TEXT NOT NULL
        CHECK (reaction_type IN ('like', 'love', 'angry', 'sad', 'goat')),
    UNIQUE (user_id, tweet_id)
);

CREATE TABLE IF NOT EXISTS comments (
    comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(user_id)   ON DELETE CASCADE,
    tweet_id   INTEGER NOT NULL REFERENCES tweets(tweet_id) ON DELETE CASCADE,
    text       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS tweets_created_idx   ON tweets(created_at);
CREATE INDEX IF NOT EXISTS reactions_tweet_idx  ON reactions(tweet_id);
CREATE INDEX IF NOT EXISTS comments_tweet_idx   ON comments(tweet_id);

PRAGMA user_version = 1;
";
