//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings in UTC with a fixed microsecond
//! precision, so lexical order matches chronological order. Reaction kinds
//! are stored as their lowercase names.

use chrono::{DateTime, SecondsFormat, Utc};
use golazo_core::{
  comment::Comment,
  reaction::{Reaction, ReactionKind},
  tweet::Tweet,
  user::{User, UserCredentials},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ReactionKind ────────────────────────────────────────────────────────────

pub fn encode_reaction_kind(k: ReactionKind) -> &'static str { k.as_str() }

pub fn decode_reaction_kind(s: &str) -> Result<ReactionKind> {
  Ok(ReactionKind::parse(s)?)
}

// ─── Case folding ────────────────────────────────────────────────────────────

/// Name of the SQL scalar function that applies [`fold_case`].
pub const FOLD_FN: &str = "golazo_fold";

/// Unicode lowercase folding used for search. Both the stored text and the
/// needle pass through this, so `ÖZIL` finds `Özil`.
pub fn fold_case(s: &str) -> String { s.to_lowercase() }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawTweet::from_row`].
pub const TWEET_COLUMNS: &str = "
  t.tweet_id, t.content, t.subject, t.photo_url, t.created_at,
  u.user_id, u.username
  FROM tweets t
  LEFT JOIN users u ON u.user_id = t.author_id";

/// Raw values read directly from a `tweets` row joined with its author.
pub struct RawTweet {
  pub tweet_id:    i64,
  pub content:     String,
  pub subject:     String,
  pub photo_url:   String,
  pub created_at:  String,
  pub author_id:   Option<i64>,
  pub author_name: Option<String>,
}

impl RawTweet {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      tweet_id:    row.get(0)?,
      content:     row.get(1)?,
      subject:     row.get(2)?,
      photo_url:   row.get(3)?,
      created_at:  row.get(4)?,
      author_id:   row.get(5)?,
      author_name: row.get(6)?,
    })
  }

  pub fn into_tweet(self) -> Result<Tweet> {
    let author = match (self.author_id, self.author_name) {
      (Some(user_id), Some(username)) => Some(User { user_id, username }),
      _ => None,
    };

    Ok(Tweet {
      tweet_id: self.tweet_id,
      content: self.content,
      subject: self.subject,
      author,
      photo_url: self.photo_url,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawReaction::from_row`].
pub const REACTION_COLUMNS: &str = "
  r.reaction_id, r.tweet_id, r.reaction_type, u.user_id, u.username
  FROM reactions r
  JOIN users u ON u.user_id = r.user_id";

/// Raw values read directly from a `reactions` row joined with its user.
pub struct RawReaction {
  pub reaction_id:   i64,
  pub tweet_id:      i64,
  pub reaction_type: String,
  pub user_id:       i64,
  pub username:      String,
}

impl RawReaction {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      reaction_id:   row.get(0)?,
      tweet_id:      row.get(1)?,
      reaction_type: row.get(2)?,
      user_id:       row.get(3)?,
      username:      row.get(4)?,
    })
  }

  pub fn into_reaction(self) -> Result<Reaction> {
    Ok(Reaction {
      reaction_id: self.reaction_id,
      user:        User { user_id: self.user_id, username: self.username },
      tweet_id:    self.tweet_id,
      kind:        decode_reaction_kind(&self.reaction_type)?,
    })
  }
}

/// Column list matching [`RawComment::from_row`].
pub const COMMENT_COLUMNS: &str = "
  c.comment_id, c.tweet_id, c.text, c.created_at, u.user_id, u.username
  FROM comments c
  JOIN users u ON u.user_id = c.user_id";

/// Raw values read directly from a `comments` row joined with its user.
pub struct RawComment {
  pub comment_id: i64,
  pub tweet_id:   i64,
  pub text:       String,
  pub created_at: String,
  pub user_id:    i64,
  pub username:   String,
}

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      tweet_id:   row.get(1)?,
      text:       row.get(2)?,
      created_at: row.get(3)?,
      user_id:    row.get(4)?,
      username:   row.get(5)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id: self.comment_id,
      user:       User { user_id: self.user_id, username: self.username },
      tweet_id:   self.tweet_id,
      text:       self.text,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawCredentials {
  pub user_id:       i64,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawCredentials {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      username:      row.get(1)?,
      password_hash: row.get(2)?,
      created_at:    row.get(3)?,
    })
  }

  pub fn into_credentials(self) -> Result<UserCredentials> {
    Ok(UserCredentials {
      user:          User { user_id: self.user_id, username: self.username },
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 5).unwrap();
    let later = whole + chrono::Duration::microseconds(120);
    assert!(encode_dt(whole) < encode_dt(later));
    assert_eq!(decode_dt(&encode_dt(later)).unwrap(), later);
  }

  #[test]
  fn fold_case_handles_non_ascii() {
    assert_eq!(fold_case("ÖZIL"), fold_case("Özil"));
    assert_eq!(fold_case("ØDEGAARD"), "ødegaard");
    assert_eq!(fold_case("Škriniar"), "škriniar");
  }
}
