//! Tweets: short posts about a football player.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  comment::Comment,
  error::{Error, Result, require_text},
  reaction::Reaction,
  user::{User, UserId},
};

pub type TweetId = i64;

/// Maximum length of [`Tweet::subject`], in characters.
pub const SUBJECT_MAX_CHARS: usize = 255;

/// A persisted tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
  pub tweet_id:   TweetId,
  pub content:    String,
  /// Name of the player the tweet is about.
  pub subject:    String,
  /// Tweets may exist without an owner.
  pub author:     Option<User>,
  /// Empty when the tweet has no photo.
  pub photo_url:  String,
  pub created_at: DateTime<Utc>,
}

/// A validated tweet ready to be inserted. `created_at` is assigned by the
/// store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTweet {
  pub author:    UserId,
  pub content:   String,
  pub subject:   String,
  pub photo_url: String,
}

impl NewTweet {
  pub fn new(
    author: UserId,
    content: impl Into<String>,
    subject: impl Into<String>,
    photo_url: Option<String>,
  ) -> Result<Self> {
    let content = content.into();
    let subject = subject.into();

    require_text("content", &content)?;
    require_text("subject", &subject)?;
    if subject.chars().count() > SUBJECT_MAX_CHARS {
      return Err(Error::TooLong { field: "subject", max: SUBJECT_MAX_CHARS });
    }

    Ok(Self {
      author,
      content,
      subject,
      photo_url: photo_url.unwrap_or_default(),
    })
  }
}

/// A tweet together with its comments and reactions, read as one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetThread {
  pub tweet:     Tweet,
  /// Oldest first.
  pub comments:  Vec<Comment>,
  pub reactions: Vec<Reaction>,
}

impl TweetThread {
  pub fn new(tweet: Tweet) -> Self {
    Self { tweet, comments: Vec::new(), reactions: Vec::new() }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_photo_becomes_empty_string() {
    let t = NewTweet::new(1, "Best goal ever", "Messi", None).unwrap();
    assert_eq!(t.photo_url, "");
  }

  #[test]
  fn blank_content_is_rejected() {
    assert_eq!(
      NewTweet::new(1, "   ", "Messi", None),
      Err(Error::EmptyField("content"))
    );
  }

  #[test]
  fn blank_subject_is_rejected() {
    assert_eq!(
      NewTweet::new(1, "What a save", "", None),
      Err(Error::EmptyField("subject"))
    );
  }

  #[test]
  fn subject_length_counts_characters() {
    let at_limit = "é".repeat(SUBJECT_MAX_CHARS);
    assert!(NewTweet::new(1, "ok", at_limit, None).is_ok());

    let over = "a".repeat(SUBJECT_MAX_CHARS + 1);
    assert_eq!(
      NewTweet::new(1, "ok", over, None),
      Err(Error::TooLong { field: "subject", max: SUBJECT_MAX_CHARS })
    );
  }
}
