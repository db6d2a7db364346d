//! Comments: free-form replies to a tweet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  error::{Result, require_text},
  tweet::TweetId,
  user::{User, UserId},
};

pub type CommentId = i64;

/// A persisted comment. Comments are never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: CommentId,
  pub user:       User,
  pub tweet_id:   TweetId,
  pub text:       String,
  pub created_at: DateTime<Utc>,
}

/// A validated comment ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
  pub user:     UserId,
  pub tweet_id: TweetId,
  pub text:     String,
}

impl NewComment {
  pub fn new(user: UserId, tweet_id: TweetId, text: impl Into<String>) -> Result<Self> {
    let text = text.into();
    require_text("text", &text)?;
    Ok(Self { user, tweet_id, text })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn blank_text_is_rejected() {
    assert_eq!(NewComment::new(1, 2, "\n\t"), Err(Error::EmptyField("text")));
  }

  #[test]
  fn text_is_kept_verbatim() {
    let c = NewComment::new(1, 2, "  Wow ").unwrap();
    assert_eq!(c.text, "  Wow ");
  }
}
