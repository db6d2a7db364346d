//! Response shapes returned by the API, one per entity.
//!
//! Views are built eagerly from domain values by the constructors below; no
//! field is computed lazily at resolution time.

use async_graphql::SimpleObject;
use chrono::{DateTime, SecondsFormat, Utc};
use golazo_core::{
  comment::Comment,
  reaction::Reaction,
  tweet::{Tweet, TweetThread},
  user::User,
};
use serde::Serialize;

fn timestamp(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Secs, true) }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "User")]
pub struct UserView {
  pub id:       i64,
  pub username: String,
}

impl From<User> for UserView {
  fn from(u: User) -> Self { Self { id: u.user_id, username: u.username } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "Reaction")]
pub struct ReactionView {
  pub id:            i64,
  pub user:          UserView,
  pub tweet_id:      i64,
  /// One of `like`, `love`, `angry`, `sad`, `goat`.
  pub reaction_type: String,
}

impl From<Reaction> for ReactionView {
  fn from(r: Reaction) -> Self {
    Self {
      id:            r.reaction_id,
      user:          r.user.into(),
      tweet_id:      r.tweet_id,
      reaction_type: r.kind.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "Comment")]
pub struct CommentView {
  pub id:         i64,
  pub user:       UserView,
  pub tweet_id:   i64,
  pub text:       String,
  /// RFC 3339, UTC.
  pub created_at: String,
}

impl From<Comment> for CommentView {
  fn from(c: Comment) -> Self {
    Self {
      id:         c.comment_id,
      user:       c.user.into(),
      tweet_id:   c.tweet_id,
      text:       c.text,
      created_at: timestamp(c.created_at),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "Tweet")]
pub struct TweetView {
  pub id:             i64,
  pub content:        String,
  /// The player the tweet is about.
  pub subject:        String,
  pub author:         Option<UserView>,
  /// Empty when the tweet has no photo.
  pub photo_url:      String,
  /// RFC 3339, UTC.
  pub created_at:     String,
  pub comment_count:  i64,
  pub reaction_count: i64,
  pub comments:       Vec<CommentView>,
  pub reactions:      Vec<ReactionView>,
}

impl TweetView {
  /// Assemble the view of `tweet` from its comments and reactions.
  pub fn build(tweet: Tweet, comments: Vec<Comment>, reactions: Vec<Reaction>) -> Self {
    let comments: Vec<CommentView> = comments.into_iter().map(Into::into).collect();
    let reactions: Vec<ReactionView> = reactions.into_iter().map(Into::into).collect();

    Self {
      id: tweet.tweet_id,
      content: tweet.content,
      subject: tweet.subject,
      author: tweet.author.map(Into::into),
      photo_url: tweet.photo_url,
      created_at: timestamp(tweet.created_at),
      comment_count: count(&comments),
      reaction_count: count(&reactions),
      comments,
      reactions,
    }
  }
}

impl From<TweetThread> for TweetView {
  fn from(thread: TweetThread) -> Self {
    Self::build(thread.tweet, thread.comments, thread.reactions)
  }
}

fn count<T>(items: &[T]) -> i64 { i64::try_from(items.len()).unwrap_or(i64::MAX) }

/// Result of a delete mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SimpleObject)]
#[graphql(name = "DeletePayload")]
pub struct DeletePayload {
  pub success: bool,
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use golazo_core::reaction::ReactionKind;

  use super::*;

  fn ana() -> User { User { user_id: 1, username: "ana".into() } }

  #[test]
  fn tweet_view_counts_children() {
    let at = Utc.with_ymd_and_hms(2024, 6, 14, 21, 0, 0).unwrap();
    let tweet = Tweet {
      tweet_id:   3,
      content:    "Best goal ever".into(),
      subject:    "Messi".into(),
      author:     Some(ana()),
      photo_url:  String::new(),
      created_at: at,
    };
    let comment = Comment {
      comment_id: 10,
      user:       ana(),
      tweet_id:   3,
      text:       "Wow".into(),
      created_at: at,
    };
    let reaction = Reaction {
      reaction_id: 20,
      user:        ana(),
      tweet_id:    3,
      kind:        ReactionKind::Goat,
    };

    let view = TweetView::build(tweet, vec![comment], vec![reaction]);
    assert_eq!(view.comment_count, 1);
    assert_eq!(view.reaction_count, 1);
    assert_eq!(view.created_at, "2024-06-14T21:00:00Z");
    assert_eq!(view.reactions[0].reaction_type, "goat");
    assert_eq!(view.author, Some(UserView { id: 1, username: "ana".into() }));
  }
}
