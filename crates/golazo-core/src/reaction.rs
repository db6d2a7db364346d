//! Reactions: one user's current response to a tweet.
//!
//! A user holds at most one reaction per tweet. Reacting again replaces the
//! kind of the existing reaction instead of adding a second one.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
  error::{Error, Result},
  tweet::TweetId,
  user::{User, UserId},
};

pub type ReactionId = i64;

/// The fixed set of reactions a user can leave on a tweet.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReactionKind {
  Like,
  Love,
  Angry,
  Sad,
  Goat,
}

impl ReactionKind {
  /// Parse a reaction kind, ignoring ASCII case.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s.trim()).map_err(|_| Error::UnknownReactionKind(s.to_owned()))
  }

  pub fn as_str(self) -> &'static str { self.into() }
}

/// A persisted reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
  pub reaction_id: ReactionId,
  pub user:        User,
  pub tweet_id:    TweetId,
  pub kind:        ReactionKind,
}

/// Input for [`FeedStore::react`](crate::store::FeedStore::react).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewReaction {
  pub user:     UserId,
  pub tweet_id: TweetId,
  pub kind:     ReactionKind,
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn parse_ignores_case_and_whitespace() {
    assert_eq!(ReactionKind::parse("GOAT").unwrap(), ReactionKind::Goat);
    assert_eq!(ReactionKind::parse(" love ").unwrap(), ReactionKind::Love);
  }

  #[test]
  fn parse_rejects_unknown_kind() {
    assert_eq!(
      ReactionKind::parse("meh"),
      Err(Error::UnknownReactionKind("meh".into()))
    );
  }

  #[test]
  fn display_round_trips_through_parse() {
    for kind in ReactionKind::iter() {
      assert_eq!(kind.to_string(), kind.as_str());
      assert_eq!(ReactionKind::parse(kind.as_str()).unwrap(), kind);
    }
  }
}
