//! The `FeedStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `golazo-store-sqlite`).
//! Higher layers (`golazo-api`, `golazo-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  comment::{Comment, CommentId, NewComment},
  reaction::{NewReaction, Reaction, ReactionId},
  tweet::{NewTweet, Tweet, TweetId, TweetThread},
  user::UserId,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`FeedStore::list_tweets`].
///
/// Applied in order: `search` filter, then `offset`, then `limit`. Results
/// are ordered by creation time, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TweetQuery {
  /// Substring matched against content or subject, ignoring case (Unicode
  /// lowercase folding).
  pub search: Option<String>,
  pub offset: Option<usize>,
  pub limit:  Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a feed storage backend.
///
/// Every write is a single transaction. Ownership-guarded deletes return
/// `false` when no row with that id is owned by `owner`; the two cases are
/// not distinguished.
pub trait FeedStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Tweets ────────────────────────────────────────────────────────────

  /// Persist a new tweet. The `created_at` timestamp is set by the store.
  fn create_tweet(
    &self,
    input: NewTweet,
  ) -> impl Future<Output = Result<Tweet, Self::Error>> + Send + '_;

  /// Retrieve a tweet by id. Returns `None` if not found.
  fn get_tweet(
    &self,
    id: TweetId,
  ) -> impl Future<Output = Result<Option<Tweet>, Self::Error>> + Send + '_;

  /// Tweets matching `query`, each with its comments and reactions. The
  /// tweets and their children are read in one transaction.
  fn list_tweets<'a>(
    &'a self,
    query: &'a TweetQuery,
  ) -> impl Future<Output = Result<Vec<TweetThread>, Self::Error>> + Send + 'a;

  /// Delete a tweet owned by `owner` together with all of its reactions and
  /// comments, atomically.
  fn delete_tweet(
    &self,
    id: TweetId,
    owner: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reactions ─────────────────────────────────────────────────────────

  /// Insert the reaction, or overwrite the kind of the reaction the same user
  /// already left on the same tweet. Returns `None` if the tweet does not
  /// exist.
  fn react(
    &self,
    input: NewReaction,
  ) -> impl Future<Output = Result<Option<Reaction>, Self::Error>> + Send + '_;

  /// All reactions, or only those on `tweet_id`.
  fn list_reactions(
    &self,
    tweet_id: Option<TweetId>,
  ) -> impl Future<Output = Result<Vec<Reaction>, Self::Error>> + Send + '_;

  fn delete_reaction(
    &self,
    id: ReactionId,
    owner: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Persist a new comment. Returns `None` if the tweet does not exist.
  fn add_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// All comments, or only those on `tweet_id`, oldest first.
  fn list_comments(
    &self,
    tweet_id: Option<TweetId>,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  fn delete_comment(
    &self,
    id: CommentId,
    owner: UserId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
