//! GraphQL schema: root objects that adapt the `golazo-api` handlers.
//!
//! Resolvers pull the store and the per-request [`Caller`] out of the
//! execution context. The caller is attached to each request by the HTTP
//! layer; a request without one is treated as anonymous.

use std::sync::Arc;

use async_graphql::{
  Context, EmptySubscription, ErrorExtensions, Object, Result, Schema,
};
use golazo_api::{
  comments, reactions,
  tweets::{self, CreateParams, ListParams},
  views::{CommentView, DeletePayload, ReactionView, TweetView, UserView},
};
use golazo_core::user::Caller;
use golazo_store_sqlite::SqliteStore;

pub type FeedSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

type Store = SqliteStore;

fn caller(ctx: &Context<'_>) -> Caller {
  ctx.data_opt::<Caller>().cloned().unwrap_or_default()
}

/// Build the executable schema over `store`.
pub fn build_schema(store: Arc<Store>, depth_limit: usize) -> FeedSchema {
  Schema::build(QueryRoot, MutationRoot, EmptySubscription)
    .data(store)
    .limit_depth(depth_limit)
    .finish()
}

// ─── Queries ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
  /// Tweets in creation order, optionally filtered by a case-insensitive
  /// substring of content or subject, then paginated.
  async fn tweets(
    &self,
    ctx: &Context<'_>,
    search: Option<String>,
    first: Option<i32>,
    skip: Option<i32>,
  ) -> Result<Vec<TweetView>> {
    let store = ctx.data::<Arc<Store>>()?;
    tweets::list(store.as_ref(), ListParams { search, first, skip })
      .await
      .map_err(|e| e.extend())
  }

  async fn reactions(&self, ctx: &Context<'_>) -> Result<Vec<ReactionView>> {
    let store = ctx.data::<Arc<Store>>()?;
    reactions::list(store.as_ref()).await.map_err(|e| e.extend())
  }

  /// All comments, or only those on `tweet_id` when given.
  async fn comments(
    &self,
    ctx: &Context<'_>,
    tweet_id: Option<i64>,
  ) -> Result<Vec<CommentView>> {
    let store = ctx.data::<Arc<Store>>()?;
    comments::list(store.as_ref(), tweet_id)
      .await
      .map_err(|e| e.extend())
  }

  /// The signed-in user, or null for anonymous requests.
  async fn me(&self, ctx: &Context<'_>) -> Option<UserView> {
    caller(ctx).user().cloned().map(UserView::from)
  }
}

// ─── Mutations ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
  async fn create_tweet(
    &self,
    ctx: &Context<'_>,
    content: String,
    subject: String,
    photo_url: Option<String>,
  ) -> Result<TweetView> {
    let store = ctx.data::<Arc<Store>>()?;
    let params = CreateParams { content, subject, photo_url };
    tweets::create(store.as_ref(), &caller(ctx), params)
      .await
      .map_err(|e| e.extend())
  }

  /// Deletes the tweet together with its reactions and comments.
  async fn delete_tweet(
    &self,
    ctx: &Context<'_>,
    tweet_id: i64,
  ) -> Result<DeletePayload> {
    let store = ctx.data::<Arc<Store>>()?;
    tweets::delete(store.as_ref(), &caller(ctx), tweet_id)
      .await
      .map_err(|e| e.extend())
  }

  /// Records the caller's reaction, replacing any earlier one on the same
  /// tweet.
  async fn create_reaction(
    &self,
    ctx: &Context<'_>,
    tweet_id: i64,
    reaction_type: String,
  ) -> Result<ReactionView> {
    let store = ctx.data::<Arc<Store>>()?;
    reactions::create(store.as_ref(), &caller(ctx), tweet_id, &reaction_type)
      .await
      .map_err(|e| e.extend())
  }

  async fn delete_reaction(
    &self,
    ctx: &Context<'_>,
    reaction_id: i64,
  ) -> Result<DeletePayload> {
    let store = ctx.data::<Arc<Store>>()?;
    reactions::delete(store.as_ref(), &caller(ctx), reaction_id)
      .await
      .map_err(|e| e.extend())
  }

  async fn create_comment(
    &self,
    ctx: &Context<'_>,
    tweet_id: i64,
    text: String,
  ) -> Result<CommentView> {
    let store = ctx.data::<Arc<Store>>()?;
    comments::create(store.as_ref(), &caller(ctx), tweet_id, text)
      .await
      .map_err(|e| e.extend())
  }

  async fn delete_comment(
    &self,
    ctx: &Context<'_>,
    comment_id: i64,
  ) -> Result<DeletePayload> {
    let store = ctx.data::<Arc<Store>>()?;
    comments::delete(store.as_ref(), &caller(ctx), comment_id)
      .await
      .map_err(|e| e.extend())
  }
}
