//! Tweet handlers: list, create, delete.

use golazo_core::{
  store::{FeedStore, TweetQuery},
  tweet::{NewTweet, TweetId},
  user::Caller,
};

use crate::{
  error::ApiError,
  signed_in,
  views::{DeletePayload, TweetView},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ListParams {
  /// Case-insensitive substring of content or subject. Empty means no filter.
  pub search: Option<String>,
  /// Maximum number of tweets to return. `0` means no limit.
  pub first:  Option<i32>,
  /// Number of matching tweets to skip.
  pub skip:   Option<i32>,
}

impl ListParams {
  fn into_query(self) -> Result<TweetQuery, ApiError> {
    Ok(TweetQuery {
      search: self.search.filter(|s| !s.is_empty()),
      offset: non_negative("skip", self.skip)?,
      limit:  non_negative("first", self.first)?,
    })
  }
}

/// Negative values are rejected; zero counts as "not given".
fn non_negative(name: &str, value: Option<i32>) -> Result<Option<usize>, ApiError> {
  match value {
    None | Some(0) => Ok(None),
    Some(n) => usize::try_from(n)
      .map(Some)
      .map_err(|_| ApiError::Validation(format!("{name} must not be negative"))),
  }
}

/// `tweets(search, first, skip)`: filter, then skip, then take `first`.
///
/// Each tweet arrives with its comments and reactions from a single store
/// read.
pub async fn list<S>(store: &S, params: ListParams) -> Result<Vec<TweetView>, ApiError>
where
  S: FeedStore,
{
  let query = params.into_query()?;
  let threads = store.list_tweets(&query).await.map_err(ApiError::store)?;
  Ok(threads.into_iter().map(TweetView::from).collect())
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CreateParams {
  pub content:   String,
  pub subject:   String,
  pub photo_url: Option<String>,
}

/// `createTweet(content, subject, photoUrl)`.
pub async fn create<S>(
  store: &S,
  caller: &Caller,
  params: CreateParams,
) -> Result<TweetView, ApiError>
where
  S: FeedStore,
{
  let user = signed_in(caller, "create a tweet")?;
  let input = NewTweet::new(user.user_id, params.content, params.subject, params.photo_url)?;

  let tweet = store.create_tweet(input).await.map_err(ApiError::store)?;
  tracing::info!(tweet_id = tweet.tweet_id, user_id = user.user_id, "tweet created");

  Ok(TweetView::build(tweet, Vec::new(), Vec::new()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `deleteTweet(tweetId)`: removes the tweet with its reactions and comments.
pub async fn delete<S>(
  store: &S,
  caller: &Caller,
  tweet_id: TweetId,
) -> Result<DeletePayload, ApiError>
where
  S: FeedStore,
{
  let user = signed_in(caller, "delete a tweet")?;

  let deleted = store
    .delete_tweet(tweet_id, user.user_id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    tracing::debug!(tweet_id, user_id = user.user_id, "tweet delete refused");
    return Err(ApiError::NotFoundOrForbidden("tweet".into()));
  }

  tracing::info!(tweet_id, user_id = user.user_id, "tweet deleted");
  Ok(DeletePayload { success: true })
}
