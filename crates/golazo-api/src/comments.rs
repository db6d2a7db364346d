//! Comment handlers.

use golazo_core::{
  comment::{CommentId, NewComment},
  store::FeedStore,
  tweet::TweetId,
  user::Caller,
};

use crate::{
  error::ApiError,
  signed_in,
  views::{CommentView, DeletePayload},
};

/// `comments(tweetId)`: all comments, or only those on `tweet_id`. A
/// `tweet_id` of `0` counts as not given.
pub async fn list<S>(store: &S, tweet_id: Option<TweetId>) -> Result<Vec<CommentView>, ApiError>
where
  S: FeedStore,
{
  let tweet_id = tweet_id.filter(|&id| id != 0);
  let comments = store.list_comments(tweet_id).await.map_err(ApiError::store)?;
  Ok(comments.into_iter().map(CommentView::from).collect())
}

/// `createComment(tweetId, text)`.
pub async fn create<S>(
  store: &S,
  caller: &Caller,
  tweet_id: TweetId,
  text: String,
) -> Result<CommentView, ApiError>
where
  S: FeedStore,
{
  let user = signed_in(caller, "comment")?;
  let input = NewComment::new(user.user_id, tweet_id, text)?;

  let comment = store
    .add_comment(input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("tweet {tweet_id}")))?;

  tracing::info!(
    comment_id = comment.comment_id,
    tweet_id,
    user_id = user.user_id,
    "comment added"
  );
  Ok(comment.into())
}

/// `deleteComment(commentId)`: only the comment's author may delete.
pub async fn delete<S>(
  store: &S,
  caller: &Caller,
  comment_id: CommentId,
) -> Result<DeletePayload, ApiError>
where
  S: FeedStore,
{
  let user = signed_in(caller, "delete a comment")?;

  let deleted = store
    .delete_comment(comment_id, user.user_id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    tracing::debug!(comment_id, user_id = user.user_id, "comment delete refused");
    return Err(ApiError::NotFoundOrForbidden("comment".into()));
  }

  tracing::info!(comment_id, user_id = user.user_id, "comment deleted");
  Ok(DeletePayload { success: true })
}
