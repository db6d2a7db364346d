//! Reaction handlers.

use golazo_core::{
  reaction::{NewReaction, ReactionId, ReactionKind},
  store::FeedStore,
  tweet::TweetId,
  user::Caller,
};

use crate::{
  error::ApiError,
  signed_in,
  views::{DeletePayload, ReactionView},
};

/// `reactions`: every reaction, unfiltered.
pub async fn list<S>(store: &S) -> Result<Vec<ReactionView>, ApiError>
where
  S: FeedStore,
{
  let reactions = store.list_reactions(None).await.map_err(ApiError::store)?;
  Ok(reactions.into_iter().map(ReactionView::from).collect())
}

/// `createReaction(tweetId, reactionType)`.
///
/// Reacting again to the same tweet replaces the caller's previous reaction
/// type; the reaction keeps its id.
pub async fn create<S>(
  store: &S,
  caller: &Caller,
  tweet_id: TweetId,
  reaction_type: &str,
) -> Result<ReactionView, ApiError>
where
  S: FeedStore,
{
  let user = signed_in(caller, "react")?;
  let kind = ReactionKind::parse(reaction_type)?;

  let reaction = store
    .react(NewReaction { user: user.user_id, tweet_id, kind })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("tweet {tweet_id}")))?;

  tracing::info!(
    reaction_id = reaction.reaction_id,
    tweet_id,
    user_id = user.user_id,
    kind = %kind,
    "reaction recorded"
  );
  Ok(reaction.into())
}

/// `deleteReaction(reactionId)`: only the reacting user may delete.
pub async fn delete<S>(
  store: &S,
  caller: &Caller,
  reaction_id: ReactionId,
) -> Result<DeletePayload, ApiError>
where
  S: FeedStore,
{
  let user = signed_in(caller, "delete a reaction")?;

  let deleted = store
    .delete_reaction(reaction_id, user.user_id)
    .await
    .map_err(ApiError::store)?;
  if !deleted {
    tracing::debug!(reaction_id, user_id = user.user_id, "reaction delete refused");
    return Err(ApiError::NotFoundOrForbidden("reaction".into()));
  }

  tracing::info!(reaction_id, user_id = user.user_id, "reaction deleted");
  Ok(DeletePayload { success: true })
}
