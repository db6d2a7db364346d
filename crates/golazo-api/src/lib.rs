//! Query and mutation handlers for the Golazo feed.
//!
//! Every handler takes the store and, for mutations, the [`Caller`]
//! explicitly. Handlers enforce authentication, ownership and input
//! validation, then return typed [`views`]. Identity resolution and
//! transport are the caller's responsibility.
//!
//! | Operation | Handler | Auth |
//! |-----------|---------|------|
//! | `tweets(search, first, skip)` | [`tweets::list`] | none |
//! | `createTweet` | [`tweets::create`] | required |
//! | `deleteTweet` | [`tweets::delete`] | owner |
//! | `reactions` | [`reactions::list`] | none |
//! | `createReaction` | [`reactions::create`] | required |
//! | `deleteReaction` | [`reactions::delete`] | owner |
//! | `comments(tweetId)` | [`comments::list`] | none |
//! | `createComment` | [`comments::create`] | required |
//! | `deleteComment` | [`comments::delete`] | owner |

pub mod comments;
pub mod error;
pub mod reactions;
pub mod tweets;
pub mod views;

use golazo_core::user::{Caller, User};

pub use error::ApiError;

/// The signed-in user, or [`ApiError::AuthenticationRequired`] naming the
/// attempted `action`.
pub(crate) fn signed_in<'c>(
  caller: &'c Caller,
  action: &'static str,
) -> Result<&'c User, ApiError> {
  caller.user().ok_or(ApiError::AuthenticationRequired(action))
}
