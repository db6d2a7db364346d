//! Users and the per-request caller.
//!
//! Users belong to the identity component. The feed only ever references
//! them; nothing in the feed mutates a user row.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// A registered user as seen by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:  UserId,
  pub username: String,
}

/// Who is making the current request.
///
/// Resolved once per request by the identity layer and passed explicitly to
/// every handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Caller {
  #[default]
  Anonymous,
  User(User),
}

impl Caller {
  pub fn user(&self) -> Option<&User> {
    match self {
      Self::Anonymous => None,
      Self::User(u) => Some(u),
    }
  }

  pub fn is_anonymous(&self) -> bool { matches!(self, Self::Anonymous) }
}

/// Stored login material for one user.
#[derive(Debug, Clone)]
pub struct UserCredentials {
  pub user:          User,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// The identity component's user registry.
pub trait UserDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Register a user. Fails if `username` is already taken.
  fn add_user<'a>(
    &'a self,
    username: &'a str,
    password_hash: &'a str,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  /// Look up the credentials stored for `username`. Returns `None` if no such
  /// user exists.
  fn find_credentials<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<UserCredentials>, Self::Error>> + Send + 'a;
}
