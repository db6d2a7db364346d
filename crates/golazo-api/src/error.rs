//! API error type and its GraphQL representation.

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The caller is anonymous. Carries the attempted action, e.g. `"react"`.
  #[error("you must be logged in to {0}")]
  AuthenticationRequired(&'static str),

  #[error("not found: {0}")]
  NotFound(String),

  /// The row does not exist or belongs to someone else. The two cases are
  /// reported identically so non-owners learn nothing about other rows.
  #[error("{0} not found or you are not its owner")]
  NotFoundOrForbidden(String),

  #[error("invalid input: {0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  /// Stable machine-readable code, exposed as `extensions.code`.
  pub fn code(&self) -> &'static str {
    match self {
      Self::AuthenticationRequired(_) => "AUTHENTICATION_REQUIRED",
      Self::NotFound(_) => "NOT_FOUND",
      Self::NotFoundOrForbidden(_) => "NOT_FOUND_OR_FORBIDDEN",
      Self::Validation(_) => "VALIDATION_ERROR",
      Self::Store(_) => "INTERNAL",
    }
  }
}

impl From<golazo_core::Error> for ApiError {
  fn from(e: golazo_core::Error) -> Self { Self::Validation(e.to_string()) }
}

impl ErrorExtensions for ApiError {
  fn extend(&self) -> async_graphql::Error {
    async_graphql::Error::new(self.to_string())
      .extend_with(|_, e| e.set("code", self.code()))
  }
}
