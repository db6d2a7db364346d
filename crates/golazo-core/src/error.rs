//! Error types for `golazo-core`.

use thiserror::Error;

/// Validation failures raised while building new feed entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  #[error("{field} must be at most {max} characters")]
  TooLong { field: &'static str, max: usize },

  #[error("unknown reaction type: {0:?}")]
  UnknownReactionKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reject blank (empty or whitespace-only) required text.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::EmptyField(field));
  }
  Ok(())
}
