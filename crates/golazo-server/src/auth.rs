//! Identity provider: resolves each request to a [`Caller`] from HTTP Basic
//! credentials.
//!
//! A request without an `Authorization` header is anonymous. A request with
//! credentials that cannot be verified is rejected with 401 rather than
//! silently downgraded to anonymous.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use golazo_core::user::{Caller, UserDirectory};

use crate::{AppState, error::Error};

/// The resolved caller, available to any handler on [`AppState`].
pub struct CurrentCaller(pub Caller);

/// Resolve the caller from request headers against `directory`.
pub async fn resolve_caller<D>(headers: &HeaderMap, directory: &D) -> Result<Caller, Error>
where
  D: UserDirectory,
{
  let Some(header_val) = headers.get(header::AUTHORIZATION) else {
    return Ok(Caller::Anonymous);
  };

  let header_val = header_val.to_str().map_err(|_| Error::Unauthorized)?;
  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let Some(stored) = directory
    .find_credentials(username)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
  else {
    tracing::debug!(username, "unknown user");
    return Err(Error::Unauthorized);
  };

  let parsed_hash = PasswordHash::new(&stored.password_hash)
    .map_err(|_| Error::Unauthorized)?;

  if Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .is_err()
  {
    tracing::debug!(username, "password mismatch");
    return Err(Error::Unauthorized);
  }

  Ok(Caller::User(stored.user))
}

impl FromRequestParts<AppState> for CurrentCaller {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState,
  ) -> Result<Self, Self::Rejection> {
    resolve_caller(&parts.headers, state.store.as_ref())
      .await
      .map(CurrentCaller)
  }
}

/// Hash `password` into an argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  use argon2::{PasswordHasher, password_hash::SaltString};
  use rand_core::OsRng;

  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;
  use golazo_store_sqlite::SqliteStore;

  async fn directory() -> SqliteStore {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let hash = hash_password("secret").unwrap();
    store.add_user("ana", &hash).await.unwrap();
    store
  }

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  #[tokio::test]
  async fn correct_credentials() {
    let dir = directory().await;
    let caller = resolve_caller(&headers(&basic("ana", "secret")), &dir)
      .await
      .unwrap();
    assert_eq!(caller.user().map(|u| u.username.as_str()), Some("ana"));
  }

  #[tokio::test]
  async fn missing_header_is_anonymous() {
    let dir = directory().await;
    let caller = resolve_caller(&HeaderMap::new(), &dir).await.unwrap();
    assert!(caller.is_anonymous());
  }

  #[tokio::test]
  async fn wrong_password() {
    let dir = directory().await;
    let result = resolve_caller(&headers(&basic("ana", "wrong")), &dir).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn unknown_user() {
    let dir = directory().await;
    let result = resolve_caller(&headers(&basic("zoe", "secret")), &dir).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let dir = directory().await;
    let result = resolve_caller(&headers("Basic !!!not-base64!!!"), &dir).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }

  #[tokio::test]
  async fn non_basic_scheme() {
    let dir = directory().await;
    let result = resolve_caller(&headers("Bearer abc"), &dir).await;
    assert!(matches!(result, Err(Error::Unauthorized)));
  }
}
