//! HTTP surface for the Golazo feed.
//!
//! Serves the GraphQL API at `POST /graphql` and a GraphiQL explorer at
//! `GET /graphql`. Each request is resolved to a
//! [`Caller`](golazo_core::user::Caller) by the
//! [`auth::CurrentCaller`] extractor before it reaches the executor.

pub mod auth;
pub mod error;
pub mod graphql;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
  Router,
  extract::State,
  response::{Html, IntoResponse},
  routing::get,
};
use golazo_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::CurrentCaller;
use graphql::FeedSchema;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GOLAZO_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  #[serde(default = "default_depth_limit")]
  pub query_depth_limit: usize,
}

fn default_depth_limit() -> usize { 10 }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
  pub store:  Arc<SqliteStore>,
  pub schema: FeedSchema,
}

impl AppState {
  /// Build the schema over `store`, applying the configured query limits.
  pub fn new(store: Arc<SqliteStore>, config: &ServerConfig) -> Self {
    let schema = graphql::build_schema(store.clone(), config.query_depth_limit);
    Self { store, schema }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the feed server.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/graphql", get(graphiql).post(graphql_handler))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn graphql_handler(
  State(state): State<AppState>,
  CurrentCaller(caller): CurrentCaller,
  req: GraphQLRequest,
) -> GraphQLResponse {
  state.schema.execute(req.into_inner().data(caller)).await.into()
}

async fn graphiql() -> impl IntoResponse {
  Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::body::Body;
  use axum::http::{Request, StatusCode, header};
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use golazo_core::user::UserDirectory;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state() -> AppState {
    let store = SqliteStore::open_in_memory().await.unwrap();
    for name in ["a", "b"] {
      let hash = auth::hash_password(&format!("{name}-pass")).unwrap();
      store.add_user(name, &hash).await.unwrap();
    }

    AppState::new(Arc::new(store), &ServerConfig {
      host:              "127.0.0.1".to_string(),
      port:              8000,
      store_path:        PathBuf::from(":memory:"),
      query_depth_limit: default_depth_limit(),
    })
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  fn as_user(user: &str) -> Option<String> {
    Some(auth_header(user, &format!("{user}-pass")))
  }

  async fn post_raw(
    state: &AppState,
    auth:  Option<String>,
    query: &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder()
      .method("POST")
      .uri("/graphql")
      .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    let body = json!({ "query": query }).to_string();
    let req = builder.body(Body::from(body)).unwrap();
    router(state.clone()).oneshot(req).await.unwrap()
  }

  async fn post(state: &AppState, auth: Option<String>, query: &str) -> Value {
    let resp = post_raw(state, auth, query).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn error_code(resp: &Value) -> &str {
    resp["errors"][0]["extensions"]["code"].as_str().unwrap_or_default()
  }

  // ── Transport ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn graphiql_page_is_served() {
    let state = make_state().await;
    let req = Request::builder()
      .uri("/graphql")
      .body(Body::empty())
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn wrong_password_returns_401_with_challenge() {
    let state = make_state().await;
    let resp = post_raw(&state, Some(auth_header("a", "nope")), "{ me { id } }").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let challenge = resp
      .headers()
      .get(header::WWW_AUTHENTICATE)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(challenge.starts_with("Basic"), "challenge: {challenge}");
  }

  // ── Identity ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn me_is_null_when_anonymous() {
    let state = make_state().await;
    let resp = post(&state, None, "{ me { id username } }").await;
    assert!(resp["data"]["me"].is_null());
  }

  #[tokio::test]
  async fn me_returns_signed_in_user() {
    let state = make_state().await;
    let resp = post(&state, as_user("b"), "{ me { username } }").await;
    assert_eq!(resp["data"]["me"]["username"], "b");
  }

  #[tokio::test]
  async fn anonymous_mutation_reports_authentication_required() {
    let state = make_state().await;
    let resp = post(
      &state,
      None,
      r#"mutation { createTweet(content: "hi", subject: "s") { id } }"#,
    )
    .await;
    assert_eq!(error_code(&resp), "AUTHENTICATION_REQUIRED");

    let listed = post(&state, None, "{ tweets { id } }").await;
    assert_eq!(listed["data"]["tweets"].as_array().unwrap().len(), 0);
  }

  // ── Errors ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn unknown_reaction_type_is_a_validation_error() {
    let state = make_state().await;
    let created = post(
      &state,
      as_user("a"),
      r#"mutation { createTweet(content: "c", subject: "s") { id } }"#,
    )
    .await;
    let id = created["data"]["createTweet"]["id"].as_i64().unwrap();

    let resp = post(
      &state,
      as_user("a"),
      &format!(r#"mutation {{ createReaction(tweetId: {id}, reactionType: "meh") {{ id }} }}"#),
    )
    .await;
    assert_eq!(error_code(&resp), "VALIDATION_ERROR");
  }

  #[tokio::test]
  async fn deleting_someone_elses_tweet_is_refused() {
    let state = make_state().await;
    let created = post(
      &state,
      as_user("a"),
      r#"mutation { createTweet(content: "c", subject: "s") { id } }"#,
    )
    .await;
    let id = created["data"]["createTweet"]["id"].as_i64().unwrap();

    let resp = post(
      &state,
      as_user("b"),
      &format!("mutation {{ deleteTweet(tweetId: {id}) {{ success }} }}"),
    )
    .await;
    assert_eq!(error_code(&resp), "NOT_FOUND_OR_FORBIDDEN");
  }

  // ── End to end ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn tweet_reaction_comment_lifecycle() {
    let state = make_state().await;

    let created = post(
      &state,
      as_user("a"),
      r#"mutation { createTweet(content: "Golazo!", subject: "Final") { id author { username } } }"#,
    )
    .await;
    let tweet = &created["data"]["createTweet"];
    let id = tweet["id"].as_i64().unwrap();
    assert_eq!(tweet["author"]["username"], "a");

    for kind in ["like", "goat"] {
      post(
        &state,
        as_user("b"),
        &format!(r#"mutation {{ createReaction(tweetId: {id}, reactionType: "{kind}") {{ id }} }}"#),
      )
      .await;
    }
    post(
      &state,
      as_user("b"),
      &format!(r#"mutation {{ createComment(tweetId: {id}, text: "nice") {{ id }} }}"#),
    )
    .await;

    let feed = post(
      &state,
      None,
      "{ tweets { id reactionCount commentCount reactions { reactionType } } }",
    )
    .await;
    let first = &feed["data"]["tweets"][0];
    assert_eq!(first["reactionCount"], 1);
    assert_eq!(first["commentCount"], 1);
    assert_eq!(first["reactions"][0]["reactionType"], "goat");

    let deleted = post(
      &state,
      as_user("a"),
      &format!("mutation {{ deleteTweet(tweetId: {id}) {{ success }} }}"),
    )
    .await;
    assert_eq!(deleted["data"]["deleteTweet"]["success"], true);

    let comments = post(&state, None, "{ comments { id } }").await;
    assert_eq!(comments["data"]["comments"].as_array().unwrap().len(), 0);
    let reactions = post(&state, None, "{ reactions { id } }").await;
    assert_eq!(reactions["data"]["reactions"].as_array().unwrap().len(), 0);
  }
}
