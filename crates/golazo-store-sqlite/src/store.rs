//! [`SqliteStore`]: the SQLite implementation of [`FeedStore`] and
//! [`UserDirectory`].

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, SubsecRound as _, Utc};
use rusqlite::{OptionalExtension as _, functions::FunctionFlags};

use golazo_core::{
  comment::{Comment, CommentId, NewComment},
  reaction::{NewReaction, Reaction, ReactionId},
  store::{FeedStore, TweetQuery},
  tweet::{NewTweet, Tweet, TweetId, TweetThread},
  user::{User, UserCredentials, UserDirectory, UserId},
};

use crate::{
  encode::{
    COMMENT_COLUMNS, FOLD_FN, REACTION_COLUMNS, RawComment, RawCredentials,
    RawReaction, RawTweet, TWEET_COLUMNS, encode_dt, encode_reaction_kind,
    fold_case,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Golazo feed store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Current time at the precision the store persists.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        conn.create_scalar_function(
          FOLD_FN,
          1,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.as_deref().map(fold_case))
          },
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run arbitrary SQL against the connection, bypassing the trait API.
  #[cfg(test)]
  pub(crate) async fn execute_raw(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Delete the row `id` from `table` if `user_id` owns it.
  async fn delete_owned(
    &self,
    table: &'static str,
    id_column: &'static str,
    id: i64,
    owner: UserId,
  ) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          &format!("DELETE FROM {table} WHERE {id_column} = ?1 AND user_id = ?2"),
          rusqlite::params![id, owner],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }
}

// ─── FeedStore impl ──────────────────────────────────────────────────────────

impl FeedStore for SqliteStore {
  type Error = Error;

  // ── Tweets ────────────────────────────────────────────────────────────────

  async fn create_tweet(&self, input: NewTweet) -> Result<Tweet> {
    let created_at = now();
    let at_str     = encode_dt(created_at);
    let NewTweet { author, content, subject, photo_url } = input;

    let raw: RawTweet = self
      .conn
      .call(move |conn| {
        let tweet_id: i64 = conn.query_row(
          "INSERT INTO tweets (content, subject, author_id, photo_url, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           RETURNING tweet_id",
          rusqlite::params![content, subject, author, photo_url, at_str],
          |row| row.get(0),
        )?;

        Ok(conn.query_row(
          &format!("SELECT {TWEET_COLUMNS} WHERE t.tweet_id = ?1"),
          rusqlite::params![tweet_id],
          RawTweet::from_row,
        )?)
      })
      .await?;

    raw.into_tweet()
  }

  async fn get_tweet(&self, id: TweetId) -> Result<Option<Tweet>> {
    let raw: Option<RawTweet> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TWEET_COLUMNS} WHERE t.tweet_id = ?1"),
            rusqlite::params![id],
            RawTweet::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTweet::into_tweet).transpose()
  }

  async fn list_tweets(&self, query: &TweetQuery) -> Result<Vec<TweetThread>> {
    let needle = query
      .search
      .as_deref()
      .filter(|s| !s.is_empty())
      .map(fold_case);
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val  = query.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
    let offset_val = query.offset.map_or(0, |o| i64::try_from(o).unwrap_or(i64::MAX));

    let (raw_tweets, raw_comments, raw_reactions): (
      Vec<RawTweet>,
      Vec<RawComment>,
      Vec<RawReaction>,
    ) = self
      .conn
      .call(move |conn| {
        // Read-only; the transaction only pins one snapshot for all three
        // statements and is rolled back on drop.
        let tx = conn.transaction()?;

        let tweets = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {TWEET_COLUMNS}
             WHERE ?1 IS NULL
                OR instr({FOLD_FN}(t.content), ?1) > 0
                OR instr({FOLD_FN}(t.subject), ?1) > 0
             ORDER BY t.created_at ASC, t.tweet_id ASC
             LIMIT ?2 OFFSET ?3"
          ))?;
          let rows = stmt
            .query_map(
              rusqlite::params![needle, limit_val, offset_val],
              RawTweet::from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };
        if tweets.is_empty() {
          return Ok((tweets, Vec::new(), Vec::new()));
        }

        let ids: Vec<i64> = tweets.iter().map(|t| t.tweet_id).collect();
        let in_list = vec!["?"; ids.len()].join(", ");

        let comments = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {COMMENT_COLUMNS}
             WHERE c.tweet_id IN ({in_list})
             ORDER BY c.created_at ASC, c.comment_id ASC"
          ))?;
          let rows = stmt
            .query_map(rusqlite::params_from_iter(ids.iter()), RawComment::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };

        let reactions = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {REACTION_COLUMNS}
             WHERE r.tweet_id IN ({in_list})
             ORDER BY r.reaction_id ASC"
          ))?;
          let rows = stmt
            .query_map(rusqlite::params_from_iter(ids.iter()), RawReaction::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };

        Ok((tweets, comments, reactions))
      })
      .await?;

    let mut threads = raw_tweets
      .into_iter()
      .map(|raw| raw.into_tweet().map(TweetThread::new))
      .collect::<Result<Vec<_>>>()?;
    let index: HashMap<TweetId, usize> = threads
      .iter()
      .enumerate()
      .map(|(i, thread)| (thread.tweet.tweet_id, i))
      .collect();

    for raw in raw_comments {
      let comment = raw.into_comment()?;
      if let Some(&i) = index.get(&comment.tweet_id) {
        threads[i].comments.push(comment);
      }
    }
    for raw in raw_reactions {
      let reaction = raw.into_reaction()?;
      if let Some(&i) = index.get(&reaction.tweet_id) {
        threads[i].reactions.push(reaction);
      }
    }

    Ok(threads)
  }

  async fn delete_tweet(&self, id: TweetId, owner: UserId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let owned = tx
          .query_row(
            "SELECT 1 FROM tweets WHERE tweet_id = ?1 AND author_id = ?2",
            rusqlite::params![id, owner],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !owned {
          return Ok(false);
        }

        // Children first, then the tweet. Dropping `tx` on error rolls back.
        tx.execute("DELETE FROM reactions WHERE tweet_id = ?1", rusqlite::params![id])?;
        tx.execute("DELETE FROM comments WHERE tweet_id = ?1", rusqlite::params![id])?;
        tx.execute("DELETE FROM tweets WHERE tweet_id = ?1", rusqlite::params![id])?;

        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(deleted)
  }

  // ── Reactions ─────────────────────────────────────────────────────────────

  async fn react(&self, input: NewReaction) -> Result<Option<Reaction>> {
    let NewReaction { user, tweet_id, kind } = input;
    let kind_str = encode_reaction_kind(kind);

    let raw: Option<RawReaction> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let tweet_exists = tx
          .query_row(
            "SELECT 1 FROM tweets WHERE tweet_id = ?1",
            rusqlite::params![tweet_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !tweet_exists {
          return Ok(None);
        }

        let reaction_id: i64 = tx.query_row(
          "INSERT INTO reactions (user_id, tweet_id, reaction_type)
           VALUES (?1, ?2, ?3)
           ON CONFLICT (user_id, tweet_id)
             DO UPDATE SET reaction_type = excluded.reaction_type
           RETURNING reaction_id",
          rusqlite::params![user, tweet_id, kind_str],
          |row| row.get(0),
        )?;

        let raw = tx.query_row(
          &format!("SELECT {REACTION_COLUMNS} WHERE r.reaction_id = ?1"),
          rusqlite::params![reaction_id],
          RawReaction::from_row,
        )?;

        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawReaction::into_reaction).transpose()
  }

  async fn list_reactions(&self, tweet_id: Option<TweetId>) -> Result<Vec<Reaction>> {
    let raws: Vec<RawReaction> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {REACTION_COLUMNS}
           WHERE ?1 IS NULL OR r.tweet_id = ?1
           ORDER BY r.reaction_id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![tweet_id], RawReaction::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReaction::into_reaction).collect()
  }

  async fn delete_reaction(&self, id: ReactionId, owner: UserId) -> Result<bool> {
    self.delete_owned("reactions", "reaction_id", id, owner).await
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(&self, input: NewComment) -> Result<Option<Comment>> {
    let at_str = encode_dt(now());
    let NewComment { user, tweet_id, text } = input;

    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let tweet_exists = tx
          .query_row(
            "SELECT 1 FROM tweets WHERE tweet_id = ?1",
            rusqlite::params![tweet_id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !tweet_exists {
          return Ok(None);
        }

        let comment_id: i64 = tx.query_row(
          "INSERT INTO comments (user_id, tweet_id, text, created_at)
           VALUES (?1, ?2, ?3, ?4)
           RETURNING comment_id",
          rusqlite::params![user, tweet_id, text, at_str],
          |row| row.get(0),
        )?;

        let raw = tx.query_row(
          &format!("SELECT {COMMENT_COLUMNS} WHERE c.comment_id = ?1"),
          rusqlite::params![comment_id],
          RawComment::from_row,
        )?;

        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawComment::into_comment).transpose()
  }

  async fn list_comments(&self, tweet_id: Option<TweetId>) -> Result<Vec<Comment>> {
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMMENT_COLUMNS}
           WHERE ?1 IS NULL OR c.tweet_id = ?1
           ORDER BY c.created_at ASC, c.comment_id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![tweet_id], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn delete_comment(&self, id: CommentId, owner: UserId) -> Result<bool> {
    self.delete_owned("comments", "comment_id", id, owner).await
  }
}

// ─── UserDirectory impl ──────────────────────────────────────────────────────

impl UserDirectory for SqliteStore {
  type Error = Error;

  async fn add_user(&self, username: &str, password_hash: &str) -> Result<User> {
    let name   = username.to_owned();
    let hash   = password_hash.to_owned();
    let at_str = encode_dt(now());

    let user_id: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let taken = tx
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![name],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(None);
        }

        let user_id: i64 = tx.query_row(
          "INSERT INTO users (username, password_hash, created_at)
           VALUES (?1, ?2, ?3)
           RETURNING user_id",
          rusqlite::params![name, hash, at_str],
          |row| row.get(0),
        )?;

        tx.commit()?;
        Ok(Some(user_id))
      })
      .await?;

    let user_id = user_id.ok_or_else(|| Error::UsernameTaken(username.to_owned()))?;
    Ok(User { user_id, username: username.to_owned() })
  }

  async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
    let name = username.to_owned();

    let raw: Option<RawCredentials> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, username, password_hash, created_at
             FROM users WHERE username = ?1",
            rusqlite::params![name],
            RawCredentials::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCredentials::into_credentials).transpose()
  }
}
