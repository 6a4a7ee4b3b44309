//! PostgreSQL implementation of the comment store ports.
//!
//! The pool is created once at startup. Every request checks out one
//! connection, which goes back to the pool when the session is dropped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row};

use crate::config::DatabaseConfig;
use crate::domain::comment::Comment;
use crate::domain::foundation::{CommentId, Timestamp};
use crate::ports::{SessionPool, StoreError, StoreSession};

/// PostgreSQL-backed session pool.
#[derive(Clone)]
pub struct PostgresSessionPool {
    pool: PgPool,
}

impl PostgresSessionPool {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the database configuration and applies embedded
    /// migrations when enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(config.url())
            .await?;

        if config.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl SessionPool for PostgresSessionPool {
    async fn acquire(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;

        Ok(Box::new(PostgresSession { conn }))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// One pooled connection, exclusively owned by a request.
pub struct PostgresSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl StoreSession for PostgresSession {
    async fn insert_comment(&mut self, comment: &Comment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, author, text, "when")
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(comment.id().to_hex())
        .bind(comment.author())
        .bind(comment.text())
        .bind(comment.when().as_datetime())
        .execute(&mut *self.conn)
        .await
        .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(())
    }

    async fn recent_comments(&mut self, limit: usize) -> Result<Vec<Comment>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author, text, "when"
            FROM comments
            ORDER BY "when" DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| StoreError::backend(e.to_string()))?;

        rows.into_iter().map(row_to_comment).collect()
    }
}

fn row_to_comment(row: PgRow) -> Result<Comment, StoreError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| StoreError::backend(e.to_string()))?;
    let author: String = row
        .try_get("author")
        .map_err(|e| StoreError::backend(e.to_string()))?;
    let text: String = row
        .try_get("text")
        .map_err(|e| StoreError::backend(e.to_string()))?;
    let when: DateTime<Utc> = row
        .try_get("when")
        .map_err(|e| StoreError::backend(e.to_string()))?;

    let id = id
        .parse::<CommentId>()
        .map_err(|e| StoreError::backend(e.to_string()))?;

    Ok(Comment::reconstitute(
        id,
        author,
        text,
        Timestamp::from_datetime(when),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored

    async fn connect() -> PostgresSessionPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let config = DatabaseConfig::for_url(url);
        PostgresSessionPool::connect(&config)
            .await
            .expect("pool creation failed")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_then_list_returns_comment_first() {
        let pool = connect().await;
        let mut session = pool.acquire().await.expect("acquire failed");

        let comment = Comment::new("alice", "hi from postgres");
        session.insert_comment(&comment).await.expect("insert failed");

        let listed = session.recent_comments(100).await.expect("list failed");
        assert_eq!(listed.first().map(|c| c.id()), Some(comment.id()));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_id_is_a_backend_error() {
        let pool = connect().await;
        let mut session = pool.acquire().await.expect("acquire failed");

        let comment = Comment::new("alice", "twice");
        session.insert_comment(&comment).await.expect("insert failed");
        let again = session.insert_comment(&comment).await;

        assert!(matches!(again, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn closed_pool_is_unavailable() {
        let pool = connect().await;
        pool.close().await;

        assert!(matches!(
            pool.acquire().await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
