use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow, SqlitePool,
};
use time::OffsetDateTime;

use crate::schema::{Author, Comment, CommentRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to apply migrations: {0}")]
    Migration(#[from] MigrateError),
    #[error("column `{column}` holds an out-of-range timestamp: {value}")]
    InvalidTimestamp { column: &'static str, value: i64 },
}

/// Persistence layer the comment endpoints are served from.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// All comments whose post is `post_id`, in insertion order, with each
    /// author resolved to its username.
    async fn find_by_post(&self, post_id: &str) -> Result<Vec<Comment>, StoreError>;

    /// Removes the comment and returns it, or `None` if no such comment exists.
    async fn find_and_delete(&self, comment_id: &str)
        -> Result<Option<CommentRecord>, StoreError>;
}

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[derive(FromRow)]
struct ListedComment {
    id: String,
    post_id: String,
    username: Option<String>,
    contents: String,
    created_at: i64,
    updated_at: i64,
}

#[derive(FromRow)]
struct DeletedComment {
    id: String,
    post_id: String,
    author_id: String,
    contents: String,
}

fn timestamp(column: &'static str, value: i64) -> Result<OffsetDateTime, StoreError> {
    OffsetDateTime::from_unix_timestamp(value)
        .map_err(|_| StoreError::InvalidTimestamp { column, value })
}

impl TryFrom<ListedComment> for Comment {
    type Error = StoreError;

    fn try_from(row: ListedComment) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: row.id,
            post: row.post_id,
            author: row.username.map(|username| Author { username }),
            contents: row.contents,
            created_at: timestamp("created_at", row.created_at)?,
            updated_at: timestamp("updated_at", row.updated_at)?,
        })
    }
}

impl From<DeletedComment> for CommentRecord {
    fn from(row: DeletedComment) -> Self {
        CommentRecord {
            id: row.id,
            post_id: row.post_id,
            author_id: row.author_id,
            contents: row.contents,
        }
    }
}

#[async_trait]
impl CommentStore for SqliteStore {
    async fn find_by_post(&self, post_id: &str) -> Result<Vec<Comment>, StoreError> {
        // LEFT JOIN keeps comments whose author has since been removed
        let rows = sqlx::query_as::<_, ListedComment>(
            "SELECT c.id, c.post_id, u.username, c.contents, c.created_at, c.updated_at
             FROM Comments AS c
             LEFT JOIN Users AS u ON u.id = c.author_id
             WHERE c.post_id = ?1
             ORDER BY c.rowid",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn find_and_delete(
        &self,
        comment_id: &str,
    ) -> Result<Option<CommentRecord>, StoreError> {
        // Single statement, so concurrent deletes of one id see it at most once.
        // Nothing returned here may fail to decode: the row is already gone.
        let row = sqlx::query_as::<_, DeletedComment>(
            "DELETE FROM Comments WHERE id = ?1
             RETURNING id, post_id, author_id, contents",
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRecord::from))
    }
}
