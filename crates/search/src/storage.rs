//! Postgres persistence, read side.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use comicseek_core::{Comic, SeekError};

use crate::ports::SearchStore;

pub struct Storage {
    pool: PgPool,
}

impl Storage {
    /// Connect without migrating; the update service owns the schema.
    pub async fn connect(url: &str) -> Result<Self, SeekError> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| SeekError::Storage(format!("connection problem: {e}")))?;
        info!("connected to postgres");
        Ok(Self { pool })
    }
}

#[async_trait]
impl SearchStore for Storage {
    async fn search(&self, keyword: &str) -> Result<Vec<i32>, SeekError> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM comics WHERE $1 = ANY(words)")
            .bind(keyword)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SeekError::Storage(format!("search by {keyword}: {e}")))
    }

    async fn get(&self, id: i32) -> Result<Comic, SeekError> {
        let row: Option<(String, Vec<String>)> =
            sqlx::query_as("SELECT url, words FROM comics WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| SeekError::Storage(format!("get comic {id}: {e}")))?;
        match row {
            Some((url, words)) => Ok(Comic { id, url, words }),
            None => Err(SeekError::NotFound(format!("comic {id}"))),
        }
    }

    async fn max_id(&self) -> Result<i32, SeekError> {
        sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM comics")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SeekError::Storage(format!("max id: {e}")))
    }
}
