//! Postgres persistence, write side.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use comicseek_core::{Comic, SeekError};

use crate::ports::{DbStats, UpdateStore};

pub struct Storage {
    pool: PgPool,
}

impl Storage {
    /// Connect and apply migrations. The update service is the schema owner;
    /// readers connect without migrating.
    pub async fn connect(url: &str) -> Result<Self, SeekError> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| SeekError::Storage(format!("connection problem: {e}")))?;
        sqlx::migrate!("../../migrations")
            .run(&pool)
            .await
            .map_err(|e| SeekError::Storage(format!("migrations failed: {e}")))?;
        info!("connected to postgres, migrations applied");
        Ok(Self { pool })
    }
}

#[async_trait]
impl UpdateStore for Storage {
    async fn ids(&self) -> Result<Vec<i32>, SeekError> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM comics")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SeekError::Storage(format!("select ids: {e}")))
    }

    async fn add(&self, comic: Comic) -> Result<(), SeekError> {
        sqlx::query("INSERT INTO comics (id, url, words) VALUES ($1, $2, $3)")
            .bind(comic.id)
            .bind(&comic.url)
            .bind(&comic.words)
            .execute(&self.pool)
            .await
            .map_err(|e| SeekError::Storage(format!("insert comic {}: {e}", comic.id)))?;
        Ok(())
    }

    async fn stats(&self) -> Result<DbStats, SeekError> {
        let words_total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(cardinality(words)), 0)::bigint FROM comics",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| SeekError::Storage(format!("count words: {e}")))?;

        let words_unique: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT word) FROM comics, unnest(words) AS word")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| SeekError::Storage(format!("count unique words: {e}")))?;

        let comics_fetched: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comics")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SeekError::Storage(format!("count comics: {e}")))?;

        Ok(DbStats {
            words_total,
            words_unique,
            comics_fetched,
        })
    }

    async fn drop_comics(&self) -> Result<(), SeekError> {
        // Only the comics table. Truncating everything in the schema would
        // also wipe the migrations ledger.
        sqlx::query("TRUNCATE TABLE comics")
            .execute(&self.pool)
            .await
            .map_err(|e| SeekError::Storage(format!("truncate comics: {e}")))?;
        Ok(())
    }
}
