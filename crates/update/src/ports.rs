//! Seams between the ingestion pass and its collaborators.

use async_trait::async_trait;

use comicseek_core::{Comic, SeekError};

/// Metadata fetched for one comic from the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogInfo {
    pub id: i32,
    pub url: String,
    /// Concatenated prose sent to the normalizer.
    pub description: String,
}

/// Row counters backing `Stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DbStats {
    pub words_total: i64,
    pub words_unique: i64,
    pub comics_fetched: i64,
}

/// The remote comic archive.
#[async_trait]
pub trait ComicCatalog: Send + Sync {
    /// The largest comic id currently published (the catalog cursor).
    async fn last_id(&self) -> Result<i32, SeekError>;

    async fn get(&self, id: i32) -> Result<CatalogInfo, SeekError>;
}

/// Writable side of comic persistence.
#[async_trait]
pub trait UpdateStore: Send + Sync {
    async fn ids(&self) -> Result<Vec<i32>, SeekError>;

    async fn add(&self, comic: Comic) -> Result<(), SeekError>;

    async fn stats(&self) -> Result<DbStats, SeekError>;

    /// Truncate every persisted comic row.
    async fn drop_comics(&self) -> Result<(), SeekError>;
}
