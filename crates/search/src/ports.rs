//! Seam between the search service and persistent storage.

use async_trait::async_trait;

use comicseek_core::{Comic, SeekError};

/// Read side of comic persistence.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Ids of every comic whose stem set contains `keyword`.
    async fn search(&self, keyword: &str) -> Result<Vec<i32>, SeekError>;

    /// Full row for one comic. `NotFound` for ids that were never persisted.
    async fn get(&self, id: i32) -> Result<Comic, SeekError>;

    /// Largest persisted id, 0 when the table is empty.
    async fn max_id(&self) -> Result<i32, SeekError>;
}
