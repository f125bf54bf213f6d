//! Seams between the gateway and its downstream services.

use async_trait::async_trait;

use comicseek_core::{SeekError, UpdateStats, UpdateStatus};
use comicseek_search::SearchClient;
use comicseek_update::UpdateClient;
use comicseek_words::WordsClient;

/// A comic as the public surface reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundComic {
    pub id: i32,
    pub url: String,
}

#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self) -> Result<(), SeekError>;
}

#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(&self, phrase: &str, limit: usize) -> Result<Vec<FoundComic>, SeekError>;

    async fn search_index(&self, phrase: &str, limit: usize)
        -> Result<Vec<FoundComic>, SeekError>;
}

#[async_trait]
pub trait UpdateApi: Send + Sync {
    async fn update(&self) -> Result<(), SeekError>;

    async fn status(&self) -> Result<UpdateStatus, SeekError>;

    async fn stats(&self) -> Result<UpdateStats, SeekError>;

    async fn drop_comics(&self) -> Result<(), SeekError>;
}

// ── Client adapters ─────────────────────────────────────────────

#[async_trait]
impl Pinger for WordsClient {
    async fn ping(&self) -> Result<(), SeekError> {
        WordsClient::ping(self).await
    }
}

#[async_trait]
impl Pinger for SearchClient {
    async fn ping(&self) -> Result<(), SeekError> {
        SearchClient::ping(self).await
    }
}

#[async_trait]
impl Pinger for UpdateClient {
    async fn ping(&self) -> Result<(), SeekError> {
        UpdateClient::ping(self).await
    }
}

#[async_trait]
impl SearchApi for SearchClient {
    async fn search(&self, phrase: &str, limit: usize) -> Result<Vec<FoundComic>, SeekError> {
        let comics = SearchClient::search(self, phrase, limit).await?;
        Ok(comics
            .into_iter()
            .map(|c| FoundComic { id: c.id, url: c.url })
            .collect())
    }

    async fn search_index(
        &self,
        phrase: &str,
        limit: usize,
    ) -> Result<Vec<FoundComic>, SeekError> {
        let comics = SearchClient::search_index(self, phrase, limit).await?;
        Ok(comics
            .into_iter()
            .map(|c| FoundComic { id: c.id, url: c.url })
            .collect())
    }
}

#[async_trait]
impl UpdateApi for UpdateClient {
    async fn update(&self) -> Result<(), SeekError> {
        UpdateClient::update(self).await
    }

    async fn status(&self) -> Result<UpdateStatus, SeekError> {
        UpdateClient::status(self).await
    }

    async fn stats(&self) -> Result<UpdateStats, SeekError> {
        UpdateClient::stats(self).await
    }

    async fn drop_comics(&self) -> Result<(), SeekError> {
        UpdateClient::drop_comics(self).await
    }
}
