//! Client for the search service, used by the gateway.

use reqwest::StatusCode;

use comicseek_core::SeekError;

use crate::api::{ComicReply, SearchReply};

pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn ping(&self) -> Result<(), SeekError> {
        let resp = self
            .http
            .get(format!("{}/ping", self.base_url))
            .send()
            .await
            .map_err(|e| SeekError::Unavailable(format!("search service: {e}")))?;
        if !resp.status().is_success() {
            return Err(SeekError::Unavailable(format!(
                "search service returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    pub async fn search(&self, phrase: &str, limit: usize) -> Result<Vec<ComicReply>, SeekError> {
        self.query("search", phrase, limit).await
    }

    pub async fn search_index(
        &self,
        phrase: &str,
        limit: usize,
    ) -> Result<Vec<ComicReply>, SeekError> {
        self.query("isearch", phrase, limit).await
    }

    async fn query(
        &self,
        endpoint: &str,
        phrase: &str,
        limit: usize,
    ) -> Result<Vec<ComicReply>, SeekError> {
        let resp = self
            .http
            .get(format!("{}/{endpoint}", self.base_url))
            .query(&[("phrase", phrase), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(|e| SeekError::Unavailable(format!("search service: {e}")))?;

        match resp.status() {
            s if s.is_success() => {
                let body: SearchReply = resp
                    .json()
                    .await
                    .map_err(|e| SeekError::Internal(format!("bad search reply: {e}")))?;
                Ok(body.comics)
            }
            StatusCode::NOT_FOUND => Err(SeekError::NotFound("nothing found".into())),
            StatusCode::BAD_REQUEST => {
                Err(SeekError::BadArguments("search rejected the query".into()))
            }
            s => Err(SeekError::Internal(format!("search service returned {s}"))),
        }
    }
}
