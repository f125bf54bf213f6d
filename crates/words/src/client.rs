//! Client for the words service, plus the `Normalizer` seam the other
//! services program against.

use async_trait::async_trait;
use reqwest::StatusCode;

use comicseek_core::SeekError;

use crate::api::{NormRequest, NormResponse};

/// Phrase → stem set. Implemented by `WordsClient` in production and by
/// in-memory fakes in tests.
#[async_trait]
pub trait Normalizer: Send + Sync {
    async fn norm(&self, phrase: &str) -> Result<Vec<String>, SeekError>;
}

pub struct WordsClient {
    http: reqwest::Client,
    base_url: String,
}

impl WordsClient {
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
            .map_err(|e| SeekError::Unavailable(format!("words service: {e}")))?;
        if !resp.status().is_success() {
            return Err(SeekError::Unavailable(format!(
                "words service returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Normalizer for WordsClient {
    async fn norm(&self, phrase: &str) -> Result<Vec<String>, SeekError> {
        let resp = self
            .http
            .post(format!("{}/norm", self.base_url))
            .json(&NormRequest {
                phrase: phrase.to_string(),
            })
            .send()
            .await
            .map_err(|e| SeekError::Unavailable(format!("words service: {e}")))?;

        match resp.status() {
            s if s.is_success() => {
                let body: NormResponse = resp
                    .json()
                    .await
                    .map_err(|e| SeekError::Internal(format!("bad norm reply: {e}")))?;
                Ok(body.words)
            }
            StatusCode::PAYLOAD_TOO_LARGE => Err(SeekError::BadArguments(
                "phrase rejected by words service".into(),
            )),
            s => Err(SeekError::Unavailable(format!(
                "words service returned {s}"
            ))),
        }
    }
}
