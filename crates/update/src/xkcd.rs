//! Client for the remote comic catalog.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use comicseek_core::SeekError;

use crate::ports::{CatalogInfo, ComicCatalog};

const INFO_ENDPOINT: &str = "info.0.json";

pub struct XkcdClient {
    http: reqwest::Client,
    base_url: String,
}

impl XkcdClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SeekError> {
        if base_url.is_empty() {
            return Err(SeekError::BadArguments("empty base url specified".into()));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SeekError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct CursorReply {
    num: i32,
}

#[derive(Deserialize)]
struct InfoReply {
    img: String,
    title: String,
    alt: String,
    safe_title: String,
    transcript: String,
}

#[async_trait]
impl ComicCatalog for XkcdClient {
    async fn last_id(&self) -> Result<i32, SeekError> {
        let resp = self
            .http
            .get(format!("{}/{INFO_ENDPOINT}", self.base_url))
            .send()
            .await
            .map_err(|e| SeekError::Unavailable(format!("catalog: {e}")))?;
        if !resp.status().is_success() {
            return Err(SeekError::Unavailable(format!(
                "catalog returned {}",
                resp.status()
            )));
        }
        let cursor: CursorReply = resp
            .json()
            .await
            .map_err(|e| SeekError::Internal(format!("bad cursor reply: {e}")))?;
        Ok(cursor.num)
    }

    async fn get(&self, id: i32) -> Result<CatalogInfo, SeekError> {
        let resp = self
            .http
            .get(format!("{}/{id}/{INFO_ENDPOINT}", self.base_url))
            .send()
            .await
            .map_err(|e| SeekError::Unavailable(format!("catalog: {e}")))?;

        match resp.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(SeekError::NotFound(format!("comic {id} not found")))
            }
            s => {
                return Err(SeekError::Unavailable(format!(
                    "catalog returned {s} for comic {id}"
                )))
            }
        }

        let info: InfoReply = resp
            .json()
            .await
            .map_err(|e| SeekError::Internal(format!("bad comic reply: {e}")))?;

        Ok(CatalogInfo {
            id,
            url: info.img,
            description: format!(
                "{} {} {} {}",
                info.alt, info.title, info.safe_title, info.transcript
            ),
        })
    }
}
