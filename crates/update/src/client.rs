//! Client for the update service, used by the gateway.

use reqwest::StatusCode;

use comicseek_core::{SeekError, UpdateStats, UpdateStatus};

use crate::api::StatusResponse;

pub struct UpdateClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpdateClient {
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
            .map_err(|e| SeekError::Unavailable(format!("update service: {e}")))?;
        if !resp.status().is_success() {
            return Err(SeekError::Unavailable(format!(
                "update service returned {}",
                resp.status()
            )));
        }
        Ok(())
    }

    pub async fn update(&self) -> Result<(), SeekError> {
        let resp = self
            .http
            .post(format!("{}/update", self.base_url))
            .send()
            .await
            .map_err(|e| SeekError::Unavailable(format!("update service: {e}")))?;
        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT => {
                Err(SeekError::AlreadyExists("update already running".into()))
            }
            s => Err(SeekError::Internal(format!("update service returned {s}"))),
        }
    }

    pub async fn status(&self) -> Result<UpdateStatus, SeekError> {
        let resp = self
            .http
            .get(format!("{}/status", self.base_url))
            .send()
            .await
            .map_err(|e| SeekError::Unavailable(format!("update service: {e}")))?;
        if !resp.status().is_success() {
            return Err(SeekError::Internal(format!(
                "update service returned {}",
                resp.status()
            )));
        }
        let body: StatusResponse = resp
            .json()
            .await
            .map_err(|e| SeekError::Internal(format!("bad status reply: {e}")))?;
        Ok(body.status)
    }

    pub async fn stats(&self) -> Result<UpdateStats, SeekError> {
        let resp = self
            .http
            .get(format!("{}/stats", self.base_url))
            .send()
            .await
            .map_err(|e| SeekError::Unavailable(format!("update service: {e}")))?;
        if !resp.status().is_success() {
            return Err(SeekError::Internal(format!(
                "update service returned {}",
                resp.status()
            )));
        }
        resp.json()
            .await
            .map_err(|e| SeekError::Internal(format!("bad stats reply: {e}")))
    }

    pub async fn drop_comics(&self) -> Result<(), SeekError> {
        let resp = self
            .http
            .delete(format!("{}/comics", self.base_url))
            .send()
            .await
            .map_err(|e| SeekError::Unavailable(format!("update service: {e}")))?;
        if !resp.status().is_success() {
            return Err(SeekError::Internal(format!(
                "update service returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}
