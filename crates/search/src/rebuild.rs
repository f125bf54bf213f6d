//! Periodic index rebuild.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::service::SearchService;

/// Rebuilds the inverted index once at startup and then on every tick until
/// stopped.
pub struct IndexTicker {
    service: Arc<SearchService>,
    interval: Duration,
    cancel: CancellationToken,
}

impl IndexTicker {
    pub fn new(service: Arc<SearchService>, interval: Duration) -> Self {
        Self {
            service,
            interval,
            cancel: CancellationToken::new(),
        }
    }

    pub async fn run(&self) {
        if let Err(err) = self.service.build_index().await {
            error!("failed indexing: {err}");
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.tick().await; // the first tick completes immediately
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("index ticker stopped");
                    return;
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.service.build_index().await {
                        error!("failed indexing: {err}");
                    }
                }
            }
        }
    }

    /// Halt before the next tick.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}
