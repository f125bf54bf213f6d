//! Ingestion pass orchestration.
//!
//! One pass: diff persisted ids against the catalog cursor, fetch and
//! normalize the gap on a bounded worker pool, drain results through a
//! single writer. At most one pass runs per process.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use comicseek_core::{Comic, SeekError, UpdateStats, UpdateStatus};
use comicseek_words::Normalizer;

use crate::ports::{ComicCatalog, UpdateStore};

pub struct UpdateService {
    store: Arc<dyn UpdateStore>,
    catalog: Arc<dyn ComicCatalog>,
    words: Arc<dyn Normalizer>,
    concurrency: usize,
    running: AtomicBool,
}

/// Clears the single-flight flag on every exit path.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl UpdateService {
    pub fn new(
        store: Arc<dyn UpdateStore>,
        catalog: Arc<dyn ComicCatalog>,
        words: Arc<dyn Normalizer>,
        concurrency: usize,
    ) -> Result<Self, SeekError> {
        if concurrency < 1 {
            return Err(SeekError::BadArguments(format!(
                "wrong concurrency specified: {concurrency}"
            )));
        }
        Ok(Self {
            store,
            catalog,
            words,
            concurrency,
            running: AtomicBool::new(false),
        })
    }

    pub fn status(&self) -> UpdateStatus {
        if self.running.load(Ordering::SeqCst) {
            UpdateStatus::Running
        } else {
            UpdateStatus::Idle
        }
    }

    /// Run one ingestion pass.
    ///
    /// Fails fast with `AlreadyExists` when a pass is in flight. Per-comic
    /// failures (fetch, normalize, insert) are logged and kept flowing into
    /// a first-error slot; the pass itself continues. A failure reading the
    /// persisted id set or the catalog cursor aborts the pass.
    ///
    /// Cancellation policy: once `cancel` fires, no new fetches are
    /// scheduled, in-flight fetches abort at their next await point, and the
    /// writer drains whatever the workers already produced.
    pub async fn update(&self, cancel: CancellationToken) -> Result<(), SeekError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SeekError::AlreadyExists("update already running".into()));
        }
        let _guard = RunningGuard(&self.running);

        let persisted: HashSet<i32> = self.store.ids().await?.into_iter().collect();
        let last_id = self.catalog.last_id().await?;
        let missing: Vec<i32> = (1..=last_id).filter(|id| !persisted.contains(id)).collect();
        info!(
            "ingestion pass: cursor {last_id}, {} persisted, {} to fetch",
            persisted.len(),
            missing.len()
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let (comic_tx, mut comic_rx) = mpsc::channel::<Comic>(self.concurrency);
        // First-error slot: non-blocking send, drop on full.
        let (err_tx, mut err_rx) = mpsc::channel::<SeekError>(1);

        let mut workers = JoinSet::new();
        for id in missing {
            let semaphore = Arc::clone(&semaphore);
            let catalog = Arc::clone(&self.catalog);
            let words = Arc::clone(&self.words);
            let comic_tx = comic_tx.clone();
            let err_tx = err_tx.clone();
            let cancel = cancel.clone();

            workers.spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return;
                };
                if cancel.is_cancelled() {
                    return;
                }

                let fetched = tokio::select! {
                    _ = cancel.cancelled() => return,
                    res = catalog.get(id) => res,
                };
                let info = match fetched {
                    Ok(info) => info,
                    Err(get_err) => {
                        warn!("failed to get comic {id}: {get_err}");
                        let _ = err_tx.try_send(get_err);
                        return;
                    }
                };

                let normed = tokio::select! {
                    _ = cancel.cancelled() => return,
                    res = words.norm(&info.description) => res,
                };
                let words = match normed {
                    Ok(words) => words,
                    Err(norm_err) => {
                        warn!("failed to normalize words for comic {id}: {norm_err}");
                        let _ = err_tx.try_send(norm_err);
                        return;
                    }
                };

                let _ = comic_tx
                    .send(Comic {
                        id: info.id,
                        url: info.url,
                        words,
                    })
                    .await;
            });
        }
        drop(comic_tx);

        // Single writer drains the result stream. The channel closes once
        // every worker has finished.
        let mut added = 0usize;
        while let Some(comic) = comic_rx.recv().await {
            let id = comic.id;
            if let Err(add_err) = self.store.add(comic).await {
                warn!("failed to add comic {id}: {add_err}");
                let _ = err_tx.try_send(add_err);
                continue;
            }
            added += 1;
        }
        while workers.join_next().await.is_some() {}
        info!("ingestion pass complete: {added} comics persisted");

        match err_rx.try_recv() {
            Ok(first_err) => Err(first_err),
            Err(_) => Ok(()),
        }
    }

    pub async fn stats(&self) -> Result<UpdateStats, SeekError> {
        let db = self.store.stats().await?;
        let comics_total = self.catalog.last_id().await?;
        Ok(UpdateStats {
            words_total: db.words_total,
            words_unique: db.words_unique,
            comics_fetched: db.comics_fetched,
            comics_total: i64::from(comics_total),
        })
    }

    pub async fn drop_comics(&self) -> Result<(), SeekError> {
        self.store.drop_comics().await
    }
}
