//! Ranked keyword search over two strategies: per-stem storage queries and
//! the in-memory inverted index.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use comicseek_core::{Comic, SeekError};
use comicseek_words::Normalizer;

use crate::index::SearchIndex;
use crate::ports::SearchStore;

/// Bounded fan-out for per-stem storage lookups.
const NUM_WORKERS: usize = 3;

/// Results of one query. `error` carries the first per-stem or
/// materialization failure; the comics collected before it are kept.
pub struct SearchOutcome {
    pub comics: Vec<Comic>,
    pub error: Option<SeekError>,
}

pub struct SearchService {
    store: Arc<dyn SearchStore>,
    words: Arc<dyn Normalizer>,
    index: SearchIndex,
}

impl SearchService {
    pub fn new(store: Arc<dyn SearchStore>, words: Arc<dyn Normalizer>) -> Self {
        Self {
            store,
            words,
            index: SearchIndex::new(),
        }
    }

    /// Storage-backed search: every stem of `phrase` is resolved with a
    /// `WHERE $1 = ANY(words)` query on a pool of `NUM_WORKERS` lookups.
    ///
    /// A normalizer failure fails the whole query. Per-stem lookup failures
    /// are logged, the first one is kept, and the remaining stems still count.
    pub async fn search(&self, phrase: &str, limit: usize) -> Result<SearchOutcome, SeekError> {
        let stems = self.words.norm(phrase).await?;

        let lookups: Vec<Result<Vec<i32>, SeekError>> = stream::iter(stems)
            .map(|stem| {
                let store = Arc::clone(&self.store);
                async move { store.search(&stem).await }
            })
            .buffer_unordered(NUM_WORKERS)
            .collect()
            .await;

        let mut first_err = None;
        let mut counts: HashMap<i32, usize> = HashMap::new();
        for lookup in lookups {
            match lookup {
                Ok(ids) => {
                    for id in ids {
                        *counts.entry(id).or_insert(0) += 1;
                    }
                }
                Err(err) => {
                    warn!("per-stem lookup failed: {err}");
                    first_err.get_or_insert(err);
                }
            }
        }

        let (comics, materialize_err) = self.materialize(rank(counts), limit).await;
        Ok(SearchOutcome {
            comics,
            error: first_err.or(materialize_err),
        })
    }

    /// Index-backed search: same ranking model, stem lookups served from the
    /// in-memory inverted index.
    pub async fn search_index(
        &self,
        phrase: &str,
        limit: usize,
    ) -> Result<SearchOutcome, SeekError> {
        let stems = self.words.norm(phrase).await?;

        let mut counts: HashMap<i32, usize> = HashMap::new();
        for stem in &stems {
            for id in self.index.get(stem) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        let (comics, error) = self.materialize(rank(counts), limit).await;
        Ok(SearchOutcome { comics, error })
    }

    /// Rebuild the inverted index from storage.
    ///
    /// The fresh map is populated without touching the live index; the swap
    /// at the end is the only write under the lock. Ids inside the scanned
    /// range that were never persisted are catalog gaps, not errors.
    pub async fn build_index(&self) -> Result<(), SeekError> {
        let max_id = self.store.max_id().await?;

        let mut fresh: HashMap<String, Vec<i32>> = HashMap::new();
        for id in 1..=max_id {
            let comic = match self.store.get(id).await {
                Ok(comic) => comic,
                Err(SeekError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            };
            for word in comic.words {
                fresh.entry(word).or_default().push(id);
            }
        }

        let stems = fresh.len();
        self.index.replace(fresh);
        info!("index rebuilt: {stems} stems over {max_id} ids");
        Ok(())
    }

    /// Read comics in rank order until `limit` rows materialize
    /// (0 = no limit). A storage failure ends the walk; what was read
    /// so far is returned alongside the error.
    async fn materialize(
        &self,
        ranked: Vec<i32>,
        limit: usize,
    ) -> (Vec<Comic>, Option<SeekError>) {
        let mut comics = Vec::new();
        for id in ranked {
            if limit > 0 && comics.len() == limit {
                break;
            }
            match self.store.get(id).await {
                Ok(comic) => comics.push(comic),
                Err(err) => {
                    warn!("failed to get comic {id}: {err}");
                    return (comics, Some(err));
                }
            }
        }
        (comics, None)
    }
}

/// Descending match count, ties broken by ascending id.
fn rank(counts: HashMap<i32, usize>) -> Vec<i32> {
    let mut ids: Vec<i32> = counts.keys().copied().collect();
    ids.sort_unstable_by(|a, b| counts[b].cmp(&counts[a]).then(a.cmp(b)));
    ids
}
