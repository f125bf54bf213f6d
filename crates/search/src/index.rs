//! In-memory inverted index: stem → comic ids.

use std::collections::HashMap;
use std::sync::RwLock;

/// Readers take shared access for lookups; a rebuild populates a fresh map
/// off-lock and takes the write guard only for the final swap, so lookups
/// see either the previous or the next complete index, never a mix.
#[derive(Default)]
pub struct SearchIndex {
    map: RwLock<HashMap<String, Vec<i32>>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> Vec<i32> {
        self.map
            .read()
            .expect("index lock poisoned")
            .get(word)
            .cloned()
            .unwrap_or_default()
    }

    /// Publish a fully built index.
    pub fn replace(&self, fresh: HashMap<String, Vec<i32>>) {
        *self.map.write().expect("index lock poisoned") = fresh;
    }

    pub fn stem_count(&self) -> usize {
        self.map.read().expect("index lock poisoned").len()
    }
}
