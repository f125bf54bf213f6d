//! Phrase normalization: tokenize, lowercase, drop stop-words, stem, dedupe.

use std::collections::BTreeSet;

use rust_stemmers::{Algorithm, Stemmer};

use comicseek_core::SeekError;

use crate::stopwords::is_stop_word;

/// Hard cap on accepted phrase length, in bytes.
pub const MAX_PHRASE_LEN: usize = 4096;

/// Reduce a phrase to its set of distinct stems.
///
/// Tokens are split at any non-letter, non-digit character (Unicode-aware),
/// lowercased, filtered against the English stop-word table, and run through
/// the Snowball English stemmer. The result is sorted and deduplicated.
///
/// Empty and oversize phrases are rejected with `BadArguments`; the wire
/// adapter renders both as resource-exhausted.
pub fn normalize(phrase: &str) -> Result<Vec<String>, SeekError> {
    if phrase.is_empty() {
        return Err(SeekError::BadArguments("phrase is empty".into()));
    }
    if phrase.len() > MAX_PHRASE_LEN {
        return Err(SeekError::BadArguments("phrase size over 4KiB".into()));
    }

    let stemmer = Stemmer::create(Algorithm::English);
    let mut stems = BTreeSet::new();
    for token in phrase.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        let word = token.to_lowercase();
        if is_stop_word(&word) {
            continue;
        }
        let stem = stemmer.stem(&word).into_owned();
        if !stem.is_empty() {
            stems.insert(stem);
        }
    }

    Ok(stems.into_iter().collect())
}
