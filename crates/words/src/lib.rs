pub mod api;
pub mod client;
pub mod normalize;
mod stopwords;

pub use client::{Normalizer, WordsClient};
pub use normalize::{normalize, MAX_PHRASE_LEN};
