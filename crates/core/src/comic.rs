use serde::{Deserialize, Serialize};

/// A single archived comic: stable id, image URL, and the stemmed keyword
/// set derived from its prose at ingestion time.
///
/// Rows are immutable once written; an administrative drop is the only way
/// they disappear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub id: i32,
    pub url: String,
    pub words: Vec<String>,
}

/// Whether an ingestion pass is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Idle,
    Running,
}

/// Counters reported by the update service.
///
/// `comics_total` is the remote catalog cursor; the rest are derived from
/// persisted rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStats {
    pub words_total: i64,
    pub words_unique: i64,
    pub comics_fetched: i64,
    pub comics_total: i64,
}
