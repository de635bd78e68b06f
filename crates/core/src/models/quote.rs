use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The latest normalized quote for one instrument.
///
/// All numeric fields are stored as pre-formatted decimal strings (fixed
/// precision per market) so the view layer never re-derives formatting.
/// `update_time` is the wall-clock time of the fetch batch that produced the
/// quote, shared by every quote in that batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// `"<market>.<symbol>"` code reconstructed from the provider record.
    pub code: String,
    pub name: String,
    pub current: String,
    pub change: String,
    pub change_percent: String,
    pub previous_close: String,
    pub update_time: String,
}

impl Quote {
    /// Numeric change value, re-parsed from the formatted field.
    /// A quote always carries a parseable change; fall back to flat on drift.
    pub fn change_value(&self) -> f64 {
        self.change.parse().unwrap_or(0.0)
    }
}

/// One completed fetch cycle: every quote the provider returned, plus the
/// shared wall-clock timestamp of the batch.
#[derive(Debug, Clone, Default)]
pub struct QuoteBatch {
    pub quotes: Vec<Quote>,
    pub fetched_at: String,
}

/// Latest quote per instrument code. Replaced wholesale at the end of every
/// cycle; a quote missing from a response simply has no entry until the
/// next successful cycle.
pub type QuoteCache = HashMap<String, Quote>;
