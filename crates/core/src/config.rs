use std::sync::Mutex;

/// Seam to the host's settings store.
///
/// The store owns the single persisted value this engine reads: the ordered
/// list of raw watch-list entries (`"market.symbol"` or
/// `"market.symbol:shares"`). The host is expected to forward its own
/// change notification for this key to [`QuoteBoard::watchlist_changed`].
///
/// [`QuoteBoard::watchlist_changed`]: crate::QuoteBoard::watchlist_changed
pub trait WatchlistStore: Send + Sync {
    /// Current raw entries, in configuration order.
    fn get(&self) -> Vec<String>;

    /// Replace the stored entries wholesale.
    fn set(&self, entries: Vec<String>);
}

/// In-memory store for tests and hosts without a durable settings layer.
#[derive(Debug, Default)]
pub struct MemoryWatchlistStore {
    entries: Mutex<Vec<String>>,
}

impl MemoryWatchlistStore {
    pub fn new(entries: Vec<String>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl WatchlistStore for MemoryWatchlistStore {
    fn get(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn set(&self, entries: Vec<String>) {
        *self.entries.lock().unwrap_or_else(|e| e.into_inner()) = entries;
    }
}
