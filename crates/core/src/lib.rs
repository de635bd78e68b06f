pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod registry;
pub mod services;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use config::WatchlistStore;
use errors::CoreError;
use models::node::DisplayNode;
use models::quote::QuoteCache;
use providers::traits::QuoteProvider;
use registry::RegistryState;
use services::view_service::ViewService;

/// Default polling cadence of the refresh scheduler.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(3000);

/// Engine state guarded by one lock: everything a refresh cycle replaces
/// and everything the view builder reads.
struct EngineState {
    registry: RegistryState,
    cache: QuoteCache,
    /// Set until the first cycle completes; the root view shows a
    /// placeholder row while it is up.
    loading: bool,
    /// Timestamp of the last successful batch, if any cycle succeeded yet.
    last_update: Option<String>,
    /// The scheduler's timer task. At most one is live per engine.
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    provider: Arc<dyn QuoteProvider>,
    store: Arc<dyn WatchlistStore>,
    state: Mutex<EngineState>,
    /// Single-flight guard: a trigger arriving while a cycle is in flight
    /// is dropped; the next timer tick self-heals.
    in_flight: AtomicBool,
    /// Generation counter bumped once per completed cycle or config edit.
    notify: watch::Sender<u64>,
    view: ViewService,
}

/// Main entry point for the Quote Board core library.
///
/// Owns the quote cache, the instrument registry, and the refresh scheduler,
/// and serves the presentation layer's two node lists. A `QuoteBoard` is a
/// cheap cloneable handle; all clones share one engine.
#[must_use]
#[derive(Clone)]
pub struct QuoteBoard {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for QuoteBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("QuoteBoard")
            .field("provider", &self.inner.provider.name())
            .field("codes", &state.registry.codes.len())
            .field("cached_quotes", &state.cache.len())
            .field("loading", &state.loading)
            .finish()
    }
}

impl QuoteBoard {
    /// Create an engine over a quote provider and the host's watch-list
    /// store. The registry is loaded immediately; quotes arrive with the
    /// first refresh cycle.
    pub fn new(provider: Arc<dyn QuoteProvider>, store: Arc<dyn WatchlistStore>) -> Self {
        let registry = RegistryState::from_raw(&store.get());
        let (notify, _) = watch::channel(0);

        Self {
            inner: Arc::new(Inner {
                provider,
                store,
                state: Mutex::new(EngineState {
                    registry,
                    cache: QuoteCache::new(),
                    loading: true,
                    last_update: None,
                    timer: None,
                }),
                in_flight: AtomicBool::new(false),
                notify,
                view: ViewService::new(),
            }),
        }
    }

    // ── Refresh pipeline ────────────────────────────────────────────

    /// Run one full batch cycle: reload the registry from configuration,
    /// fetch all quotes in one request, and replace the cache wholesale.
    ///
    /// Never returns an error: a failed cycle installs the fresh (empty)
    /// cache instead of keeping possibly stale data, clears the loading
    /// flag, and still fires the change notification. Overlapping triggers
    /// are dropped by the single-flight guard.
    pub async fn refresh(&self) {
        if self.inner.in_flight.swap(true, Ordering::SeqCst) {
            debug!("refresh already in flight, dropping trigger");
            return;
        }

        let codes = {
            let mut state = self.state();
            state.registry = RegistryState::from_raw(&self.inner.store.get());
            state.registry.codes.clone()
        };

        let result = self.inner.provider.fetch_batch(&codes).await;

        {
            let mut state = self.state();
            match result {
                Ok(batch) => {
                    info!(
                        requested = codes.len(),
                        received = batch.quotes.len(),
                        "refresh cycle complete"
                    );
                    let mut cache = QuoteCache::with_capacity(batch.quotes.len());
                    for quote in batch.quotes {
                        cache.insert(quote.code.clone(), quote);
                    }
                    state.cache = cache;
                    state.last_update = Some(batch.fetched_at);
                }
                Err(e) => {
                    warn!(
                        provider = self.inner.provider.name(),
                        error = %e,
                        "refresh cycle failed"
                    );
                    state.cache = QuoteCache::new();
                }
            }
            state.loading = false;
        }

        self.inner.in_flight.store(false, Ordering::SeqCst);
        self.notify_changed();
    }

    /// Entry point for the host's configuration-change notification, scoped
    /// to the watch-list key. Runs the identical pipeline as [`refresh`].
    ///
    /// [`refresh`]: QuoteBoard::refresh
    pub async fn watchlist_changed(&self) {
        self.refresh().await;
    }

    // ── Scheduler lifecycle ─────────────────────────────────────────

    /// Start the recurring timer. Cancels and replaces any previously
    /// running timer; only one may be live per engine. The first cycle
    /// fires immediately, then every `period`; hosts typically pass
    /// [`DEFAULT_REFRESH_INTERVAL`].
    pub fn start(&self, period: Duration) {
        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match Weak::upgrade(&weak) {
                    Some(inner) => QuoteBoard { inner }.refresh().await,
                    None => break,
                }
            }
        });

        let mut state = self.state();
        if let Some(old) = state.timer.replace(handle) {
            old.abort();
        }
        info!(period_ms = period.as_millis() as u64, "scheduler started");
    }

    /// Stop the timer. Leaves the cache as last observed; does not clear
    /// any data.
    pub fn stop(&self) {
        if let Some(timer) = self.state().timer.take() {
            timer.abort();
            info!("scheduler stopped");
        }
    }

    // ── Presentation boundary ───────────────────────────────────────

    /// Root node list: one row per configured instrument plus aggregate
    /// and metadata rows. Recomputed from current state on every call.
    #[must_use]
    pub fn root_items(&self) -> Vec<DisplayNode> {
        let state = self.state();
        self.inner.view.root_items(
            &state.registry,
            &state.cache,
            state.loading,
            state.last_update.as_deref(),
        )
    }

    /// Detail node list for one instrument. Empty when the instrument has
    /// no cached quote.
    #[must_use]
    pub fn detail_items(&self, code: &str) -> Vec<DisplayNode> {
        let state = self.state();
        self.inner
            .view
            .detail_items(code, &state.cache, &state.registry.holdings)
    }

    /// Subscribe to the change notification. The value is a generation
    /// counter bumped once per completed cycle or configuration edit.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.notify.subscribe()
    }

    // ── Holdings & watch-list updates ───────────────────────────────

    /// Rewrite one instrument's holding in the stored watch-list and run
    /// the full pipeline synchronously so the view reflects the change.
    /// A share count of zero removes the holding but keeps the instrument.
    pub async fn set_holding(&self, code: &str, shares: u64) {
        let entries = self.inner.store.get();
        let rewritten = registry::rewrite_holding(&entries, code, shares as f64);
        self.inner.store.set(rewritten);
        self.notify_changed();
        self.refresh().await;
    }

    /// Validate raw dialog input and apply it as a holdings update.
    /// Empty input clears the holding. Returns the validation error for
    /// non-numeric, negative, or fractional input; nothing is committed
    /// on error.
    pub async fn set_holding_input(&self, code: &str, input: &str) -> Result<(), CoreError> {
        let shares = registry::parse_shares_input(input)?;
        self.set_holding(code, shares.unwrap_or(0)).await;
        Ok(())
    }

    /// Append an instrument to the watch-list (no-op if already present)
    /// and run the full pipeline.
    pub async fn add_instrument(&self, code: &str) {
        let entries = self.inner.store.get();
        self.inner.store.set(registry::add_code(&entries, code));
        self.notify_changed();
        self.refresh().await;
    }

    /// Remove an instrument (and any holding annotation) from the
    /// watch-list and run the full pipeline.
    pub async fn remove_instrument(&self, code: &str) {
        let entries = self.inner.store.get();
        self.inner.store.set(registry::remove_code(&entries, code));
        self.notify_changed();
        self.refresh().await;
    }

    // ── State inspection ────────────────────────────────────────────

    /// `true` until the first cycle after construction completes.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Timestamp of the last successful batch, if any.
    #[must_use]
    pub fn last_update(&self) -> Option<String> {
        self.state().last_update.clone()
    }

    /// Current holdings by instrument code.
    #[must_use]
    pub fn holdings(&self) -> HashMap<String, f64> {
        self.state().registry.holdings.clone()
    }

    /// Configured instrument codes in display order.
    #[must_use]
    pub fn codes(&self) -> Vec<String> {
        self.state().registry.codes.clone()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify_changed(&self) {
        self.inner.notify.send_modify(|generation| *generation += 1);
    }
}
