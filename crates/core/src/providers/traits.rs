use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::QuoteBatch;

/// Trait abstraction over the remote quote service.
///
/// One provider's field encoding is assumed throughout the crate, but the
/// engine only ever talks to this trait. Tests substitute scripted
/// implementations, and a provider change touches one module.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the latest quotes for every code in one batched request.
    ///
    /// One network round-trip per refresh cycle regardless of watch-list
    /// size. The returned batch carries the shared wall-clock timestamp
    /// stamped on each quote.
    async fn fetch_batch(&self, codes: &[String]) -> Result<QuoteBatch, CoreError>;
}
