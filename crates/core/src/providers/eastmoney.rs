use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::instrument::{format_scaled, profile_for_market};
use crate::models::quote::{Quote, QuoteBatch};

const BASE_URL: &str = "https://push2.eastmoney.com/api/qt/ulist.np/get";

/// Fixed field-id set requested on every call:
/// f2 current price, f3 percent change, f4 change, f12 symbol,
/// f13 market id, f14 name, f18 previous close.
const FIELDS: &str = "f2,f3,f4,f12,f13,f14,f18";

/// East Money batched-quote provider.
///
/// - **Free**: no API key, no authentication.
/// - **Batched**: one GET covers the whole watch-list via a comma-joined
///   `secids` query parameter.
/// - **Encoding**: numeric fields arrive as scaled integers under short
///   numeric-coded keys; the divisor and display precision depend on the
///   record's market id.
pub struct EastMoneyProvider {
    client: Client,
}

impl EastMoneyProvider {
    pub fn new() -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for EastMoneyProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Public web page for an instrument, for the host's open-external-link
/// command. Uses the provider's unified router, which resolves any
/// `market.symbol` code to the right market page.
pub fn detail_url(code: &str) -> String {
    format!("https://quote.eastmoney.com/unify/r/{code}")
}

// ── API response types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct BatchResponse {
    data: Option<BatchData>,
}

#[derive(Deserialize)]
struct BatchData {
    /// Records are decoded one by one so a single malformed entry (e.g. a
    /// suspended instrument reporting "-" for its prices) drops only itself.
    #[serde(default)]
    diff: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(rename = "f2")]
    current: f64,
    #[serde(rename = "f3")]
    percent: f64,
    #[serde(rename = "f4")]
    change: f64,
    #[serde(rename = "f12")]
    symbol: String,
    #[serde(rename = "f13")]
    market_id: i64,
    #[serde(rename = "f14", default)]
    name: String,
    #[serde(rename = "f18")]
    previous_close: f64,
}

/// Decode a full response body into normalized quotes.
///
/// An absent or malformed result collection is zero results, not an error.
/// Price-like fields divide by the market's divisor and format to its
/// decimal places; the percent field divides by 100 and formats to two
/// decimal places regardless of market.
pub fn decode_response(body: &str, fetched_at: &str) -> Result<Vec<Quote>, CoreError> {
    let response: BatchResponse = serde_json::from_str(body)?;

    let records = match response.data {
        Some(data) => data.diff,
        None => {
            info!("batch response carried no result collection");
            return Ok(Vec::new());
        }
    };

    let quotes = records
        .iter()
        .filter_map(|value| match serde_json::from_value::<RawRecord>(value.clone()) {
            Ok(record) => Some(decode_record(record, fetched_at)),
            Err(e) => {
                debug!(error = %e, "skipping malformed quote record");
                None
            }
        })
        .collect();

    Ok(quotes)
}

fn decode_record(record: RawRecord, fetched_at: &str) -> Quote {
    let profile = profile_for_market(record.market_id);
    Quote {
        code: format!("{}.{}", record.market_id, record.symbol),
        name: record.name,
        current: format_scaled(record.current, profile),
        change: format_scaled(record.change, profile),
        change_percent: format!("{:.2}", record.percent / 100.0),
        previous_close: format_scaled(record.previous_close, profile),
        update_time: fetched_at.to_string(),
    }
}

#[async_trait]
impl QuoteProvider for EastMoneyProvider {
    fn name(&self) -> &str {
        "East Money"
    }

    async fn fetch_batch(&self, codes: &[String]) -> Result<QuoteBatch, CoreError> {
        let secids = codes.join(",");

        let body = self
            .client
            .get(BASE_URL)
            .query(&[("secids", secids.as_str()), ("fields", FIELDS)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let fetched_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let quotes = decode_response(&body, &fetched_at)?;
        debug!(requested = codes.len(), received = quotes.len(), "batch decoded");

        Ok(QuoteBatch { quotes, fetched_at })
    }
}
