use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::instrument::DEFAULT_INDEX_CODE;

/// Result of parsing one raw watch-list entry.
///
/// The grammar is `code` or `code:shares`. Malformed entries are not errors:
/// partial configuration is an expected steady state, so anything that does
/// not parse collapses to `Discarded` and is silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchlistEntry {
    /// Bare instrument code, no position.
    Code(String),
    /// Instrument code with a strictly positive holding.
    Holding(String, f64),
    /// Entry that did not survive parsing.
    Discarded,
}

/// Parse a single raw configuration entry.
///
/// The left of the first `:` is the code (trimmed; empty discards the whole
/// entry). The right part, if present, must parse to a finite, strictly
/// positive float to count as a holding; otherwise the code is kept alone.
pub fn parse_entry(raw: &str) -> WatchlistEntry {
    let raw = raw.trim();
    if raw.is_empty() {
        return WatchlistEntry::Discarded;
    }

    match raw.split_once(':') {
        None => WatchlistEntry::Code(raw.to_string()),
        Some((code, shares)) => {
            let code = code.trim();
            if code.is_empty() {
                return WatchlistEntry::Discarded;
            }
            match shares.trim().parse::<f64>() {
                Ok(n) if n.is_finite() && n > 0.0 => {
                    WatchlistEntry::Holding(code.to_string(), n)
                }
                _ => WatchlistEntry::Code(code.to_string()),
            }
        }
    }
}

/// Code half of a parsed entry, if the entry survived parsing.
fn entry_code(raw: &str) -> Option<String> {
    match parse_entry(raw) {
        WatchlistEntry::Code(code) | WatchlistEntry::Holding(code, _) => Some(code),
        WatchlistEntry::Discarded => None,
    }
}

/// Ordered instrument codes plus the holdings map, rebuilt wholesale from
/// configuration each time the configuration changes or a refresh runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryState {
    /// Configuration order, preserved; drives root-node display order.
    pub codes: Vec<String>,
    /// Positive share counts by code. Absence means "no position".
    pub holdings: HashMap<String, f64>,
}

impl RegistryState {
    /// Parse the raw configuration entries into a fresh registry.
    /// An empty result substitutes the default broad-market index.
    pub fn from_raw(entries: &[String]) -> Self {
        let mut codes = Vec::new();
        let mut holdings = HashMap::new();

        for raw in entries {
            match parse_entry(raw) {
                WatchlistEntry::Code(code) => codes.push(code),
                WatchlistEntry::Holding(code, shares) => {
                    holdings.insert(code.clone(), shares);
                    codes.push(code);
                }
                WatchlistEntry::Discarded => {}
            }
        }

        if codes.is_empty() {
            codes.push(DEFAULT_INDEX_CODE.to_string());
        }

        Self { codes, holdings }
    }
}

// ── Watch-list rewriting ────────────────────────────────────────────

/// Rewrite a single instrument's holding annotation in the serialized
/// watch-list, merge-idempotently.
///
/// Entries whose code matches the target become `code:shares` (shares > 0)
/// or bare `code` (shares == 0 removes the holding, keeps the instrument).
/// Every other entry passes through byte-for-byte. A missing target with
/// shares > 0 is appended.
pub fn rewrite_holding(entries: &[String], code: &str, shares: f64) -> Vec<String> {
    let mut rewritten = Vec::with_capacity(entries.len() + 1);
    let mut seen = false;

    for raw in entries {
        match entry_code(raw) {
            Some(c) if c == code => {
                seen = true;
                rewritten.push(serialize_entry(code, shares));
            }
            _ => rewritten.push(raw.clone()),
        }
    }

    if !seen && shares > 0.0 {
        rewritten.push(serialize_entry(code, shares));
    }

    rewritten
}

/// Append a code to the watch-list unless an entry for it already exists.
pub fn add_code(entries: &[String], code: &str) -> Vec<String> {
    let exists = entries
        .iter()
        .any(|raw| entry_code(raw).is_some_and(|c| c == code));
    let mut out = entries.to_vec();
    if !exists {
        out.push(code.to_string());
    }
    out
}

/// Remove every entry whose parsed code matches, holding annotation included.
pub fn remove_code(entries: &[String], code: &str) -> Vec<String> {
    entries
        .iter()
        .filter(|raw| entry_code(raw).as_deref() != Some(code))
        .cloned()
        .collect()
}

fn serialize_entry(code: &str, shares: f64) -> String {
    if shares > 0.0 {
        // Whole share counts serialize without a trailing fraction.
        if shares.fract() == 0.0 {
            format!("{code}:{}", shares as i64)
        } else {
            format!("{code}:{shares}")
        }
    } else {
        code.to_string()
    }
}

// ── Input validation ────────────────────────────────────────────────

/// Validate a shares value typed into the host's edit dialog.
///
/// Empty input means "clear holding" and returns `Ok(None)`. Anything that is
/// not a non-negative integer is rejected synchronously so the dialog can
/// re-prompt; nothing is committed on error.
pub fn parse_shares_input(input: &str) -> Result<Option<u64>, CoreError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let value: f64 = input
        .parse()
        .map_err(|_| CoreError::Validation(format!("'{input}' is not a number")))?;

    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "share count must be zero or positive, got '{input}'"
        )));
    }
    if value.fract() != 0.0 {
        return Err(CoreError::Validation(format!(
            "share count must be a whole number, got '{input}'"
        )));
    }

    Ok(Some(value as u64))
}
