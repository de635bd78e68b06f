use std::collections::HashMap;

use crate::models::instrument::{classify_code, MarketTag, DEFAULT_INDEX_CODE};
use crate::models::node::{change_style, explicit_sign, DisplayNode};
use crate::models::quote::QuoteCache;
use crate::registry::RegistryState;

/// Builds the two-level display hierarchy from engine state.
///
/// Pure derivation, no I/O, no mutation. Both entry points recompute their
/// node lists from scratch on every pull.
pub struct ViewService;

impl ViewService {
    pub fn new() -> Self {
        Self
    }

    /// Root list: one row per configured instrument in registry order, then
    /// an aggregate P&L row when any held instrument has a quote, then the
    /// last batch's update-time row. While the first cycle is still loading,
    /// a single placeholder row stands in for the primary index.
    pub fn root_items(
        &self,
        registry: &RegistryState,
        cache: &QuoteCache,
        loading: bool,
        last_update: Option<&str>,
    ) -> Vec<DisplayNode> {
        if loading {
            return vec![DisplayNode {
                label: "Loading quotes...".to_string(),
                expandable: false,
                description: String::new(),
                icon_token: "sync",
                color_token: "muted",
                associated_code: Some(DEFAULT_INDEX_CODE.to_string()),
            }];
        }

        let mut nodes = Vec::with_capacity(registry.codes.len() + 2);

        for code in &registry.codes {
            match cache.get(code) {
                Some(quote) => {
                    let style = change_style(quote.change_value());
                    let tag = classify_code(code);
                    let suffix = tag
                        .map(|t| format!(" [{}]", t.label()))
                        .unwrap_or_default();
                    nodes.push(DisplayNode {
                        label: format!(
                            "{} {}% {}{}",
                            style.glyph, quote.change_percent, quote.name, suffix
                        ),
                        expandable: true,
                        description: quote.current.clone(),
                        icon_token: style.icon_token,
                        color_token: tag
                            .map(MarketTag::color_token)
                            .unwrap_or(style.color_token),
                        associated_code: Some(code.clone()),
                    });
                }
                // No quote this cycle: a first-class failed row, still
                // targetable by the detail/edit flow through its code.
                None => nodes.push(DisplayNode {
                    label: format!("{code} fetch failed"),
                    expandable: false,
                    description: String::new(),
                    icon_token: "warning",
                    color_token: "muted",
                    associated_code: Some(code.clone()),
                }),
            }
        }

        if let Some(total) = portfolio_pnl(&registry.holdings, cache) {
            let style = change_style(total);
            nodes.push(DisplayNode::meta(
                "Portfolio P&L",
                style.formatted.clone(),
                "wallet",
                style.color_token,
            ));
        }

        if let Some(time) = last_update {
            nodes.push(DisplayNode::meta("Updated", time, "clock", "muted"));
        }

        nodes
    }

    /// Detail list for one instrument: decomposed metrics plus, for held
    /// instruments, the share count and position P&L. An instrument with no
    /// cached quote has no children.
    pub fn detail_items(
        &self,
        code: &str,
        cache: &QuoteCache,
        holdings: &HashMap<String, f64>,
    ) -> Vec<DisplayNode> {
        let Some(quote) = cache.get(code) else {
            return Vec::new();
        };

        let change = quote.change_value();
        let change_row = {
            let style = change_style(change);
            // Keep the quote's per-market precision, add the explicit sign.
            DisplayNode::meta(
                "Change",
                explicit_sign(&quote.change),
                style.icon_token,
                style.color_token,
            )
        };

        let mut nodes = vec![
            DisplayNode::meta(
                "Previous close",
                quote.previous_close.clone(),
                "history",
                "muted",
            ),
            change_row,
        ];

        if let Some(&shares) = holdings.get(code) {
            nodes.push(DisplayNode::meta(
                "Shares",
                format_shares(shares),
                "briefcase",
                "muted",
            ));
            let style = change_style(change * shares);
            nodes.push(DisplayNode::meta(
                "Position P&L",
                style.formatted.clone(),
                "wallet",
                style.color_token,
            ));
        }

        nodes
    }
}

impl Default for ViewService {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum of `change × shares` over held instruments with a present quote.
/// `None` when no held instrument has a quote; the aggregate row is only
/// rendered when there is something to aggregate.
fn portfolio_pnl(holdings: &HashMap<String, f64>, cache: &QuoteCache) -> Option<f64> {
    let mut total = 0.0;
    let mut any = false;
    for (code, shares) in holdings {
        if let Some(quote) = cache.get(code) {
            total += quote.change_value() * shares;
            any = true;
        }
    }
    any.then_some(total)
}

fn format_shares(shares: f64) -> String {
    if shares.fract() == 0.0 {
        format!("{}", shares as i64)
    } else {
        format!("{shares}")
    }
}
