/// Instrument codes are opaque strings of the form `"<market>.<symbol>"`,
/// e.g. `"1.000001"` (Shanghai Composite) or `"116.00700"` (Tencent, HK).
/// The market prefix determines both the wire decoding and the display tag.
///
/// Falls back to the broad-market index when a watch-list parses to nothing.
pub const DEFAULT_INDEX_CODE: &str = "1.000001";

/// The (divisor, decimal-places) pair used to convert the provider's scaled
/// integer fields into a human-readable decimal, selected by market id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodingProfile {
    pub divisor: f64,
    pub decimals: usize,
}

/// Select the decoding profile for a market id.
///
/// OTC/US-style markets (105, 106, 107) and Hong Kong (116) quote with three
/// decimal places and a 1000 divisor; every other market id is domestic
/// A-share style with two decimal places and a 100 divisor.
pub fn profile_for_market(market_id: i64) -> DecodingProfile {
    match market_id {
        105 | 106 | 107 | 116 => DecodingProfile {
            divisor: 1000.0,
            decimals: 3,
        },
        _ => DecodingProfile {
            divisor: 100.0,
            decimals: 2,
        },
    }
}

/// Format a scaled integer field according to a decoding profile.
pub fn format_scaled(raw: f64, profile: DecodingProfile) -> String {
    format!("{:.prec$}", raw / profile.divisor, prec = profile.decimals)
}

/// Display tag attached to a root node's label, derived from the code alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketTag {
    /// Hong Kong listed (market id 116)
    HongKong,
    /// US listed (market ids 105, 106, 107)
    UnitedStates,
    /// Shenzhen growth board (market id 0, symbol prefix "3")
    GrowthBoard,
    /// Shanghai sci-tech board (market id 1, symbol prefix "688")
    SciTechBoard,
}

impl MarketTag {
    pub fn label(self) -> &'static str {
        match self {
            MarketTag::HongKong => "HK",
            MarketTag::UnitedStates => "US",
            MarketTag::GrowthBoard => "GEM",
            MarketTag::SciTechBoard => "STAR",
        }
    }

    /// Opaque style token consumed by the host theme.
    pub fn color_token(self) -> &'static str {
        match self {
            MarketTag::HongKong => "tag-hk",
            MarketTag::UnitedStates => "tag-us",
            MarketTag::GrowthBoard => "tag-gem",
            MarketTag::SciTechBoard => "tag-star",
        }
    }
}

/// Split a code into its `(market, symbol)` halves.
/// Returns `None` when the separator is missing or either half is empty.
pub fn split_code(code: &str) -> Option<(&str, &str)> {
    let (market, symbol) = code.split_once('.')?;
    if market.is_empty() || symbol.is_empty() {
        return None;
    }
    Some((market, symbol))
}

/// Classify an instrument code into its display tag, if any.
/// Main-board domestic instruments carry no tag.
pub fn classify_code(code: &str) -> Option<MarketTag> {
    let (market, symbol) = split_code(code)?;
    match market {
        "116" => Some(MarketTag::HongKong),
        "105" | "106" | "107" => Some(MarketTag::UnitedStates),
        "0" if symbol.starts_with('3') => Some(MarketTag::GrowthBoard),
        "1" if symbol.starts_with("688") => Some(MarketTag::SciTechBoard),
        _ => None,
    }
}
