/// Render-agnostic description of one tree row.
///
/// Two flavors share this shape: *root* nodes (one per instrument, plus
/// aggregate/meta rows) and *detail* nodes (children of an expanded root).
/// Icon and color tokens are opaque style strings resolved by the host theme.
/// Nodes are recomputed on every pull and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayNode {
    pub label: String,
    pub expandable: bool,
    pub description: String,
    pub icon_token: &'static str,
    pub color_token: &'static str,
    /// Instrument code this row refers to, when it refers to one at all.
    /// Set even on failed rows so the detail/edit flow can still target them.
    pub associated_code: Option<String>,
}

impl DisplayNode {
    /// Non-expandable metadata row with no associated instrument.
    pub fn meta(
        label: impl Into<String>,
        description: impl Into<String>,
        icon_token: &'static str,
        color_token: &'static str,
    ) -> Self {
        Self {
            label: label.into(),
            expandable: false,
            description: description.into(),
            icon_token,
            color_token,
            associated_code: None,
        }
    }
}

/// Derived presentation of a signed change value, shared by the root and
/// detail views so sign/glyph/color conventions cannot drift apart.
///
/// Non-negative values (zero included) render with a leading `+`, an up
/// glyph, and the rise color; negative values keep their natural minus sign
/// with the down glyph and fall color. Always two fixed decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeStyle {
    pub glyph: &'static str,
    pub icon_token: &'static str,
    pub color_token: &'static str,
    pub formatted: String,
}

pub fn change_style(value: f64) -> ChangeStyle {
    if value >= 0.0 {
        ChangeStyle {
            glyph: "↑",
            icon_token: "arrow-up",
            color_token: "rise",
            formatted: format!("+{value:.2}"),
        }
    } else {
        ChangeStyle {
            glyph: "↓",
            icon_token: "arrow-down",
            color_token: "fall",
            formatted: format!("{value:.2}"),
        }
    }
}

/// Prepend an explicit `+` to an already-formatted non-negative decimal.
/// Used where the per-market precision of the source string must survive.
pub fn explicit_sign(formatted: &str) -> String {
    if formatted.starts_with('-') {
        formatted.to_string()
    } else {
        format!("+{formatted}")
    }
}
