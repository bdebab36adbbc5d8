//! Small declared-value parsers: margin shorthand expansion, zero detection,
//! and `position` keyword classification.
//!
//! These parsers are deliberately shallow. They answer exactly the questions
//! the placement check asks and report everything else as dynamic/unknown so
//! the check can skip rather than guess.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// CSS-wide keywords, meaningful for any property.
const WIDE_KEYWORDS: [&str; 5] = ["inherit", "initial", "revert", "revert-layer", "unset"];

/// Whether the value contains SCSS interpolation, an SCSS variable, or a
/// `var()` reference — i.e. cannot be statically inspected.
#[must_use]
pub fn is_dynamic_value(value: &str) -> bool {
    value.contains("#{") || value.contains("var(") || value.split_whitespace().any(|t| t.starts_with('$'))
}

/// Whether a single token is a literal zero length (`0`, `0px`, `-0`, `0%`, …).
#[must_use]
pub fn is_zero_token(token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }
    let numeric_end = token
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-')))
        .unwrap_or(token.len());
    let (number, unit) = token.split_at(numeric_end);
    if number.is_empty() || !unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%') {
        return false;
    }
    number.parse::<f64>().is_ok_and(|n| n == 0.0)
}

/// Whether a margin-side token is acceptable where a side is disallowed:
/// a literal zero, `auto`, or `initial`.
#[must_use]
pub fn is_zero_auto_or_initial(token: &str) -> bool {
    let token = token.trim().to_ascii_lowercase();
    token == "auto" || token == "initial" || is_zero_token(&token)
}

// ---------------------------------------------------------------------------
// Margin shorthand
// ---------------------------------------------------------------------------

/// Physical side a margin declaration can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of asking which token a margin declaration applies to a side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarginSide {
    /// The property does not target that side at all.
    NotTargeted,
    /// The value cannot be statically inspected; skip the check.
    Dynamic,
    /// The token applied to the requested side.
    Token(String),
}

/// Extract the token a margin declaration applies to `side`.
///
/// Handles the 1/2/3/4-token `margin` shorthand, the 1/2-token
/// `margin-block`/`margin-inline` shorthands, and the longhand per-side
/// properties. Logical sides map to physical ones for horizontal writing:
/// block start/end → top/bottom, inline start/end → left/right. Values with
/// interpolation, variables, commas/slashes, or a CSS-wide keyword other
/// than `initial` used alone come back [`MarginSide::Dynamic`].
#[must_use]
pub fn margin_side_token(property: &str, value: &str, side: Side) -> MarginSide {
    let property = property.to_ascii_lowercase();
    let value = value.trim();

    if is_dynamic_value(value) || value.contains(',') || value.contains('/') {
        return MarginSide::Dynamic;
    }
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.is_empty() {
        return MarginSide::Dynamic;
    }
    if tokens.len() == 1 {
        let lone = tokens[0].to_ascii_lowercase();
        if lone != "initial" && WIDE_KEYWORDS.contains(&lone.as_str()) {
            return MarginSide::Dynamic;
        }
    }

    let targeted = |index: Option<usize>| match index {
        Some(i) => tokens
            .get(i)
            .map_or(MarginSide::Dynamic, |t| MarginSide::Token((*t).to_string())),
        None => MarginSide::NotTargeted,
    };

    match property.as_str() {
        "margin" => {
            let index = match tokens.len() {
                1 => Some(0),
                2 => Some(match side {
                    Side::Top | Side::Bottom => 0,
                    Side::Right | Side::Left => 1,
                }),
                3 => Some(match side {
                    Side::Top => 0,
                    Side::Right | Side::Left => 1,
                    Side::Bottom => 2,
                }),
                4 => Some(match side {
                    Side::Top => 0,
                    Side::Right => 1,
                    Side::Bottom => 2,
                    Side::Left => 3,
                }),
                _ => return MarginSide::Dynamic,
            };
            targeted(index)
        }
        "margin-block" => {
            if tokens.len() > 2 {
                return MarginSide::Dynamic;
            }
            let index = match side {
                Side::Top => Some(0),
                Side::Bottom => Some(if tokens.len() == 2 { 1 } else { 0 }),
                Side::Right | Side::Left => None,
            };
            targeted(index)
        }
        "margin-inline" => {
            if tokens.len() > 2 {
                return MarginSide::Dynamic;
            }
            let index = match side {
                Side::Left => Some(0),
                Side::Right => Some(if tokens.len() == 2 { 1 } else { 0 }),
                Side::Top | Side::Bottom => None,
            };
            targeted(index)
        }
        "margin-top" | "margin-block-start" => targeted((side == Side::Top).then_some(0)),
        "margin-bottom" | "margin-block-end" => targeted((side == Side::Bottom).then_some(0)),
        "margin-left" | "margin-inline-start" => targeted((side == Side::Left).then_some(0)),
        "margin-right" | "margin-inline-end" => targeted((side == Side::Right).then_some(0)),
        _ => MarginSide::NotTargeted,
    }
}

// ---------------------------------------------------------------------------
// Position values
// ---------------------------------------------------------------------------

/// Classification of a `position` declaration's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PositionValue {
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
    /// A CSS-wide keyword; the check skips these.
    WideKeyword,
    /// Interpolation or a variable reference; cannot be inspected.
    Dynamic,
    /// Anything else single-token we do not recognize.
    Unknown,
}

impl PositionValue {
    /// Whether this position requires a paired offset declaration.
    #[must_use]
    pub const fn requires_offset(self) -> bool {
        matches!(self, Self::Relative | Self::Absolute)
    }
}

/// Classify a `position` value.
///
/// Only single-token values classify; multi-token or comma/slash-separated
/// values are always [`PositionValue::Dynamic`].
#[must_use]
pub fn parse_position(value: &str) -> PositionValue {
    let value = value.trim();
    if is_dynamic_value(value) {
        return PositionValue::Dynamic;
    }
    if value.contains(',') || value.contains('/') {
        return PositionValue::Dynamic;
    }
    let mut tokens = value.split_whitespace();
    let (Some(token), None) = (tokens.next(), tokens.next()) else {
        return PositionValue::Dynamic;
    };
    match token.to_ascii_lowercase().as_str() {
        "static" => PositionValue::Static,
        "relative" => PositionValue::Relative,
        "absolute" => PositionValue::Absolute,
        "fixed" => PositionValue::Fixed,
        "sticky" => PositionValue::Sticky,
        other if WIDE_KEYWORDS.contains(&other) => PositionValue::WideKeyword,
        _ => PositionValue::Unknown,
    }
}
