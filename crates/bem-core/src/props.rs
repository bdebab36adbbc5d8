//! Static classification of CSS properties.
//!
//! Every lower-cased property name maps to at most one placement class:
//! container-side (layout of children), item-side (placement within a
//! parent), or internal (self-contained presentation). Margin properties are
//! a subset of item-side, overflow a subset of internal, and size properties
//! a subset of internal that configuration can reclassify as item-side.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placement class of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyClass {
    Container,
    Item,
    Internal,
}

impl PropertyClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Item => "item",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for PropertyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `display` values that make the declaration container-side.
const CONTAINER_DISPLAY_VALUES: [&str; 4] = ["flex", "inline-flex", "grid", "inline-grid"];

const CONTAINER_PROPS: [&str; 20] = [
    "align-content",
    "align-items",
    "column-gap",
    "flex-direction",
    "flex-flow",
    "flex-wrap",
    "gap",
    "grid",
    "grid-auto-columns",
    "grid-auto-flow",
    "grid-auto-rows",
    "grid-template",
    "grid-template-areas",
    "grid-template-columns",
    "grid-template-rows",
    "justify-content",
    "justify-items",
    "place-content",
    "place-items",
    "row-gap",
];

const ITEM_PROPS: [&str; 14] = [
    "align-self",
    "flex",
    "flex-basis",
    "flex-grow",
    "flex-shrink",
    "grid-area",
    "grid-column",
    "grid-column-end",
    "grid-column-start",
    "grid-row",
    "grid-row-end",
    "grid-row-start",
    "justify-self",
    "order",
];

const MARGIN_PROPS: [&str; 11] = [
    "margin",
    "margin-block",
    "margin-block-end",
    "margin-block-start",
    "margin-bottom",
    "margin-inline",
    "margin-inline-end",
    "margin-inline-start",
    "margin-left",
    "margin-right",
    "margin-top",
];

const OVERFLOW_PROPS: [&str; 5] = [
    "overflow",
    "overflow-block",
    "overflow-inline",
    "overflow-x",
    "overflow-y",
];

const SIZE_PROPS: [&str; 7] = [
    "aspect-ratio",
    "height",
    "max-height",
    "max-width",
    "min-height",
    "min-width",
    "width",
];

const INTERNAL_PROPS: [&str; 24] = [
    "background",
    "background-color",
    "background-image",
    "background-position",
    "background-repeat",
    "background-size",
    "border",
    "border-color",
    "border-radius",
    "border-style",
    "border-width",
    "box-shadow",
    "color",
    "cursor",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "letter-spacing",
    "line-height",
    "opacity",
    "text-align",
    "text-decoration",
];

const OFFSET_PROPS: [&str; 9] = [
    "bottom",
    "inset",
    "inset-block",
    "inset-block-end",
    "inset-block-start",
    "inset-inline",
    "inset-inline-end",
    "inset-inline-start",
    "left",
];

/// Whether `name` (lower-cased) is a margin property.
#[must_use]
pub fn is_margin_property(name: &str) -> bool {
    MARGIN_PROPS.contains(&name)
}

/// Whether `name` is an overflow property.
#[must_use]
pub fn is_overflow_property(name: &str) -> bool {
    OVERFLOW_PROPS.contains(&name)
}

/// Whether `name` is a size property.
#[must_use]
pub fn is_size_property(name: &str) -> bool {
    SIZE_PROPS.contains(&name)
}

/// Whether `name` is an offset property pairing with `position`.
#[must_use]
pub fn is_offset_property(name: &str) -> bool {
    OFFSET_PROPS.contains(&name) || name == "right" || name == "top"
}

/// Classify a declaration by property name and value.
///
/// `size_is_internal` keeps size properties internal (the default); turned
/// off, they classify item-side. `display` is container-side only for the
/// flex/grid keyword values; any other display value is unclassified.
#[must_use]
pub fn classify_property(name: &str, value: &str, size_is_internal: bool) -> Option<PropertyClass> {
    let name = name.to_ascii_lowercase();
    if name == "display" {
        let value = value.trim().to_ascii_lowercase();
        return CONTAINER_DISPLAY_VALUES
            .contains(&value.as_str())
            .then_some(PropertyClass::Container);
    }
    if CONTAINER_PROPS.contains(&name.as_str()) {
        return Some(PropertyClass::Container);
    }
    if ITEM_PROPS.contains(&name.as_str()) || is_margin_property(&name) {
        return Some(PropertyClass::Item);
    }
    if is_size_property(&name) {
        return Some(if size_is_internal {
            PropertyClass::Internal
        } else {
            PropertyClass::Item
        });
    }
    if INTERNAL_PROPS.contains(&name.as_str()) || is_overflow_property(&name) {
        return Some(PropertyClass::Internal);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("display", "flex", Some(PropertyClass::Container))]
    #[case("display", "inline-grid", Some(PropertyClass::Container))]
    #[case("display", "block", None)]
    #[case("display", "none", None)]
    #[case("gap", "8px", Some(PropertyClass::Container))]
    #[case("justify-content", "center", Some(PropertyClass::Container))]
    #[case("flex-grow", "1", Some(PropertyClass::Item))]
    #[case("order", "2", Some(PropertyClass::Item))]
    #[case("margin", "0 auto", Some(PropertyClass::Item))]
    #[case("margin-block-start", "1rem", Some(PropertyClass::Item))]
    #[case("color", "red", Some(PropertyClass::Internal))]
    #[case("overflow-y", "auto", Some(PropertyClass::Internal))]
    #[case("--custom", "1", None)]
    #[case("contain", "layout", None)]
    fn classification(
        #[case] name: &str,
        #[case] value: &str,
        #[case] expected: Option<PropertyClass>,
    ) {
        assert_eq!(classify_property(name, value, true), expected);
    }

    #[test]
    fn display_value_is_case_insensitive() {
        assert_eq!(
            classify_property("DISPLAY", " FLEX ", true),
            Some(PropertyClass::Container)
        );
    }

    #[test]
    fn size_classification_toggles() {
        assert_eq!(
            classify_property("width", "100%", true),
            Some(PropertyClass::Internal)
        );
        assert_eq!(
            classify_property("width", "100%", false),
            Some(PropertyClass::Item)
        );
    }

    #[test]
    fn offsets_are_recognized() {
        for name in ["top", "right", "bottom", "left", "inset", "inset-inline-start"] {
            assert!(is_offset_property(name), "{name}");
        }
        assert!(!is_offset_property("margin-top"));
        assert!(!is_offset_property("position"));
    }

    #[test]
    fn margin_subset_is_item_side() {
        for name in ["margin", "margin-left", "margin-inline", "margin-block-end"] {
            assert!(is_margin_property(name), "{name}");
            assert_eq!(
                classify_property(name, "4px", true),
                Some(PropertyClass::Item),
                "{name}"
            );
        }
    }
}
