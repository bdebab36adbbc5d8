//! Structural-kind enums shared across the whole engine.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and are closed: every consumer matches them exhaustively, so adding a
//! variant is a compile-visible change everywhere it matters.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// Structural role of a single class name under a naming policy.
///
/// Exactly one `Kind` per class name: `External` wins over everything, then
/// `Modifier`, `Block`, `Element`, and finally `Invalid` as the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Block,
    Element,
    Modifier,
    External,
    Invalid,
}

impl Kind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Element => "element",
            Self::Modifier => "modifier",
            Self::External => "external",
            Self::Invalid => "invalid",
        }
    }

    /// Whether this kind can anchor a family-key compound.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Block | Self::Element)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChainRole
// ---------------------------------------------------------------------------

/// Structural role of a whole resolved selector chain.
///
/// `Root` is a standalone component rule, `PageRoot` a page-layer component
/// rule, `Element` a chain ending in an element of the enclosing block, and
/// `ChildBlock` a chain ending in a different block nested under the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChainRole {
    Root,
    PageRoot,
    Element,
    ChildBlock,
}

impl ChainRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::PageRoot => "page_root",
            Self::Element => "element",
            Self::ChildBlock => "child_block",
        }
    }

    /// Whether the chain addresses a component root (page-layer or not).
    #[must_use]
    pub const fn is_root(self) -> bool {
        matches!(self, Self::Root | Self::PageRoot)
    }
}

impl fmt::Display for ChainRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CaseStyle
// ---------------------------------------------------------------------------

/// Word-casing convention a naming policy enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CaseStyle {
    Kebab,
    Snake,
    Camel,
    Pascal,
}

impl CaseStyle {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kebab => "kebab",
            Self::Snake => "snake",
            Self::Camel => "camel",
            Self::Pascal => "pascal",
        }
    }
}

impl fmt::Display for CaseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// Membership of a rule or declaration in a comment-delimited region of a
/// root block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[default]
    None,
    Shared,
    Interaction,
}

impl Section {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Shared => "shared",
            Self::Interaction => "interaction",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(kind_block, Kind, Kind::Block, "block");
    test_serde_roundtrip!(kind_external, Kind, Kind::External, "external");
    test_serde_roundtrip!(kind_invalid, Kind, Kind::Invalid, "invalid");

    test_serde_roundtrip!(role_page_root, ChainRole, ChainRole::PageRoot, "page_root");
    test_serde_roundtrip!(
        role_child_block,
        ChainRole,
        ChainRole::ChildBlock,
        "child_block"
    );

    test_serde_roundtrip!(case_kebab, CaseStyle, CaseStyle::Kebab, "kebab");
    test_serde_roundtrip!(case_pascal, CaseStyle, CaseStyle::Pascal, "pascal");

    test_serde_roundtrip!(section_shared, Section, Section::Shared, "shared");
    test_serde_roundtrip!(
        section_interaction,
        Section,
        Section::Interaction,
        "interaction"
    );

    #[test]
    fn base_kinds() {
        assert!(Kind::Block.is_base());
        assert!(Kind::Element.is_base());
        assert!(!Kind::Modifier.is_base());
        assert!(!Kind::External.is_base());
        assert!(!Kind::Invalid.is_base());
    }

    #[test]
    fn root_roles() {
        assert!(ChainRole::Root.is_root());
        assert!(ChainRole::PageRoot.is_root());
        assert!(!ChainRole::Element.is_root());
        assert!(!ChainRole::ChildBlock.is_root());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", Kind::Modifier), "modifier");
        assert_eq!(format!("{}", ChainRole::PageRoot), "page_root");
        assert_eq!(format!("{}", CaseStyle::Camel), "camel");
        assert_eq!(format!("{}", Section::None), "none");
    }
}
