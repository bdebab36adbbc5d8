//! Naming and selector policies.
//!
//! Policies are plain serde structs with defaults, loaded from caller
//! configuration. [`NamingPolicy::validated`] and
//! [`SelectorPolicy::validated`] repair out-of-range values instead of
//! failing: each repair is reported as a [`ConfigIssue`] with the offending
//! option name and value, and the rest of the run keeps producing
//! diagnostics. Nothing in policy handling ever aborts a lint pass.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::kind::CaseStyle;

/// Block names span at least this many words.
pub const BLOCK_WORDS_MIN: u32 = 2;
/// Upper clamp for configured block word counts.
pub const BLOCK_WORDS_MAX: u32 = 100;
/// Modifier names span at most this many words.
pub const MODIFIER_WORDS_MAX: u32 = 2;

/// A configuration value that had to be repaired.
///
/// Reported once per offending option; the engine substitutes the default and
/// continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigIssue {
    /// Dotted option path, e.g. `naming.block_max_words`.
    pub option: String,
    /// The rejected value, rendered as text.
    pub value: String,
    /// What was wrong and what was substituted.
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value '{}' for '{}': {}",
            self.value, self.option, self.message
        )
    }
}

// ---------------------------------------------------------------------------
// NamingPolicy
// ---------------------------------------------------------------------------

const fn default_block_max_words() -> u32 {
    BLOCK_WORDS_MIN
}

const fn default_element_max_words() -> u32 {
    1
}

const fn default_modifier_max_words() -> u32 {
    MODIFIER_WORDS_MAX
}

fn default_modifier_prefix() -> String {
    "-".to_string()
}

fn default_page_prefixes() -> Vec<String> {
    vec!["page-".to_string()]
}

/// How class names are formed, per structural kind.
///
/// Immutable once validated; [`NamingPolicy::signature`] is the identity used
/// as the pattern-cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NamingPolicy {
    /// Word casing for every kind.
    pub case: CaseStyle,

    /// Maximum words in a block name. Clamped to `[2, 100]`.
    pub block_max_words: u32,

    /// Maximum words in an element name. Elements are single-word.
    pub element_max_words: u32,

    /// Maximum words in a modifier name. Clamped to `[1, 2]`.
    pub modifier_max_words: u32,

    /// Literal prefix marking modifier classes.
    pub modifier_prefix: String,

    /// Custom override pattern per kind; fully replaces the generated one.
    pub block_pattern: Option<String>,
    pub element_pattern: Option<String>,
    pub modifier_pattern: Option<String>,

    /// Class names deliberately excluded from structural validation.
    pub external_classes: Vec<String>,
    /// Prefixes marking external classes (e.g. `js-`, `u-`).
    pub external_prefixes: Vec<String>,

    /// Block names that are page-layer roots.
    pub page_blocks: Vec<String>,
    /// Prefixes marking page-layer blocks.
    pub page_prefixes: Vec<String>,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            case: CaseStyle::Kebab,
            block_max_words: default_block_max_words(),
            element_max_words: default_element_max_words(),
            modifier_max_words: default_modifier_max_words(),
            modifier_prefix: default_modifier_prefix(),
            block_pattern: None,
            element_pattern: None,
            modifier_pattern: None,
            external_classes: Vec::new(),
            external_prefixes: Vec::new(),
            page_blocks: Vec::new(),
            page_prefixes: default_page_prefixes(),
        }
    }
}

impl NamingPolicy {
    /// Repair out-of-range values, reporting each repair.
    #[must_use]
    pub fn validated(mut self) -> (Self, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        if self.block_max_words < BLOCK_WORDS_MIN || self.block_max_words > BLOCK_WORDS_MAX {
            issues.push(ConfigIssue {
                option: "naming.block_max_words".into(),
                value: self.block_max_words.to_string(),
                message: format!(
                    "must be between {BLOCK_WORDS_MIN} and {BLOCK_WORDS_MAX}; using {BLOCK_WORDS_MIN}"
                ),
            });
            self.block_max_words = BLOCK_WORDS_MIN;
        }

        if self.element_max_words != 1 {
            issues.push(ConfigIssue {
                option: "naming.element_max_words".into(),
                value: self.element_max_words.to_string(),
                message: "element names are single-word; using 1".into(),
            });
            self.element_max_words = 1;
        }

        if self.modifier_max_words < 1 || self.modifier_max_words > MODIFIER_WORDS_MAX {
            issues.push(ConfigIssue {
                option: "naming.modifier_max_words".into(),
                value: self.modifier_max_words.to_string(),
                message: format!("must be 1 or {MODIFIER_WORDS_MAX}; using {MODIFIER_WORDS_MAX}"),
            });
            self.modifier_max_words = MODIFIER_WORDS_MAX;
        }

        if self.modifier_prefix.is_empty() {
            issues.push(ConfigIssue {
                option: "naming.modifier_prefix".into(),
                value: String::new(),
                message: "prefix must not be empty; using '-'".into(),
            });
            self.modifier_prefix = default_modifier_prefix();
        }

        // An empty prefix would match every class name, making everything
        // external (or a page root). Drop them rather than let one bad entry
        // hollow out classification.
        for (option, list) in [
            ("naming.external_prefixes", &mut self.external_prefixes),
            ("naming.page_prefixes", &mut self.page_prefixes),
        ] {
            if list.iter().any(String::is_empty) {
                issues.push(ConfigIssue {
                    option: option.into(),
                    value: "\"\"".into(),
                    message: "empty prefixes are ignored".into(),
                });
                list.retain(|p| !p.is_empty());
            }
        }

        (self, issues)
    }

    /// Whether `name` is an external class under this policy.
    #[must_use]
    pub fn is_external(&self, name: &str) -> bool {
        self.external_classes.iter().any(|c| c == name)
            || self.external_prefixes.iter().any(|p| name.starts_with(p))
    }

    /// Whether `name` is a page-layer block name.
    #[must_use]
    pub fn is_page_block(&self, name: &str) -> bool {
        self.page_blocks.iter().any(|c| c == name)
            || self.page_prefixes.iter().any(|p| name.starts_with(p))
    }

    /// Deterministic identity string, used as the pattern-cache key.
    ///
    /// Two policies with equal signatures compile to identical pattern sets.
    #[must_use]
    pub fn signature(&self) -> String {
        format!(
            "case={};bw={};ew={};mw={};mp={};bp={:?};ep={:?};mpat={:?};ext={:?};extp={:?}",
            self.case,
            self.block_max_words,
            self.element_max_words,
            self.modifier_max_words,
            self.modifier_prefix,
            self.block_pattern,
            self.element_pattern,
            self.modifier_pattern,
            self.external_classes,
            self.external_prefixes,
        )
    }
}

// ---------------------------------------------------------------------------
// SelectorPolicy
// ---------------------------------------------------------------------------

/// How variants and states are represented in selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReprMode {
    /// `[data-*]` attribute selectors.
    Data,
    /// Prefixed modifier classes.
    Class,
}

impl ReprMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for ReprMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn default_value_max_words() -> u32 {
    2
}

/// Naming rule applied to permitted attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ValueRule {
    pub case: CaseStyle,
    pub max_words: u32,
}

impl Default for ValueRule {
    fn default() -> Self {
        Self {
            case: CaseStyle::Kebab,
            max_words: default_value_max_words(),
        }
    }
}

fn default_variant_keys() -> Vec<String> {
    vec!["data-variant".to_string()]
}

fn default_state_key() -> String {
    "data-state".to_string()
}

fn default_aria_keys() -> Vec<String> {
    [
        "aria-busy",
        "aria-checked",
        "aria-current",
        "aria-disabled",
        "aria-expanded",
        "aria-hidden",
        "aria-pressed",
        "aria-selected",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Which selector shapes may carry variant and state information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SelectorPolicy {
    /// Representation of variants (visual alternatives of a block).
    pub variant_mode: ReprMode,
    /// Permitted `data-*` keys for variants.
    pub variant_keys: Vec<String>,

    /// Representation of states (transient, interaction-driven).
    pub state_mode: ReprMode,
    /// The single permitted `data-*` key for states.
    pub state_key: String,
    /// Permitted `aria-*` keys for states.
    pub aria_keys: Vec<String>,

    /// Naming rule for attribute values.
    pub value_rule: ValueRule,
}

impl Default for SelectorPolicy {
    fn default() -> Self {
        Self {
            variant_mode: ReprMode::Data,
            variant_keys: default_variant_keys(),
            state_mode: ReprMode::Data,
            state_key: default_state_key(),
            aria_keys: default_aria_keys(),
            value_rule: ValueRule::default(),
        }
    }
}

impl SelectorPolicy {
    /// Repair invalid values, reporting each repair.
    #[must_use]
    pub fn validated(mut self) -> (Self, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        if self.variant_keys.iter().any(String::is_empty) {
            issues.push(ConfigIssue {
                option: "selector.variant_keys".into(),
                value: "\"\"".into(),
                message: "empty attribute keys are ignored".into(),
            });
            self.variant_keys.retain(|k| !k.is_empty());
        }
        if self.variant_keys.is_empty() {
            self.variant_keys = default_variant_keys();
        }

        if self.state_key.is_empty() {
            issues.push(ConfigIssue {
                option: "selector.state_key".into(),
                value: String::new(),
                message: "key must not be empty; using 'data-state'".into(),
            });
            self.state_key = default_state_key();
        }

        if self.value_rule.max_words == 0 {
            issues.push(ConfigIssue {
                option: "selector.value_rule.max_words".into(),
                value: "0".into(),
                message: "must be at least 1; using 2".into(),
            });
            self.value_rule.max_words = default_value_max_words();
        }

        (self, issues)
    }

    /// Modifier classes are only legal while at least one of variant/state is
    /// represented as classes.
    #[must_use]
    pub const fn modifier_classes_allowed(&self) -> bool {
        !(matches!(self.variant_mode, ReprMode::Data) && matches!(self.state_mode, ReprMode::Data))
    }

    /// Whether `name` is a permitted variant/state attribute key.
    #[must_use]
    pub fn permits_attribute(&self, name: &str) -> bool {
        self.variant_keys.iter().any(|k| k == name)
            || self.state_key == name
            || self.aria_keys.iter().any(|k| k == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let (naming, issues) = NamingPolicy::default().validated();
        assert!(issues.is_empty());
        assert_eq!(naming.block_max_words, 2);
        assert_eq!(naming.modifier_prefix, "-");

        let (selector, issues) = SelectorPolicy::default().validated();
        assert!(issues.is_empty());
        assert_eq!(selector.state_key, "data-state");
    }

    #[test]
    fn block_max_words_out_of_range_reports_and_defaults() {
        for bad in [0, 1, 101, 5000] {
            let policy = NamingPolicy {
                block_max_words: bad,
                ..NamingPolicy::default()
            };
            let (repaired, issues) = policy.validated();
            assert_eq!(repaired.block_max_words, 2, "for input {bad}");
            assert_eq!(issues.len(), 1, "for input {bad}");
            assert_eq!(issues[0].option, "naming.block_max_words");
            assert_eq!(issues[0].value, bad.to_string());
        }
    }

    #[test]
    fn in_range_block_max_words_kept() {
        let policy = NamingPolicy {
            block_max_words: 4,
            ..NamingPolicy::default()
        };
        let (repaired, issues) = policy.validated();
        assert_eq!(repaired.block_max_words, 4);
        assert!(issues.is_empty());
    }

    #[test]
    fn empty_external_prefix_dropped() {
        let policy = NamingPolicy {
            external_prefixes: vec![String::new(), "js-".into()],
            ..NamingPolicy::default()
        };
        let (repaired, issues) = policy.validated();
        assert_eq!(repaired.external_prefixes, vec!["js-".to_string()]);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn external_matching() {
        let policy = NamingPolicy {
            external_classes: vec!["clearfix".into()],
            external_prefixes: vec!["js-".into()],
            ..NamingPolicy::default()
        };
        assert!(policy.is_external("clearfix"));
        assert!(policy.is_external("js-toggle"));
        assert!(!policy.is_external("card"));
    }

    #[test]
    fn page_block_matching() {
        let policy = NamingPolicy::default();
        assert!(policy.is_page_block("page-home"));
        assert!(!policy.is_page_block("search-form"));
    }

    #[test]
    fn signature_distinguishes_policies() {
        let a = NamingPolicy::default();
        let b = NamingPolicy {
            block_max_words: 3,
            ..NamingPolicy::default()
        };
        assert_ne!(a.signature(), b.signature());
        assert_eq!(a.signature(), NamingPolicy::default().signature());
    }

    #[test]
    fn modifier_classes_follow_repr_modes() {
        let both_data = SelectorPolicy::default();
        assert!(!both_data.modifier_classes_allowed());

        let state_classes = SelectorPolicy {
            state_mode: ReprMode::Class,
            ..SelectorPolicy::default()
        };
        assert!(state_classes.modifier_classes_allowed());
    }

    #[test]
    fn permitted_attributes() {
        let policy = SelectorPolicy::default();
        assert!(policy.permits_attribute("data-variant"));
        assert!(policy.permits_attribute("data-state"));
        assert!(policy.permits_attribute("aria-expanded"));
        assert!(!policy.permits_attribute("data-test-id"));
    }
}
