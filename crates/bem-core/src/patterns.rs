//! Compiles a [`NamingPolicy`] into anchored regex matchers.
//!
//! Pattern grammar per case style (word counts come from the policy):
//!
//! - kebab/snake: word `[a-z0-9]+`, joined by `-` / `_`
//! - camel: `[a-z0-9]+` head, then `[A-Z][a-z0-9]*` segments
//! - pascal: `[A-Z][a-z0-9]*` segments
//!
//! Blocks span 2..=max words, elements are always a single word (no inner
//! case chunks), modifiers carry the literal prefix and 1..=2 words. A custom
//! override fully replaces the generated pattern for its kind; overrides that
//! fail to compile are reported and the default is substituted, so
//! compilation is total.

use regex::Regex;

use crate::error::PatternError;
use crate::kind::{CaseStyle, Kind};
use crate::policy::{BLOCK_WORDS_MAX, BLOCK_WORDS_MIN, ConfigIssue, NamingPolicy, ValueRule};

/// Compiled matchers for one naming policy.
///
/// Construction is deterministic: equal policy signatures yield pattern sets
/// with byte-identical regex sources, so a cache hit is indistinguishable
/// from a cold compile.
#[derive(Debug, Clone)]
pub struct PatternSet {
    block: Regex,
    element: Regex,
    modifier: Regex,
    signature: String,
}

impl PatternSet {
    /// Compile the matchers for `policy`, reporting rejected overrides.
    #[must_use]
    pub fn compile(policy: &NamingPolicy) -> (Self, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let max_words = policy
            .block_max_words
            .clamp(BLOCK_WORDS_MIN, BLOCK_WORDS_MAX);
        let modifier_words = policy.modifier_max_words.clamp(1, 2);

        let block = compiled(
            policy.block_pattern.as_deref(),
            "naming.block_pattern",
            &mut issues,
            || block_source(policy.case, max_words),
        );
        let element = compiled(
            policy.element_pattern.as_deref(),
            "naming.element_pattern",
            &mut issues,
            || element_source(policy.case),
        );
        let modifier = compiled(
            policy.modifier_pattern.as_deref(),
            "naming.modifier_pattern",
            &mut issues,
            || modifier_source(policy.case, &policy.modifier_prefix, modifier_words),
        );

        (
            Self {
                block,
                element,
                modifier,
                signature: policy.signature(),
            },
            issues,
        )
    }

    #[must_use]
    pub fn is_block(&self, name: &str) -> bool {
        self.block.is_match(name)
    }

    #[must_use]
    pub fn is_element(&self, name: &str) -> bool {
        self.element.is_match(name)
    }

    #[must_use]
    pub fn is_modifier(&self, name: &str) -> bool {
        self.modifier.is_match(name)
    }

    /// The policy signature this set was compiled from.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

fn compiled(
    custom: Option<&str>,
    option: &'static str,
    issues: &mut Vec<ConfigIssue>,
    generate: impl Fn() -> String,
) -> Regex {
    if let Some(source) = custom {
        match try_custom(source, option) {
            Ok(regex) => return regex,
            Err(error) => issues.push(ConfigIssue {
                option: option.to_string(),
                value: source.to_string(),
                message: format!("{error}; using the generated pattern"),
            }),
        }
    }
    let source = anchored(&generate());
    Regex::new(&source).unwrap_or_else(|_| unreachable!("generated pattern always compiles"))
}

fn try_custom(source: &str, option: &'static str) -> Result<Regex, PatternError> {
    let kind = option.rsplit('.').next().unwrap_or(option);
    Regex::new(&anchored(source)).map_err(|source| PatternError::InvalidPattern { kind, source })
}

/// Anchor a pattern so partial matches cannot reclassify a name.
fn anchored(source: &str) -> String {
    if source.starts_with('^') && source.ends_with('$') {
        source.to_string()
    } else {
        format!("^(?:{source})$")
    }
}

// ---------------------------------------------------------------------------
// Generated pattern sources
// ---------------------------------------------------------------------------

const LOWER_WORD: &str = "[a-z0-9]+";
const CAMEL_SEGMENT: &str = "[A-Z][a-z0-9]*";

fn joined_words(case: CaseStyle, min_words: u32, max_words: u32) -> String {
    let (head, tail) = match case {
        CaseStyle::Kebab => (LOWER_WORD.to_string(), format!("-{LOWER_WORD}")),
        CaseStyle::Snake => (LOWER_WORD.to_string(), format!("_{LOWER_WORD}")),
        CaseStyle::Camel => (LOWER_WORD.to_string(), CAMEL_SEGMENT.to_string()),
        CaseStyle::Pascal => (CAMEL_SEGMENT.to_string(), CAMEL_SEGMENT.to_string()),
    };
    if max_words <= 1 {
        return head;
    }
    format!(
        "{head}(?:{tail}){{{},{}}}",
        min_words.saturating_sub(1),
        max_words - 1
    )
}

fn block_source(case: CaseStyle, max_words: u32) -> String {
    joined_words(case, BLOCK_WORDS_MIN, max_words)
}

/// Elements are one word regardless of style; no inner case chunking.
fn element_source(case: CaseStyle) -> String {
    match case {
        CaseStyle::Kebab | CaseStyle::Snake | CaseStyle::Camel => LOWER_WORD.to_string(),
        CaseStyle::Pascal => CAMEL_SEGMENT.to_string(),
    }
}

fn modifier_source(case: CaseStyle, prefix: &str, max_words: u32) -> String {
    format!("{}{}", regex::escape(prefix), joined_words(case, 1, max_words))
}

// ---------------------------------------------------------------------------
// Value-rule matcher
// ---------------------------------------------------------------------------

/// Compiled matcher for permitted attribute values.
#[derive(Debug, Clone)]
pub struct ValueMatcher {
    regex: Regex,
}

impl ValueMatcher {
    #[must_use]
    pub fn compile(rule: &ValueRule) -> Self {
        let max_words = rule.max_words.max(1);
        let source = anchored(&joined_words(rule.case, 1, max_words));
        Self {
            regex: Regex::new(&source)
                .unwrap_or_else(|_| unreachable!("generated pattern always compiles")),
        }
    }

    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

// ---------------------------------------------------------------------------
// Example names
// ---------------------------------------------------------------------------

/// A canonical valid name for (style, kind), used in diagnostics.
///
/// The round-trip property: `example_name(style, kind, prefix)` classifies as
/// `kind` under a policy with that style and prefix.
#[must_use]
pub fn example_name(case: CaseStyle, kind: Kind, modifier_prefix: &str) -> String {
    match kind {
        Kind::Block => match case {
            CaseStyle::Kebab => "search-form".to_string(),
            CaseStyle::Snake => "search_form".to_string(),
            CaseStyle::Camel => "searchForm".to_string(),
            CaseStyle::Pascal => "SearchForm".to_string(),
        },
        Kind::Element => match case {
            CaseStyle::Kebab | CaseStyle::Snake | CaseStyle::Camel => "title".to_string(),
            CaseStyle::Pascal => "Title".to_string(),
        },
        Kind::Modifier => {
            let word = match case {
                CaseStyle::Kebab | CaseStyle::Snake | CaseStyle::Camel => "compact",
                CaseStyle::Pascal => "Compact",
            };
            format!("{modifier_prefix}{word}")
        }
        // No canonical spelling exists for these; give the caller something
        // recognizable rather than panicking.
        Kind::External | Kind::Invalid => kind.as_str().to_string(),
    }
}
