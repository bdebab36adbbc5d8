//! Engine configuration and the per-run session.
//!
//! [`Engine::new`] compiles policies once per lint run; every invalid option
//! is reported as a [`ConfigIssue`] and replaced with its default, so
//! construction is total. [`Session`] owns the independent LRU caches and
//! the two degraded-coverage flags for one file; nothing is global, and
//! dropping the caches changes only speed, never results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use bem_core::{
    ConfigIssue, LruCache, NamingPolicy, PatternSet, SelectorPolicy, Side, ValueMatcher,
};
use bem_syntax::ast::{NodeId, Stylesheet};
use bem_syntax::parser::parse_selector_list;
use bem_syntax::selector::SelectorChain;
use regex::Regex;
use tracing::debug;

use crate::analysis::{self, ChainAnalysis};
use crate::family;
use crate::naming;
use crate::placement;
use crate::report::{FileReport, ReportBuilder, ResolutionSkip};
use crate::resolve;
use crate::sections;
use crate::strip::{self, Stripped};

/// Default capacity for each cache and default resolution ceiling.
pub const DEFAULT_LIMIT: usize = 1000;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_shared_marker() -> String {
    "(?i)^shared$".to_string()
}

fn default_interaction_marker() -> String {
    "(?i)^interaction$".to_string()
}

const fn default_size_is_internal() -> bool {
    true
}

/// Complete engine configuration, as loaded from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    pub naming: NamingPolicy,
    pub selector: SelectorPolicy,

    /// Regex over trimmed comment text that opens a shared section.
    pub shared_marker: String,
    /// Regex over trimmed comment text that opens an interaction section.
    pub interaction_marker: String,

    /// Mixin names whose `@include` wrappers count as responsive conditions.
    pub responsive_mixins: Vec<String>,

    /// Entry cap for each of the session caches.
    pub cache_capacity: usize,
    /// Hard cap on combined selectors produced by nested-selector resolution.
    pub resolution_ceiling: usize,

    /// Margin side that must stay zero/auto/initial on component roots.
    pub disallowed_margin_side: Option<Side>,
    /// Whether size properties count as internal (otherwise item-side).
    pub size_is_internal: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::default(),
            selector: SelectorPolicy::default(),
            shared_marker: default_shared_marker(),
            interaction_marker: default_interaction_marker(),
            responsive_mixins: Vec::new(),
            cache_capacity: default_limit(),
            resolution_ceiling: default_limit(),
            disallowed_margin_side: None,
            size_is_internal: default_size_is_internal(),
        }
    }
}

/// Compiled, immutable engine state shared by every file of a run.
#[derive(Debug)]
pub struct Engine {
    naming: NamingPolicy,
    selector: SelectorPolicy,
    patterns: PatternSet,
    value_matcher: ValueMatcher,
    shared_marker: Regex,
    interaction_marker: Regex,
    responsive_mixins: Vec<String>,
    cache_capacity: usize,
    resolution_ceiling: usize,
    disallowed_margin_side: Option<Side>,
    size_is_internal: bool,
    config_issues: Vec<ConfigIssue>,
}

impl Engine {
    /// Compile policies and markers, repairing invalid options.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let mut issues = Vec::new();

        let (naming, naming_issues) = config.naming.validated();
        issues.extend(naming_issues);
        let (selector, selector_issues) = config.selector.validated();
        issues.extend(selector_issues);

        let (patterns, pattern_issues) = PatternSet::compile(&naming);
        issues.extend(pattern_issues);
        let value_matcher = ValueMatcher::compile(&selector.value_rule);

        let shared_marker = compile_marker(
            &config.shared_marker,
            "shared_marker",
            &default_shared_marker(),
            &mut issues,
        );
        let interaction_marker = compile_marker(
            &config.interaction_marker,
            "interaction_marker",
            &default_interaction_marker(),
            &mut issues,
        );

        let cache_capacity = positive_limit(
            config.cache_capacity,
            "cache_capacity",
            &mut issues,
        );
        let resolution_ceiling = positive_limit(
            config.resolution_ceiling,
            "resolution_ceiling",
            &mut issues,
        );

        Self {
            naming,
            selector,
            patterns,
            value_matcher,
            shared_marker,
            interaction_marker,
            responsive_mixins: config.responsive_mixins,
            cache_capacity,
            resolution_ceiling,
            disallowed_margin_side: config.disallowed_margin_side,
            size_is_internal: config.size_is_internal,
            config_issues: issues,
        }
    }

    /// Configuration repairs collected during construction.
    #[must_use]
    pub fn config_issues(&self) -> &[ConfigIssue] {
        &self.config_issues
    }

    #[must_use]
    pub fn naming(&self) -> &NamingPolicy {
        &self.naming
    }

    #[must_use]
    pub fn selector_policy(&self) -> &SelectorPolicy {
        &self.selector
    }

    #[must_use]
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    #[must_use]
    pub fn value_matcher(&self) -> &ValueMatcher {
        &self.value_matcher
    }

    #[must_use]
    pub fn responsive_mixins(&self) -> &[String] {
        &self.responsive_mixins
    }

    #[must_use]
    pub const fn resolution_ceiling(&self) -> usize {
        self.resolution_ceiling
    }

    #[must_use]
    pub const fn disallowed_margin_side(&self) -> Option<Side> {
        self.disallowed_margin_side
    }

    #[must_use]
    pub const fn size_is_internal(&self) -> bool {
        self.size_is_internal
    }

    /// Run every check over one parsed stylesheet.
    #[must_use]
    pub fn check_sheet(&self, sheet: &Stylesheet) -> FileReport {
        let mut session = Session::new(self, sheet);

        let root_blocks = find_root_blocks(&mut session);
        debug!(roots = root_blocks.len(), "confirmed root blocks");
        let scan = sections::scan_sections(
            sheet,
            &self.shared_marker,
            &self.interaction_marker,
            &root_blocks,
        );

        let mut report = ReportBuilder::new(self.config_issues.clone());
        naming::check(&mut session, &scan, &mut report);
        placement::check(&mut session, &root_blocks, &scan, &mut report);

        let Session {
            parse_degraded,
            resolution_skip,
            ..
        } = session;
        report.finish(parse_degraded, resolution_skip)
    }
}

fn compile_marker(
    source: &str,
    option: &str,
    fallback: &str,
    issues: &mut Vec<ConfigIssue>,
) -> Regex {
    match Regex::new(source) {
        Ok(regex) => regex,
        Err(error) => {
            issues.push(ConfigIssue {
                option: option.to_string(),
                value: source.to_string(),
                message: format!("{error}; using '{fallback}'"),
            });
            Regex::new(fallback).unwrap_or_else(|_| unreachable!("default marker compiles"))
        }
    }
}

fn positive_limit(value: usize, option: &str, issues: &mut Vec<ConfigIssue>) -> usize {
    if value == 0 {
        issues.push(ConfigIssue {
            option: option.to_string(),
            value: "0".to_string(),
            message: format!("must be at least 1; using {DEFAULT_LIMIT}"),
        });
        DEFAULT_LIMIT
    } else {
        value
    }
}

/// Per-file mutable state: caches and degraded-coverage flags.
pub(crate) struct Session<'a> {
    pub(crate) engine: &'a Engine,
    pub(crate) sheet: &'a Stylesheet,
    parse_cache: LruCache<String, Option<Vec<SelectorChain>>>,
    strip_cache: LruCache<String, Vec<Stripped>>,
    family_cache: LruCache<String, Option<String>>,
    pub(crate) resolve_cache: LruCache<NodeId, Vec<String>>,
    pub(crate) parse_degraded: Option<String>,
    pub(crate) resolution_skip: Option<ResolutionSkip>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(engine: &'a Engine, sheet: &'a Stylesheet) -> Self {
        let capacity = engine.cache_capacity;
        Self {
            engine,
            sheet,
            parse_cache: LruCache::new(capacity),
            strip_cache: LruCache::new(capacity),
            family_cache: LruCache::new(capacity),
            resolve_cache: LruCache::new(capacity),
            parse_degraded: None,
            resolution_skip: None,
        }
    }

    /// Parse a selector list, remembering one failing example per file.
    pub(crate) fn parse_list(&mut self, text: &str) -> Option<Vec<SelectorChain>> {
        let key = text.to_string();
        if let Some(hit) = self.parse_cache.get(&key) {
            return hit.clone();
        }
        let parsed = match parse_selector_list(text) {
            Ok(chains) => Some(chains),
            Err(error) => {
                debug!(selector = text, %error, "selector parse failed");
                if self.parse_degraded.is_none() {
                    self.parse_degraded = Some(text.to_string());
                }
                None
            }
        };
        self.parse_cache.insert(key, parsed.clone());
        parsed
    }

    /// Parse and strip one selector list. A parse failure surfaces as a
    /// single [`Stripped::Unverified`] entry so callers fail closed.
    pub(crate) fn stripped_list(&mut self, text: &str) -> Vec<Stripped> {
        let key = text.to_string();
        if let Some(hit) = self.strip_cache.get(&key) {
            return hit.clone();
        }
        let stripped = self.parse_list(text).map_or_else(
            || vec![Stripped::Unverified],
            |chains| strip::strip_list(&chains),
        );
        self.strip_cache.insert(key, stripped.clone());
        stripped
    }

    /// Family key of a stripped chain, memoized by its canonical text.
    pub(crate) fn family_key_of(&mut self, chain: &SelectorChain) -> Option<String> {
        let key = chain.to_string();
        if let Some(hit) = self.family_cache.get(&key) {
            return hit.clone();
        }
        let family = family::family_key(
            chain,
            &self.engine.naming,
            &self.engine.patterns,
            &self.engine.selector,
        );
        self.family_cache.insert(key, family.clone());
        family
    }

    /// Resolved selectors of `rule`, then stripped and analyzed.
    pub(crate) fn rule_profile(&mut self, rule: NodeId) -> RuleProfile {
        let mut profile = RuleProfile::default();
        for selector in resolve::resolve_rule(self, rule) {
            for stripped in self.stripped_list(&selector) {
                match stripped {
                    Stripped::ForeignOnly => {}
                    Stripped::Unverified => profile.unverified = true,
                    Stripped::Local(chain) => {
                        match self.family_key_of(&chain) {
                            Some(family) => profile.families.push(family),
                            None => profile.family_gap = true,
                        }
                        if let Some(analysis) = analysis::analyze_chain(
                            &chain,
                            &self.engine.naming,
                            &self.engine.patterns,
                        ) {
                            profile.analyses.push(analysis);
                        }
                        profile.locals += 1;
                    }
                }
            }
        }
        profile
    }
}

/// Aggregated view of a rule's resolved, stripped selectors.
#[derive(Debug, Default)]
pub(crate) struct RuleProfile {
    pub(crate) analyses: Vec<ChainAnalysis>,
    pub(crate) families: Vec<String>,
    /// Count of local (non-foreign) chains.
    pub(crate) locals: usize,
    /// A chain failed to strip or parse.
    pub(crate) unverified: bool,
    /// A local chain produced no family key.
    pub(crate) family_gap: bool,
}

impl RuleProfile {
    /// Whether placement checks apply at all: a fully foreign (or empty,
    /// e.g. explosion-skipped) rule is exempt.
    pub(crate) fn applicable(&self) -> bool {
        self.locals > 0 || self.unverified
    }
}

/// Confirm root-structural-block rules: top level (at-rules transparent),
/// with at least one local chain and every local chain in a root role.
pub(crate) fn find_root_blocks(session: &mut Session<'_>) -> HashSet<NodeId> {
    let sheet = session.sheet;
    let mut roots = HashSet::new();
    for rule in sheet.rules() {
        if sheet.ancestors(rule).any(|a| sheet.is_rule(a)) {
            continue;
        }
        let profile = session.rule_profile(rule);
        if profile.locals == 0 || profile.unverified {
            continue;
        }
        let confirmed = profile.analyses.len() == profile.locals
            && profile.analyses.iter().all(|a| a.role.is_root());
        if confirmed {
            roots.insert(rule);
        }
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use bem_syntax::parse_sheet;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_compiles_clean() {
        let engine = Engine::new(EngineConfig::default());
        assert!(engine.config_issues().is_empty());
    }

    #[test]
    fn bad_marker_and_limits_are_repaired() {
        let engine = Engine::new(EngineConfig {
            shared_marker: "([unclosed".into(),
            cache_capacity: 0,
            resolution_ceiling: 0,
            ..EngineConfig::default()
        });
        let options: Vec<&str> = engine
            .config_issues()
            .iter()
            .map(|i| i.option.as_str())
            .collect();
        assert_eq!(
            options,
            vec!["shared_marker", "cache_capacity", "resolution_ceiling"]
        );
        assert_eq!(engine.resolution_ceiling(), DEFAULT_LIMIT);
    }

    #[test]
    fn config_issues_appear_in_every_report() {
        let engine = Engine::new(EngineConfig {
            naming: NamingPolicy {
                block_max_words: 500,
                ..NamingPolicy::default()
            },
            ..EngineConfig::default()
        });
        let sheet = parse_sheet(".card-box { color: red; }").expect("parse");
        let report = engine.check_sheet(&sheet);
        assert_eq!(report.config_issues.len(), 1);
        assert_eq!(report.config_issues[0].option, "naming.block_max_words");
    }

    #[test]
    fn root_blocks_are_confirmed_top_level_only() {
        let engine = Engine::new(EngineConfig::default());
        let sheet = parse_sheet(
            ".card-box { > .title { color: red; } }\n\
             .title { color: red; }\n\
             @media screen { .nav-bar { color: red; } }\n\
             :global(.legacy) { color: red; }",
        )
        .expect("parse");
        let mut session = Session::new(&engine, &sheet);
        let roots = find_root_blocks(&mut session);

        let top: Vec<NodeId> = sheet.children(sheet.root()).to_vec();
        assert!(roots.contains(&top[0]), "block rule is a root");
        assert!(!roots.contains(&top[1]), "element rule is not a root");
        let media_rule = sheet.children(top[2])[0];
        assert!(roots.contains(&media_rule), "at-rules are transparent");
        assert!(!roots.contains(&top[3]), "foreign rules are not roots");
    }

    #[test]
    fn parse_failures_set_the_flag_once() {
        let engine = Engine::new(EngineConfig::default());
        let sheet = parse_sheet(".card-box { color: red; }").expect("parse");
        let mut session = Session::new(&engine, &sheet);
        assert!(session.parse_list("#{$bad}").is_none());
        assert!(session.parse_list("#{$worse}").is_none());
        assert_eq!(session.parse_degraded.as_deref(), Some("#{$bad}"));
    }
}
