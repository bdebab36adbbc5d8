//! Nested "parent substitution" selector resolution.
//!
//! Flattens SCSS-style nesting into fully-qualified selector lists: each
//! level either substitutes its parent's resolved selectors for every `&`
//! marker or concatenates as a descendant. The Cartesian product at each
//! level is capped by the resolution ceiling; a rule that would overflow
//! resolves to an empty list (dependent checks skip it) and one summary
//! diagnostic is recorded for the file.

use bem_syntax::ast::NodeId;
use bem_syntax::parser::split_selector_list;
use tracing::{debug, warn};

use crate::report::ResolutionSkip;
use crate::session::Session;

/// The SCSS parent-substitution marker.
const NESTING_MARKER: char = '&';

/// Fully-qualified selectors of `rule`, memoized per node.
///
/// An empty result means the rule has nothing checkable: either its selector
/// text was empty or resolution hit the explosion guard.
pub(crate) fn resolve_rule(session: &mut Session<'_>, rule: NodeId) -> Vec<String> {
    if let Some(hit) = session.resolve_cache.get(&rule) {
        return hit.clone();
    }

    // Ancestor rules, outermost first; at-rules are transparent.
    let sheet = session.sheet;
    let mut levels = vec![rule];
    levels.extend(sheet.ancestors(rule).filter(|&a| sheet.is_rule(a)));
    levels.reverse();

    // A cache hit at any ancestor short-circuits the walk above it.
    let mut resolved: Vec<String> = Vec::new();
    let mut is_top = true;
    let mut start = 0;
    for (i, level) in levels.iter().enumerate().rev() {
        if let Some(hit) = session.resolve_cache.get(level) {
            resolved = hit.clone();
            is_top = false;
            start = i + 1;
            break;
        }
    }

    let ceiling = session.engine.resolution_ceiling();
    for &level in &levels[start..] {
        let own = session
            .sheet
            .selector_text(level)
            .map(split_selector_list)
            .unwrap_or_default();

        if own.is_empty() || (!is_top && resolved.is_empty()) {
            resolved = Vec::new();
        } else {
            match combine(&resolved, &own, is_top, ceiling) {
                Some(combined) => resolved = combined,
                None => {
                    warn!(
                        ceiling,
                        selector = own[0].as_str(),
                        "nested selector resolution exceeded the ceiling"
                    );
                    if session.resolution_skip.is_none() {
                        session.resolution_skip = Some(ResolutionSkip {
                            ceiling,
                            selector: own[0].clone(),
                        });
                    }
                    resolved = Vec::new();
                }
            }
        }
        is_top = false;
        session.resolve_cache.insert(level, resolved.clone());
    }

    debug!(rule = %rule, count = resolved.len(), "resolved selectors");
    resolved
}

/// One level of the product; `None` when the ceiling is exceeded.
fn combine(parents: &[String], own: &[String], is_top: bool, ceiling: usize) -> Option<Vec<String>> {
    if is_top {
        return Some(own.to_vec());
    }
    if parents.len().saturating_mul(own.len()) > ceiling {
        return None;
    }
    let mut out = Vec::with_capacity(parents.len() * own.len());
    for parent in parents {
        for child in own {
            if child.contains(NESTING_MARKER) {
                out.push(child.replace(NESTING_MARKER, parent));
            } else {
                out.push(format!("{parent} {child}"));
            }
            // The ceiling also bounds the running total mid-product.
            if out.len() > ceiling {
                return None;
            }
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Engine, EngineConfig};
    use bem_syntax::parse_sheet;
    use bem_syntax::ast::Stylesheet;
    use pretty_assertions::assert_eq;

    fn resolve_last_rule(source: &str, config: EngineConfig) -> (Vec<String>, Option<ResolutionSkip>) {
        let engine = Engine::new(config);
        let sheet = parse_sheet(source).expect("parse");
        let rule = sheet.rules().last().expect("a rule");
        let mut session = Session::new(&engine, &sheet);
        let resolved = resolve_rule(&mut session, rule);
        (resolved, session.resolution_skip)
    }

    #[test]
    fn top_level_rules_resolve_to_their_own_list() {
        let (resolved, skip) =
            resolve_last_rule(".card, .panel { color: red; }", EngineConfig::default());
        assert_eq!(resolved, vec![".card".to_string(), ".panel".to_string()]);
        assert!(skip.is_none());
    }

    #[test]
    fn descendant_concatenation_without_marker() {
        let (resolved, _) = resolve_last_rule(
            ".card { > .title { color: red; } }",
            EngineConfig::default(),
        );
        assert_eq!(resolved, vec![".card > .title".to_string()]);
    }

    #[test]
    fn marker_substitutes_every_occurrence() {
        let (resolved, _) = resolve_last_rule(
            ".card { &.compact, & + & { color: red; } }",
            EngineConfig::default(),
        );
        assert_eq!(
            resolved,
            vec![".card.compact".to_string(), ".card + .card".to_string()]
        );
    }

    #[test]
    fn products_multiply_across_levels() {
        let (resolved, _) = resolve_last_rule(
            ".a, .b { .c, .d { color: red; } }",
            EngineConfig::default(),
        );
        assert_eq!(
            resolved,
            vec![
                ".a .c".to_string(),
                ".a .d".to_string(),
                ".b .c".to_string(),
                ".b .d".to_string(),
            ]
        );
    }

    #[test]
    fn explosion_guard_reports_once_and_yields_empty() {
        let parents: Vec<String> = (0..1001).map(|i| format!(".p{i}")).collect();
        let source = format!("{} {{ .child {{ color: red; }} }}", parents.join(", "));
        let (resolved, skip) = resolve_last_rule(&source, EngineConfig::default());
        assert!(resolved.is_empty());
        let skip = skip.expect("explosion recorded");
        assert_eq!(skip.ceiling, 1000);
        assert_eq!(skip.selector, ".child");
    }

    #[test]
    fn under_the_ceiling_is_not_flagged() {
        let parents: Vec<String> = (0..1000).map(|i| format!(".p{i}")).collect();
        let source = format!("{} {{ .child {{ color: red; }} }}", parents.join(", "));
        let (resolved, skip) = resolve_last_rule(&source, EngineConfig::default());
        assert_eq!(resolved.len(), 1000);
        assert!(skip.is_none());
    }

    #[test]
    fn descendants_of_an_exploded_level_stay_empty() {
        let engine = Engine::new(EngineConfig {
            resolution_ceiling: 2,
            ..EngineConfig::default()
        });
        let sheet = parse_sheet(".a, .b, .c { .d { .e { color: red; } } }").expect("parse");
        let rules: Vec<_> = sheet.rules().collect();
        let mut session = Session::new(&engine, &sheet);
        // `.d` explodes (3 parents x 1 > 2); `.e` under it must stay empty,
        // not fall back to treating itself as top-level.
        assert!(resolve_rule(&mut session, rules[1]).is_empty());
        assert!(resolve_rule(&mut session, rules[2]).is_empty());
    }

    #[test]
    fn memoized_ancestors_short_circuit() {
        let engine = Engine::new(EngineConfig::default());
        let sheet: Stylesheet =
            parse_sheet(".a { .b { color: red; } .c { color: red; } }").expect("parse");
        let rules: Vec<_> = sheet.rules().collect();
        let mut session = Session::new(&engine, &sheet);
        assert_eq!(resolve_rule(&mut session, rules[1]), vec![".a .b".to_string()]);
        // Second sibling reuses the cached `.a` resolution.
        assert_eq!(resolve_rule(&mut session, rules[2]), vec![".a .c".to_string()]);
        assert_eq!(
            resolve_rule(&mut session, rules[0]),
            vec![".a".to_string()]
        );
    }
}
