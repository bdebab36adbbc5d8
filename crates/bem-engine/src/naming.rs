//! The naming check.
//!
//! Validates every local class of every rule against the compiled naming
//! patterns, modifier classes against the selector policy, attribute values
//! against the value-naming rule, list-level role consistency, and the
//! anchoring of section marker comments.

use bem_core::{Kind, classify, example_name};
use bem_syntax::ast::NodeKind;
use bem_syntax::selector::SelectorChain;
use tracing::debug;

use crate::analysis::{self, ChainAnalysis};
use crate::report::{CheckId, ReportBuilder};
use crate::sections::SectionScan;
use crate::session::Session;
use crate::strip::Stripped;

pub(crate) fn check(session: &mut Session<'_>, scan: &SectionScan, report: &mut ReportBuilder) {
    let sheet = session.sheet;
    let rules: Vec<_> = sheet.rules().collect();
    debug!(rules = rules.len(), "naming check");

    for rule in rules {
        let line = sheet.line(rule);
        let Some(text) = sheet.selector_text(rule).map(str::to_string) else {
            continue;
        };
        let top_level = !sheet.ancestors(rule).any(|a| sheet.is_rule(a));

        let mut analyses: Vec<ChainAnalysis> = Vec::new();
        let mut all_analyzed = true;
        for stripped in session.stripped_list(&text) {
            let Stripped::Local(chain) = stripped else {
                all_analyzed = false;
                continue;
            };
            check_chain(session, &chain, line, report);
            match analysis::analyze_chain(&chain, session.engine.naming(), session.engine.patterns())
            {
                Some(analysis) => analyses.push(analysis),
                None => all_analyzed = false,
            }
        }

        // List-level consistency is judged on a rule's own selector list, and
        // only where the written roles are trustworthy: top level, with every
        // member analyzed. Page-root mixing is checked before role mixing.
        if top_level && all_analyzed && analyses.len() > 1 {
            let page_roots = analyses
                .iter()
                .filter(|a| matches!(a.role, bem_core::ChainRole::PageRoot))
                .count();
            if page_roots > 0 && page_roots < analyses.len() {
                report.push(
                    CheckId::Naming,
                    line,
                    "page-layer selectors must not share a rule with component selectors"
                        .to_string(),
                );
            } else if analyses.iter().any(|a| a.role != analyses[0].role) {
                report.push(
                    CheckId::Naming,
                    line,
                    "selectors in one list must share a structural role".to_string(),
                );
            }
        }
    }

    for &comment in &scan.unanchored {
        if let NodeKind::Comment { text } = sheet.kind(comment) {
            report.push(
                CheckId::Naming,
                sheet.line(comment),
                format!("'{text}' marker must be directly under a component root block"),
            );
        }
    }
}

fn check_chain(
    session: &Session<'_>,
    chain: &SelectorChain,
    line: u32,
    report: &mut ReportBuilder,
) {
    let engine = session.engine;
    let naming = engine.naming();
    let patterns = engine.patterns();
    let selector_policy = engine.selector_policy();

    for name in analysis::classes_in_chain(chain) {
        match classify(name, naming, patterns) {
            Kind::Invalid => {
                report.push(
                    CheckId::Naming,
                    line,
                    format!(
                        "class '{name}' matches no naming pattern; blocks look like '{}', elements like '{}'",
                        example_name(naming.case, Kind::Block, &naming.modifier_prefix),
                        example_name(naming.case, Kind::Element, &naming.modifier_prefix),
                    ),
                );
            }
            Kind::Modifier if !selector_policy.modifier_classes_allowed() => {
                report.push(
                    CheckId::Naming,
                    line,
                    format!(
                        "modifier class '{name}' is not allowed while variants and states use data attributes"
                    ),
                );
            }
            Kind::Block | Kind::Element | Kind::Modifier | Kind::External => {}
        }
    }

    let rule = selector_policy.value_rule;
    for attr in analysis::attributes_in_chain(chain) {
        if !selector_policy.permits_attribute(&attr.name) {
            continue;
        }
        if let Some(matcher) = &attr.matcher {
            if !engine.value_matcher().matches(&matcher.value) {
                report.push(
                    CheckId::Naming,
                    line,
                    format!(
                        "value '{}' of attribute '{}' must be {} case with at most {} words",
                        matcher.value,
                        attr.name,
                        rule.case,
                        rule.max_words,
                    ),
                );
            }
        }
    }
}
