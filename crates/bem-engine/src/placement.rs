//! The property-placement check.
//!
//! Three rules, all driven by the shared engine:
//!
//! - item-side properties (flex/grid child placement) may not live on a
//!   component root; the parent rule decides placement. Page-layer roots and
//!   shared sections are exempt, margins are governed by the side rule below.
//! - the configured disallowed margin side must stay zero/`auto`/`initial`
//!   on component roots.
//! - `position: relative|absolute` must be paired with an offset declaration
//!   sharing the exact `(wrapper context key, family key)` pair, wherever in
//!   the file that offset lives. Selectors that cannot produce a family key
//!   fail closed.

use std::collections::{HashMap, HashSet};

use bem_core::{
    ChainRole, MarginSide, PropertyClass, Section, classify_property, is_margin_property,
    is_offset_property, is_zero_auto_or_initial, margin_side_token, parse_position,
};
use bem_syntax::ast::{NodeId, NodeKind};
use tracing::debug;

use crate::family::wrapper_context_key;
use crate::report::{CheckId, ReportBuilder};
use crate::sections::SectionScan;
use crate::session::{RuleProfile, Session};

pub(crate) fn check(
    session: &mut Session<'_>,
    root_blocks: &HashSet<NodeId>,
    scan: &SectionScan,
    report: &mut ReportBuilder,
) {
    let sheet = session.sheet;
    let declarations: Vec<(NodeId, String, String)> = sheet
        .iter()
        .filter_map(|id| match sheet.kind(id) {
            NodeKind::Declaration { property, value } => {
                Some((id, property.to_ascii_lowercase(), value.clone()))
            }
            _ => None,
        })
        .collect();

    let mut profiles: HashMap<NodeId, RuleProfile> = HashMap::new();

    // Offset index: every (wrapper context, family) pair that carries an
    // offset declaration anywhere in the file.
    let mut offsets: HashSet<(String, String)> = HashSet::new();
    for (decl, property, _) in &declarations {
        if !is_offset_property(property) {
            continue;
        }
        let Some(rule) = enclosing_rule(session, *decl) else {
            continue;
        };
        let wrapper = wrapper_context_key(sheet, *decl, session.engine.responsive_mixins());
        let profile = profile_for(session, &mut profiles, rule);
        for family in &profile.families {
            offsets.insert((wrapper.clone(), family.clone()));
        }
    }
    debug!(pairs = offsets.len(), "offset correlation index");

    for (decl, property, value) in &declarations {
        let Some(rule) = enclosing_rule(session, *decl) else {
            continue;
        };
        let profile = profile_for(session, &mut profiles, rule);
        if !profile.applicable() {
            continue;
        }
        let is_component_root = root_blocks.contains(&rule)
            && profile.analyses.iter().any(|a| a.role == ChainRole::Root);
        let section = scan.section_of(*decl);
        let line = sheet.line(*decl);

        if is_margin_property(property) {
            if let Some(side) = session.engine.disallowed_margin_side() {
                if is_component_root && section != Section::Shared {
                    if let MarginSide::Token(token) = margin_side_token(property, value, side) {
                        if !is_zero_auto_or_initial(&token) {
                            report.push(
                                CheckId::Placement,
                                line,
                                format!(
                                    "margin-{side} must be 0, auto, or initial on a component root, found '{token}'"
                                ),
                            );
                        }
                    }
                }
            }
            continue;
        }

        if property == "position" {
            check_position(session, &offsets, *decl, value, line, report, rule, &profiles);
            continue;
        }

        if classify_property(property, value, session.engine.size_is_internal())
            == Some(PropertyClass::Item)
            && is_component_root
            && section != Section::Shared
        {
            report.push(
                CheckId::Placement,
                line,
                format!(
                    "'{property}' places the component within its parent; move it to the parent's rule"
                ),
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn check_position(
    session: &Session<'_>,
    offsets: &HashSet<(String, String)>,
    decl: NodeId,
    value: &str,
    line: u32,
    report: &mut ReportBuilder,
    rule: NodeId,
    profiles: &HashMap<NodeId, RuleProfile>,
) {
    if !parse_position(value).requires_offset() {
        return;
    }
    let Some(profile) = profiles.get(&rule) else {
        return;
    };

    // Fail closed: a selector list that cannot be reduced to family keys
    // cannot be correlated, so the pairing is reported rather than assumed.
    if profile.unverified || profile.family_gap || profile.families.is_empty() {
        report.push(
            CheckId::Placement,
            line,
            format!(
                "position: {value} requires an offset, and this selector cannot be correlated across rules; declare the offset in this rule"
            ),
        );
        return;
    }

    let wrapper = wrapper_context_key(session.sheet, decl, session.engine.responsive_mixins());
    for family in &profile.families {
        if !offsets.contains(&(wrapper.clone(), family.clone())) {
            report.push(
                CheckId::Placement,
                line,
                format!(
                    "position: {value} on '{family}' has no top/right/bottom/left/inset declaration under the same conditions"
                ),
            );
        }
    }
}

/// Nearest enclosing rule of a node; at-rules are transparent.
fn enclosing_rule(session: &Session<'_>, node: NodeId) -> Option<NodeId> {
    let sheet = session.sheet;
    sheet.ancestors(node).find(|&a| sheet.is_rule(a))
}

fn profile_for<'p>(
    session: &mut Session<'_>,
    profiles: &'p mut HashMap<NodeId, RuleProfile>,
    rule: NodeId,
) -> &'p RuleProfile {
    profiles
        .entry(rule)
        .or_insert_with(|| session.rule_profile(rule))
}
