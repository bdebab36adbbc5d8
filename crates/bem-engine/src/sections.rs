//! Comment-delimited section scanning.
//!
//! A marker comment (`// shared`, `// interaction`) directly under a
//! confirmed root-block rule opens a region over the following sibling rules
//! until the next marker comment or the end of the container. Membership is
//! precomputed in one pass and answered in O(1) per node.

use std::collections::HashSet;

use bem_core::Section;
use bem_syntax::ast::{NodeId, NodeKind, Stylesheet};
use regex::Regex;

/// Result of one section pre-scan.
#[derive(Debug)]
pub struct SectionScan {
    tags: Vec<Section>,
    /// Marker comments that were not directly under a root block; they
    /// contribute no membership and the naming check flags them.
    pub unanchored: Vec<NodeId>,
}

impl SectionScan {
    /// Membership of `node`: the tag of the nearest enclosing tagged rule.
    #[must_use]
    pub fn section_of(&self, node: NodeId) -> Section {
        self.tags
            .get(node.index())
            .copied()
            .unwrap_or(Section::None)
    }
}

/// Which marker, if any, a comment text matches.
fn marker_of(text: &str, shared: &Regex, interaction: &Regex) -> Option<Section> {
    if shared.is_match(text) {
        Some(Section::Shared)
    } else if interaction.is_match(text) {
        Some(Section::Interaction)
    } else {
        None
    }
}

/// Pre-scan the sheet for section membership.
pub fn scan_sections(
    sheet: &Stylesheet,
    shared: &Regex,
    interaction: &Regex,
    root_blocks: &HashSet<NodeId>,
) -> SectionScan {
    let mut tags = vec![Section::None; sheet.len()];
    let mut unanchored = Vec::new();

    for node in sheet.iter() {
        let NodeKind::Comment { text } = sheet.kind(node) else {
            continue;
        };
        if marker_of(text, shared, interaction).is_some()
            && !sheet.parent(node).is_some_and(|p| root_blocks.contains(&p))
        {
            unanchored.push(node);
        }
    }

    for &root in root_blocks {
        let mut current = Section::None;
        for &child in sheet.children(root) {
            match sheet.kind(child) {
                NodeKind::Comment { text } => {
                    // A marker closes the open region and may open a new one;
                    // unrelated comments change nothing.
                    if let Some(section) = marker_of(text, shared, interaction) {
                        current = section;
                    }
                }
                NodeKind::Rule { .. } | NodeKind::AtRule { .. } => {
                    if current != Section::None {
                        for node in sheet.descendants(child) {
                            tags[node.index()] = current;
                        }
                    }
                }
                NodeKind::Root | NodeKind::Declaration { .. } => {}
            }
        }
    }

    SectionScan { tags, unanchored }
}
