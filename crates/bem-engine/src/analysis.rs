//! Structural analysis of stripped selector chains.
//!
//! Maps a chain to its [`ChainRole`] (root / page-root / element /
//! child-block) from the subject compound's base class, and collects the
//! class and attribute nodes a chain carries, recursing through functional
//! pseudo arguments.

use bem_core::{ChainRole, Kind, NamingPolicy, PatternSet, classify};
use bem_syntax::selector::{
    Attribute, Combinator, Compound, PseudoArgs, SelectorChain, SimpleSelector,
};

/// Structural summary of one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainAnalysis {
    pub role: ChainRole,
    /// The subject compound's base class.
    pub base: String,
    pub base_kind: Kind,
    /// Combinator joining the subject to the rest of the chain (or the
    /// leading combinator of a single-compound nested chain).
    pub trailing: Option<Combinator>,
}

/// Analyze a stripped chain. `None` when the subject compound carries no
/// Block/Element base class to anchor a role.
#[must_use]
pub fn analyze_chain(
    chain: &SelectorChain,
    naming: &NamingPolicy,
    patterns: &PatternSet,
) -> Option<ChainAnalysis> {
    let subject = chain.subject()?;
    let (base, base_kind) = subject.classes().find_map(|name| {
        let kind = classify(name, naming, patterns);
        kind.is_base().then_some((name, kind))
    })?;

    let role = match base_kind {
        Kind::Element => ChainRole::Element,
        Kind::Block => {
            if chain.compounds.len() == 1 && chain.leading.is_none() {
                if naming.is_page_block(base) {
                    ChainRole::PageRoot
                } else {
                    ChainRole::Root
                }
            } else {
                ChainRole::ChildBlock
            }
        }
        Kind::Modifier | Kind::External | Kind::Invalid => return None,
    };

    Some(ChainAnalysis {
        role,
        base: base.to_string(),
        base_kind,
        trailing: chain.trailing_combinator(),
    })
}

/// Every class name in the chain, functional-pseudo arguments included.
#[must_use]
pub fn classes_in_chain(chain: &SelectorChain) -> Vec<&str> {
    let mut out = Vec::new();
    for compound in &chain.compounds {
        collect_classes(compound, &mut out);
    }
    out
}

fn collect_classes<'a>(compound: &'a Compound, out: &mut Vec<&'a str>) {
    for part in &compound.parts {
        match part {
            SimpleSelector::Class(name) => out.push(name),
            SimpleSelector::Pseudo(pseudo) => {
                if let PseudoArgs::Selectors(inner) = &pseudo.args {
                    for chain in inner {
                        for compound in &chain.compounds {
                            collect_classes(compound, out);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Every attribute node in the chain, functional-pseudo arguments included.
#[must_use]
pub fn attributes_in_chain(chain: &SelectorChain) -> Vec<&Attribute> {
    let mut out = Vec::new();
    for compound in &chain.compounds {
        collect_attributes(compound, &mut out);
    }
    out
}

fn collect_attributes<'a>(compound: &'a Compound, out: &mut Vec<&'a Attribute>) {
    for part in &compound.parts {
        match part {
            SimpleSelector::Attribute(attr) => out.push(attr),
            SimpleSelector::Pseudo(pseudo) => {
                if let PseudoArgs::Selectors(inner) = &pseudo.args {
                    for chain in inner {
                        for compound in &chain.compounds {
                            collect_attributes(compound, out);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}
