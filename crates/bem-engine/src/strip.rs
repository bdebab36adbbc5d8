//! CSS-modules global-scope stripping.
//!
//! `:global` marks selector segments as out of scope for local naming and
//! structure rules. The wrapping form `:global(<list>)` makes only the
//! wrapped nodes foreign; the bare form `:global` makes every node from that
//! point rightward foreign, across remaining combinators. Stripping removes
//! foreign references while preserving combinator intent: a surviving
//! compound whose foreign left-hand operand was deleted keeps the combinator
//! as a leading token.

use bem_syntax::selector::{Combinator, Compound, Pseudo, PseudoArgs, SelectorChain, SimpleSelector};

/// Bound on functional-pseudo nesting; deeper chains downgrade to unverified
/// instead of recursing further.
const MAX_PSEUDO_DEPTH: usize = 16;

/// Outcome of stripping one selector chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stripped {
    /// The chain with foreign references removed. `leading` on the chain
    /// records a combinator whose left-hand operand was foreign.
    Local(SelectorChain),
    /// The chain addresses only foreign elements; skip it for naming and
    /// placement purposes.
    ForeignOnly,
    /// The chain cannot be analyzed safely (emptied negation, pathological
    /// nesting); callers fail closed.
    Unverified,
}

/// Strip every chain of a selector list.
#[must_use]
pub fn strip_list(chains: &[SelectorChain]) -> Vec<Stripped> {
    chains.iter().map(strip_chain).collect()
}

/// A selector list is foreign-only iff every member is.
#[must_use]
pub fn list_is_foreign_only(stripped: &[Stripped]) -> bool {
    !stripped.is_empty() && stripped.iter().all(|s| matches!(s, Stripped::ForeignOnly))
}

/// Strip one selector chain.
#[must_use]
pub fn strip_chain(chain: &SelectorChain) -> Stripped {
    strip_chain_at(chain, 0)
}

fn strip_chain_at(chain: &SelectorChain, depth: usize) -> Stripped {
    if depth > MAX_PSEUDO_DEPTH {
        return Stripped::Unverified;
    }

    // Bare-form taint: everything from the marker rightward is foreign.
    let mut work = chain.clone();
    if let Some((ci, pi)) = first_bare_global(&work) {
        if has_nodes_after(&work, ci, pi) {
            work.compounds.truncate(ci + 1);
            work.combinators.truncate(ci);
            work.compounds[ci].parts.truncate(pi);
            if work.compounds[ci].parts.is_empty() {
                work.compounds.pop();
                work.combinators.pop();
            }
            if work.compounds.is_empty() {
                return Stripped::ForeignOnly;
            }
        }
    }

    // Foreign-only subject: the rule styles a foreign element end to end.
    if work.compounds.last().is_some_and(|c| compound_is_foreign(c, depth)) {
        return Stripped::ForeignOnly;
    }

    // Delete remaining foreign references from the clone.
    let mut compounds: Vec<Compound> = Vec::with_capacity(work.compounds.len());
    let mut combinators: Vec<Combinator> = Vec::new();
    let mut leading = work.leading;
    let mut last_kept: Option<usize> = None;

    for (i, compound) in work.compounds.iter().enumerate() {
        match strip_compound(compound, depth) {
            CompoundStrip::WholeForeign => return Stripped::ForeignOnly,
            CompoundStrip::WholeUnverified => return Stripped::Unverified,
            CompoundStrip::Dropped => {}
            CompoundStrip::Kept(kept) => {
                if compounds.is_empty() {
                    if i > 0 {
                        // The left-hand operand was foreign; keep the
                        // structural position, drop meaningless descendants.
                        leading = match work.combinators[i - 1] {
                            Combinator::Descendant => None,
                            other => Some(other),
                        };
                    }
                } else {
                    let joined = if last_kept == Some(i - 1) {
                        work.combinators[i - 1]
                    } else {
                        // A foreign compound sat between the survivors; the
                        // exact relationship is lost, weaken to descendant.
                        Combinator::Descendant
                    };
                    combinators.push(joined);
                }
                compounds.push(kept);
                last_kept = Some(i);
            }
        }
    }

    if compounds.is_empty() {
        return Stripped::ForeignOnly;
    }
    Stripped::Local(SelectorChain {
        leading,
        compounds,
        combinators,
    })
}

/// Position of the first bare `:global`, as (compound index, part index).
fn first_bare_global(chain: &SelectorChain) -> Option<(usize, usize)> {
    for (ci, compound) in chain.compounds.iter().enumerate() {
        for (pi, part) in compound.parts.iter().enumerate() {
            if let SimpleSelector::Pseudo(pseudo) = part {
                if pseudo.is_bare_global() {
                    return Some((ci, pi));
                }
            }
        }
    }
    None
}

fn has_nodes_after(chain: &SelectorChain, ci: usize, pi: usize) -> bool {
    chain.compounds[ci].parts.len() > pi + 1 || chain.compounds.len() > ci + 1
}

/// Whether a compound addresses only foreign elements: at least one foreign
/// reference, no local class/tag/id/attribute nodes, and every functional
/// pseudo's arguments recursively foreign. Negation does not count as
/// foreign — `:not(everything-foreign)` still selects local elements.
fn compound_is_foreign(compound: &Compound, depth: usize) -> bool {
    if depth > MAX_PSEUDO_DEPTH {
        return false;
    }
    let mut has_foreign = false;
    for part in &compound.parts {
        match part {
            SimpleSelector::Pseudo(pseudo) if pseudo.is_global() => has_foreign = true,
            SimpleSelector::Pseudo(pseudo) => match &pseudo.args {
                PseudoArgs::Selectors(inner) if !is_negation(pseudo) => {
                    if inner.iter().all(|c| chain_is_foreign(c, depth + 1)) {
                        has_foreign = true;
                    } else {
                        return false;
                    }
                }
                PseudoArgs::Selectors(_) => return false,
                // Plain pseudos (`:hover`) and raw-arg pseudos are noise on
                // whatever element the rest of the compound addresses.
                PseudoArgs::None | PseudoArgs::Raw(_) => {}
            },
            SimpleSelector::Type(_)
            | SimpleSelector::Universal
            | SimpleSelector::Id(_)
            | SimpleSelector::Class(_)
            | SimpleSelector::Attribute(_)
            | SimpleSelector::Nesting => return false,
        }
    }
    has_foreign
}

fn chain_is_foreign(chain: &SelectorChain, depth: usize) -> bool {
    !chain.compounds.is_empty()
        && chain
            .compounds
            .iter()
            .all(|compound| compound_is_foreign(compound, depth))
}

fn is_negation(pseudo: &Pseudo) -> bool {
    !pseudo.element && pseudo.name.eq_ignore_ascii_case("not")
}

enum CompoundStrip {
    Kept(Compound),
    /// Every part was foreign; the compound disappears.
    Dropped,
    /// A non-negation functional pseudo lost all its arguments; the original
    /// constraint cannot be represented, the whole selector is foreign.
    WholeForeign,
    /// A negation lost all its arguments, or nesting ran too deep.
    WholeUnverified,
}

fn strip_compound(compound: &Compound, depth: usize) -> CompoundStrip {
    if depth > MAX_PSEUDO_DEPTH {
        return CompoundStrip::WholeUnverified;
    }
    let mut parts = Vec::with_capacity(compound.parts.len());
    for part in &compound.parts {
        match part {
            SimpleSelector::Pseudo(pseudo) if pseudo.is_global() => {}
            SimpleSelector::Pseudo(pseudo) => {
                if let PseudoArgs::Selectors(inner) = &pseudo.args {
                    let mut kept_inner = Vec::with_capacity(inner.len());
                    for inner_chain in inner {
                        match strip_chain_at(inner_chain, depth + 1) {
                            Stripped::Local(local) => kept_inner.push(local),
                            Stripped::ForeignOnly => {}
                            Stripped::Unverified => return CompoundStrip::WholeUnverified,
                        }
                    }
                    if kept_inner.is_empty() {
                        return if is_negation(pseudo) {
                            CompoundStrip::WholeUnverified
                        } else {
                            CompoundStrip::WholeForeign
                        };
                    }
                    parts.push(SimpleSelector::Pseudo(Pseudo {
                        name: pseudo.name.clone(),
                        element: pseudo.element,
                        args: PseudoArgs::Selectors(kept_inner),
                    }));
                } else {
                    parts.push(part.clone());
                }
            }
            _ => parts.push(part.clone()),
        }
    }
    if parts.is_empty() {
        CompoundStrip::Dropped
    } else {
        CompoundStrip::Kept(Compound { parts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bem_syntax::parse_selector_list;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn strip_one(text: &str) -> Stripped {
        let chains = parse_selector_list(text).expect("parse");
        assert_eq!(chains.len(), 1);
        strip_chain(&chains[0])
    }

    fn local_text(stripped: &Stripped) -> String {
        match stripped {
            Stripped::Local(chain) => chain.to_string(),
            other => panic!("expected local, got {other:?}"),
        }
    }

    #[rstest]
    #[case(".card")]
    #[case(".card > .title")]
    #[case(".card .title .icon")]
    #[case(":is(.card, .panel) > .title")]
    #[case("> .title")]
    fn no_foreign_form_is_unchanged(#[case] text: &str) {
        assert_eq!(local_text(&strip_one(text)), text);
    }

    #[rstest]
    #[case(":global(.legacy)")]
    #[case(":global(.legacy):hover")]
    #[case(".card :global(.legacy)")]
    #[case(":global(.a) :global(.b)")]
    #[case(":global .legacy .scoped")]
    #[case(".card :global .legacy")]
    #[case(":is(:global(.a), :global(.b))")]
    fn foreign_only_forms(#[case] text: &str) {
        assert_eq!(strip_one(text), Stripped::ForeignOnly, "for '{text}'");
    }

    #[test]
    fn wrapping_form_strips_in_place() {
        assert_eq!(local_text(&strip_one(".card:global(.theme-dark)")), ".card");
        assert_eq!(
            local_text(&strip_one(":global(.theme-dark) .card")),
            ".card"
        );
    }

    #[test]
    fn leading_combinator_survives_foreign_head() {
        let stripped = strip_one(":global(.modal) > .card");
        let Stripped::Local(chain) = &stripped else {
            panic!("expected local");
        };
        assert_eq!(chain.leading, Some(Combinator::Child));
        assert_eq!(chain.to_string(), "> .card");
    }

    #[test]
    fn foreign_middle_weakens_to_descendant() {
        assert_eq!(
            local_text(&strip_one(".card :global(.x) > .title")),
            ".card .title"
        );
    }

    #[test]
    fn bare_global_taints_only_rightward() {
        assert_eq!(local_text(&strip_one(".card:global .legacy")), ".card");
        assert_eq!(local_text(&strip_one(".card :global .a .b")), ".card");
    }

    #[test]
    fn trailing_bare_global_drops_cleanly() {
        // Nothing after the marker: the subject is the marker itself.
        assert_eq!(strip_one(".card :global"), Stripped::ForeignOnly);
        assert_eq!(local_text(&strip_one(".card:global")), ".card");
    }

    #[test]
    fn emptied_is_where_is_foreign_only() {
        assert_eq!(strip_one(":is(:global(.a)) .card"), Stripped::ForeignOnly);
        assert_eq!(
            strip_one(".card :where(:global(.a)) .title"),
            Stripped::ForeignOnly
        );
    }

    #[test]
    fn emptied_not_is_unverified() {
        // Negation polarity: :not(everything-foreign) still selects local
        // elements, so the check is dropped rather than skipped as foreign.
        assert_eq!(strip_one(":not(:global(.a)) .card"), Stripped::Unverified);
        assert_eq!(strip_one(".card:not(:global(.a))"), Stripped::Unverified);
    }

    #[test]
    fn pseudo_args_are_stripped_recursively() {
        assert_eq!(
            local_text(&strip_one(":is(.card, :global(.legacy)) .title")),
            ":is(.card) .title"
        );
    }

    #[test]
    fn list_is_foreign_only_requires_every_member() {
        let chains = parse_selector_list(":global(.a), .card").expect("parse");
        let stripped = strip_list(&chains);
        assert!(!list_is_foreign_only(&stripped));

        let chains = parse_selector_list(":global(.a), :global(.b)").expect("parse");
        assert!(list_is_foreign_only(&strip_list(&chains)));
    }

    #[test]
    fn stripping_is_idempotent() {
        let stripped = strip_one(":global(.modal) > .card:global(.x)");
        let Stripped::Local(chain) = &stripped else {
            panic!("expected local");
        };
        assert_eq!(strip_chain(chain), Stripped::Local(chain.clone()));
    }
}
