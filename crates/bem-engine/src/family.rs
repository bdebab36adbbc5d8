//! Canonical identities for cross-rule correlation.
//!
//! A *family key* names the rendered element a selector chain addresses: the
//! chain's base classes joined by combinator tokens (`card>title`). It exists
//! only when every compound reduces to exactly one Block/Element base class
//! plus permitted noise; anything ambiguous yields no key and callers fail
//! closed. A *wrapper context key* names the chain of enclosing conditional
//! at-rules; correlation never crosses two nodes whose wrapper keys differ.

use bem_core::{Kind, NamingPolicy, PatternSet, SelectorPolicy, classify};
use bem_syntax::ast::{NodeId, NodeKind, Stylesheet};
use bem_syntax::parser::parse_selector_list;
use bem_syntax::selector::{Combinator, Compound, Pseudo, PseudoArgs, SelectorChain, SimpleSelector};

/// Bound on functional-pseudo nesting during qualification.
const MAX_PSEUDO_DEPTH: usize = 16;

/// Functional pseudos whose arguments may restate the compound's base class.
fn is_transparent_pseudo(pseudo: &Pseudo) -> bool {
    !pseudo.element
        && matches!(
            pseudo.name.to_ascii_lowercase().as_str(),
            "is" | "where" | "not"
        )
}

/// Build the family key of a stripped, resolved selector chain.
///
/// Returns `None` (unverified) when any compound fails to qualify or when a
/// descendant combinator appears anywhere in the chain.
#[must_use]
pub fn family_key(
    chain: &SelectorChain,
    naming: &NamingPolicy,
    patterns: &PatternSet,
    selector_policy: &SelectorPolicy,
) -> Option<String> {
    if chain
        .combinators
        .iter()
        .any(|c| matches!(c, Combinator::Descendant))
    {
        return None;
    }

    let mut key = String::new();
    for (i, compound) in chain.compounds.iter().enumerate() {
        let base = compound_base(compound, naming, patterns, selector_policy, 0)?;
        if i > 0 {
            key.push_str(chain.combinators[i - 1].token());
        }
        key.push_str(&base);
    }
    if key.is_empty() { None } else { Some(key) }
}

/// The single Block/Element base class a compound reduces to, if it
/// qualifies.
fn compound_base(
    compound: &Compound,
    naming: &NamingPolicy,
    patterns: &PatternSet,
    selector_policy: &SelectorPolicy,
    depth: usize,
) -> Option<String> {
    if depth > MAX_PSEUDO_DEPTH {
        return None;
    }

    let mut base: Option<&str> = None;
    let mut modifier_seen = false;
    let mut pending: Vec<&Pseudo> = Vec::new();

    for part in &compound.parts {
        match part {
            SimpleSelector::Class(name) => match classify(name, naming, patterns) {
                Kind::Block | Kind::Element => {
                    if base.is_some() {
                        // Two simultaneous base classes: ambiguous identity.
                        return None;
                    }
                    base = Some(name);
                }
                Kind::Modifier => {
                    if !selector_policy.modifier_classes_allowed() || modifier_seen {
                        return None;
                    }
                    modifier_seen = true;
                }
                Kind::External => {}
                Kind::Invalid => return None,
            },
            SimpleSelector::Attribute(attr) => {
                if !selector_policy.permits_attribute(&attr.name) {
                    return None;
                }
            }
            SimpleSelector::Pseudo(pseudo) if is_transparent_pseudo(pseudo) => {
                if !matches!(pseudo.args, PseudoArgs::Selectors(_)) {
                    return None;
                }
                pending.push(pseudo);
            }
            SimpleSelector::Pseudo(_)
            | SimpleSelector::Type(_)
            | SimpleSelector::Id(_)
            | SimpleSelector::Universal
            | SimpleSelector::Nesting => return None,
        }
    }

    let base = base?;

    // A transparent pseudo qualifies only if every inner chain restates the
    // same base class the compound already carries.
    for pseudo in pending {
        let PseudoArgs::Selectors(inner) = &pseudo.args else {
            return None;
        };
        for inner_chain in inner {
            if inner_chain.leading.is_some() || inner_chain.compounds.len() != 1 {
                return None;
            }
            let inner_base = compound_base(
                &inner_chain.compounds[0],
                naming,
                patterns,
                selector_policy,
                depth + 1,
            )?;
            if inner_base != base {
                return None;
            }
        }
    }

    Some(base.to_string())
}

// ---------------------------------------------------------------------------
// Wrapper context keys
// ---------------------------------------------------------------------------

/// Build the wrapper context key for a node: the ordered token sequence of
/// its enclosing at-rules, outermost first.
///
/// Conditional wrappers (`media`, `supports`, `container`, `layer`)
/// contribute a normalized `name(prelude)` token so identical conditions
/// correlate and different ones never do. `@scope` contributes its
/// normalized prelude only when the prelude is a plain compound group;
/// `@include` contributes a matchable token only for allow-listed responsive
/// mixins. Everything else contributes a per-node unique token and therefore
/// never matches across nodes.
#[must_use]
pub fn wrapper_context_key(
    sheet: &Stylesheet,
    node: NodeId,
    responsive_mixins: &[String],
) -> String {
    let mut tokens: Vec<String> = Vec::new();
    for ancestor in sheet.ancestors(node) {
        if let NodeKind::AtRule { name, params } = sheet.kind(ancestor) {
            tokens.push(wrapper_token(ancestor, name, params, responsive_mixins));
        }
    }
    tokens.reverse();
    tokens.join("|")
}

fn wrapper_token(node: NodeId, name: &str, params: &str, responsive_mixins: &[String]) -> String {
    let name = name.to_ascii_lowercase();
    match name.as_str() {
        "scope" => scope_token(node, params),
        "media" | "supports" | "container" | "layer" => {
            format!("{name}({})", normalize_prelude(params))
        }
        "include" => {
            let mixin = params
                .split(['(', ' ', '\t'])
                .next()
                .unwrap_or_default()
                .trim();
            if responsive_mixins.iter().any(|m| m == mixin) {
                format!("include {}", normalize_prelude(params))
            } else {
                format!("include#{}", node.index())
            }
        }
        _ => format!("{name}#{}", node.index()),
    }
}

fn scope_token(node: NodeId, params: &str) -> String {
    // Only a plain compound group normalizes safely; `(.a) to (.b)` ranges
    // and anything unparseable get a unique token so they never match.
    let trimmed = params.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);
    match parse_selector_list(inner) {
        Ok(chains)
            if chains
                .iter()
                .all(|c| c.leading.is_none() && c.compounds.len() == 1) =>
        {
            format!("scope({})", normalize_prelude(params))
        }
        _ => format!("scope#{}", node.index()),
    }
}

/// Lowercase, collapse whitespace runs, and drop spaces next to punctuation
/// so textual variations of one condition share a token.
fn normalize_prelude(params: &str) -> String {
    let mut out = String::with_capacity(params.len());
    let mut pending_space = false;
    for c in params.trim().to_ascii_lowercase().chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if matches!(c, '(' | ')' | ':' | ',') {
            pending_space = false;
            out.push(c);
        } else {
            if pending_space && !out.ends_with(['(', ':', ',']) {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bem_core::ReprMode;
    use bem_syntax::parse_sheet;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn fixtures() -> (NamingPolicy, PatternSet, SelectorPolicy) {
        let naming = NamingPolicy::default();
        let (patterns, issues) = PatternSet::compile(&naming);
        assert!(issues.is_empty());
        (naming, patterns, SelectorPolicy::default())
    }

    fn key_of(text: &str) -> Option<String> {
        let (naming, patterns, selector_policy) = fixtures();
        let chains = parse_selector_list(text).expect("parse");
        assert_eq!(chains.len(), 1);
        family_key(&chains[0], &naming, &patterns, &selector_policy)
    }

    #[rstest]
    #[case(".search-form", Some("search-form"))]
    #[case(".search-form > .title", Some("search-form>title"))]
    #[case(".search-form > .title + .icon", Some("search-form>title+icon"))]
    #[case(".card-list ~ .card-list", Some("card-list~card-list"))]
    #[case(".search-form .title", None)] // descendant combinator
    #[case(".search-form.nav-bar", None)] // two simultaneous bases
    #[case("div.search-form", None)] // tag node
    #[case("#main", None)]
    #[case("*", None)]
    #[case("&.title", None)] // nesting marker
    #[case(".search-form:hover", None)] // unsupported pseudo
    #[case(".search-form[data-test-id=x]", None)] // disallowed attribute
    #[case(".search-form[data-state=open]", Some("search-form"))]
    #[case(".search-form[aria-expanded=true] > .title", Some("search-form>title"))]
    fn family_keys(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(key_of(text), expected.map(str::to_string), "for '{text}'");
    }

    #[test]
    fn identical_canonical_text_gives_identical_keys() {
        assert_eq!(key_of(".search-form>.title"), key_of(".search-form > .title"));
    }

    #[test]
    fn transparent_pseudo_must_restate_the_base() {
        assert_eq!(
            key_of(".search-form:not(.search-form)"),
            Some("search-form".into())
        );
        assert_eq!(
            key_of(".search-form:is(.search-form)"),
            Some("search-form".into())
        );
        // Inner base differs from the compound's own base.
        assert_eq!(key_of(".search-form:is(.nav-bar)"), None);
        // Inner chain with a combinator is not a restatement.
        assert_eq!(key_of(".search-form:is(.search-form > .title)"), None);
    }

    #[test]
    fn modifier_noise_follows_the_selector_policy() {
        let naming = NamingPolicy::default();
        let (patterns, _) = PatternSet::compile(&naming);
        let chains = parse_selector_list(".search-form.-compact").expect("parse");

        let data_only = SelectorPolicy::default();
        assert_eq!(family_key(&chains[0], &naming, &patterns, &data_only), None);

        let class_states = SelectorPolicy {
            state_mode: ReprMode::Class,
            ..SelectorPolicy::default()
        };
        assert_eq!(
            family_key(&chains[0], &naming, &patterns, &class_states),
            Some("search-form".into())
        );
    }

    #[test]
    fn external_classes_are_noise() {
        let naming = NamingPolicy {
            external_prefixes: vec!["js-".into()],
            ..NamingPolicy::default()
        };
        let (patterns, _) = PatternSet::compile(&naming);
        let chains = parse_selector_list(".search-form.js-hook").expect("parse");
        assert_eq!(
            family_key(&chains[0], &naming, &patterns, &SelectorPolicy::default()),
            Some("search-form".into())
        );
    }

    // -- wrapper context keys ------------------------------------------------

    fn sheet_and_decl(source: &str) -> (Stylesheet, NodeId) {
        let sheet = parse_sheet(source).expect("parse");
        let decl = sheet
            .iter()
            .find(|&id| matches!(sheet.kind(id), NodeKind::Declaration { .. }))
            .expect("declaration");
        (sheet, decl)
    }

    #[test]
    fn empty_context_for_unwrapped_nodes() {
        let (sheet, decl) = sheet_and_decl(".card { left: 0; }");
        assert_eq!(wrapper_context_key(&sheet, decl, &[]), "");
    }

    #[test]
    fn media_preludes_normalize() {
        let (a, decl_a) =
            sheet_and_decl("@media (min-width: 768px) { .card { left: 0; } }");
        let (b, decl_b) =
            sheet_and_decl("@media   (min-width:768px) { .card { left: 0; } }");
        let key_a = wrapper_context_key(&a, decl_a, &[]);
        let key_b = wrapper_context_key(&b, decl_b, &[]);
        assert_eq!(key_a, "media((min-width:768px))");
        assert_eq!(key_a, key_b);
    }

    #[test]
    fn different_conditions_never_match() {
        let (a, decl_a) =
            sheet_and_decl("@media (min-width: 768px) { .card { left: 0; } }");
        let (b, decl_b) =
            sheet_and_decl("@media (min-width: 1024px) { .card { left: 0; } }");
        assert_ne!(
            wrapper_context_key(&a, decl_a, &[]),
            wrapper_context_key(&b, decl_b, &[])
        );
    }

    #[test]
    fn nested_wrappers_order_outermost_first() {
        let (sheet, decl) = sheet_and_decl(
            "@layer components { @media screen { .card { left: 0; } } }",
        );
        assert_eq!(
            wrapper_context_key(&sheet, decl, &[]),
            "layer(components)|media(screen)"
        );
    }

    #[test]
    fn allowlisted_includes_are_matchable() {
        let source = ".card { @include respond-to(tablet) { left: 0; } }";
        let (sheet, decl) = sheet_and_decl(source);
        let allow = vec!["respond-to".to_string()];
        assert_eq!(
            wrapper_context_key(&sheet, decl, &allow),
            "include respond-to(tablet)"
        );

        // Same include, not allow-listed: unique per node, never matchable.
        assert!(wrapper_context_key(&sheet, decl, &[]).starts_with("include#"));
    }

    #[test]
    fn unknown_at_rules_are_unique_per_node() {
        let sheet = parse_sheet(
            "@keyframes spin { left: 0; }\n@keyframes spin2 { left: 1px; }",
        )
        .expect("parse");
        let decls: Vec<NodeId> = sheet
            .iter()
            .filter(|&id| matches!(sheet.kind(id), NodeKind::Declaration { .. }))
            .collect();
        let key_a = wrapper_context_key(&sheet, decls[0], &[]);
        let key_b = wrapper_context_key(&sheet, decls[1], &[]);
        assert!(key_a.starts_with("keyframes#"));
        assert_ne!(key_a, key_b);
    }

    #[test]
    fn scope_preludes() {
        let (simple, simple_decl) =
            sheet_and_decl("@scope (.card) { .title { left: 0; } }");
        assert_eq!(
            wrapper_context_key(&simple, simple_decl, &[]),
            "scope((.card))"
        );

        let (range, range_decl) =
            sheet_and_decl("@scope (.card) to (.footer) { .title { left: 0; } }");
        assert!(wrapper_context_key(&range, range_decl, &[]).starts_with("scope#"));
    }
}
