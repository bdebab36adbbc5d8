//! Class-name classification.

use crate::kind::Kind;
use crate::patterns::PatternSet;
use crate::policy::NamingPolicy;

/// Classify `name` under a policy and its compiled pattern set.
///
/// Total: every string gets exactly one [`Kind`]. Precedence, first match
/// wins: External (exact, then prefix) → Modifier → Block → Element →
/// Invalid. The generated patterns cannot overlap; pathological custom
/// overrides resolve through the same precedence order.
#[must_use]
pub fn classify(name: &str, policy: &NamingPolicy, patterns: &PatternSet) -> Kind {
    if policy.is_external(name) {
        Kind::External
    } else if patterns.is_modifier(name) {
        Kind::Modifier
    } else if patterns.is_block(name) {
        Kind::Block
    } else if patterns.is_element(name) {
        Kind::Element
    } else {
        Kind::Invalid
    }
}
