//! Selector sum types.
//!
//! A selector list is a sequence of [`SelectorChain`]s; a chain is compounds
//! joined by combinators, optionally with a leading combinator (SCSS nested
//! selectors like `> .title`); a [`Compound`] is simple selectors with no
//! combinator between them. Functional pseudo-classes that take selector
//! arguments (`:is`, `:where`, `:not`, `:has`, `:global`, `:local`) keep
//! their arguments as parsed chains so consumers can recurse; anything else
//! keeps the raw argument text.

use std::fmt;

/// Relationship operator between two compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace: ancestor descendant.
    Descendant,
    /// `>`: parent > child.
    Child,
    /// `+`: prev + next.
    NextSibling,
    /// `~`: prev ~ subsequent.
    SubsequentSibling,
}

impl Combinator {
    /// The bare token, as used in family keys.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => ">",
            Self::NextSibling => "+",
            Self::SubsequentSibling => "~",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Attribute matcher operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrOp {
    /// `[attr=val]`
    Eq,
    /// `[attr~=val]`
    Includes,
    /// `[attr|=val]`
    DashMatch,
    /// `[attr^=val]`
    Prefix,
    /// `[attr$=val]`
    Suffix,
    /// `[attr*=val]`
    Substring,
}

impl AttrOp {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }
}

/// The `op value` half of an attribute selector; absent for bare `[attr]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrMatcher {
    pub op: AttrOp,
    /// Value with surrounding quotes removed.
    pub value: String,
    /// Trailing case-sensitivity flag (`i` / `s`), if any.
    pub case_flag: Option<char>,
}

/// An `[attr]` or `[attr op value]` selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub matcher: Option<AttrMatcher>,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.name)?;
        if let Some(matcher) = &self.matcher {
            write!(f, "{}\"{}\"", matcher.op.token(), matcher.value)?;
            if let Some(flag) = matcher.case_flag {
                write!(f, " {flag}")?;
            }
        }
        f.write_str("]")
    }
}

/// Argument list of a pseudo-class or pseudo-element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoArgs {
    /// No parentheses at all (`:hover`, bare `:global`).
    None,
    /// Parsed selector chains (`:is(...)`, `:not(...)`, `:global(...)`).
    Selectors(Vec<SelectorChain>),
    /// Raw argument text for non-selector pseudos (`:nth-child(2n+1)`).
    Raw(String),
}

/// A pseudo-class (`:hover`) or pseudo-element (`::before`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pseudo {
    /// Name without the leading colon(s).
    pub name: String,
    /// Written with `::`.
    pub element: bool,
    pub args: PseudoArgs,
}

impl Pseudo {
    /// Whether this is the CSS-modules foreign marker, in either form.
    #[must_use]
    pub fn is_global(&self) -> bool {
        !self.element && self.name.eq_ignore_ascii_case("global")
    }

    /// Bare `:global` with no argument list.
    #[must_use]
    pub fn is_bare_global(&self) -> bool {
        self.is_global() && matches!(self.args, PseudoArgs::None)
    }

    /// Wrapping `:global(...)` form.
    #[must_use]
    pub fn is_wrapping_global(&self) -> bool {
        self.is_global() && matches!(self.args, PseudoArgs::Selectors(_))
    }
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let colons = if self.element { "::" } else { ":" };
        write!(f, "{colons}{}", self.name)?;
        match &self.args {
            PseudoArgs::None => Ok(()),
            PseudoArgs::Selectors(chains) => {
                f.write_str("(")?;
                for (i, chain) in chains.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{chain}")?;
                }
                f.write_str(")")
            }
            PseudoArgs::Raw(text) => write!(f, "({text})"),
        }
    }
}

/// One constraint on a single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// Type selector, e.g. `div`.
    Type(String),
    /// Universal selector `*`.
    Universal,
    /// ID selector `#foo`.
    Id(String),
    /// Class selector `.bar`.
    Class(String),
    Attribute(Attribute),
    Pseudo(Pseudo),
    /// SCSS parent-substitution marker `&`.
    Nesting,
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => f.write_str(name),
            Self::Universal => f.write_str("*"),
            Self::Id(name) => write!(f, "#{name}"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Attribute(attr) => write!(f, "{attr}"),
            Self::Pseudo(pseudo) => write!(f, "{pseudo}"),
            Self::Nesting => f.write_str("&"),
        }
    }
}

/// Simple selectors with no combinator between them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    pub parts: Vec<SimpleSelector>,
}

impl Compound {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Class names in this compound, in source order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            SimpleSelector::Class(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// Compounds joined by combinators, with an optional leading combinator.
///
/// Invariant: `combinators.len() == compounds.len() - 1`; `combinators[i]`
/// joins `compounds[i]` to `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorChain {
    /// Leading combinator of a nested selector like `> .title`; `Descendant`
    /// never appears here.
    pub leading: Option<Combinator>,
    pub compounds: Vec<Compound>,
    pub combinators: Vec<Combinator>,
}

impl SelectorChain {
    /// A chain holding a single compound.
    #[must_use]
    pub fn single(compound: Compound) -> Self {
        Self {
            leading: None,
            compounds: vec![compound],
            combinators: Vec::new(),
        }
    }

    /// The right-most compound, the subject of the chain.
    #[must_use]
    pub fn subject(&self) -> Option<&Compound> {
        self.compounds.last()
    }

    /// Combinator joining the subject to the rest, or the leading combinator
    /// for a single-compound nested chain.
    #[must_use]
    pub fn trailing_combinator(&self) -> Option<Combinator> {
        self.combinators.last().copied().or(self.leading)
    }
}

impl fmt::Display for SelectorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(leading) = self.leading {
            write!(f, "{} ", leading.token())?;
        }
        for (i, compound) in self.compounds.iter().enumerate() {
            if i > 0 {
                match self.combinators.get(i - 1) {
                    Some(Combinator::Descendant) | None => f.write_str(" ")?,
                    Some(other) => write!(f, " {} ", other.token())?,
                }
            }
            write!(f, "{compound}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn class(name: &str) -> SimpleSelector {
        SimpleSelector::Class(name.into())
    }

    #[test]
    fn chain_display_round_trips_combinators() {
        let chain = SelectorChain {
            leading: None,
            compounds: vec![
                Compound {
                    parts: vec![class("card")],
                },
                Compound {
                    parts: vec![class("title")],
                },
                Compound {
                    parts: vec![class("icon")],
                },
            ],
            combinators: vec![Combinator::Child, Combinator::Descendant],
        };
        assert_eq!(chain.to_string(), ".card > .title .icon");
    }

    #[test]
    fn leading_combinator_renders_first() {
        let chain = SelectorChain {
            leading: Some(Combinator::Child),
            compounds: vec![Compound {
                parts: vec![class("title")],
            }],
            combinators: Vec::new(),
        };
        assert_eq!(chain.to_string(), "> .title");
        assert_eq!(chain.trailing_combinator(), Some(Combinator::Child));
    }

    #[test]
    fn pseudo_display_with_selector_args() {
        let pseudo = Pseudo {
            name: "is".into(),
            element: false,
            args: PseudoArgs::Selectors(vec![
                SelectorChain::single(Compound {
                    parts: vec![class("card")],
                }),
                SelectorChain::single(Compound {
                    parts: vec![class("panel")],
                }),
            ]),
        };
        assert_eq!(pseudo.to_string(), ":is(.card, .panel)");
    }

    #[test]
    fn global_forms() {
        let bare = Pseudo {
            name: "global".into(),
            element: false,
            args: PseudoArgs::None,
        };
        assert!(bare.is_bare_global());
        assert!(!bare.is_wrapping_global());

        let wrapping = Pseudo {
            name: "global".into(),
            element: false,
            args: PseudoArgs::Selectors(vec![SelectorChain::single(Compound {
                parts: vec![class("legacy")],
            })]),
        };
        assert!(wrapping.is_wrapping_global());
        assert_eq!(wrapping.to_string(), ":global(.legacy)");
    }

    #[test]
    fn attribute_display() {
        let attr = Attribute {
            name: "data-state".into(),
            matcher: Some(AttrMatcher {
                op: AttrOp::Eq,
                value: "open".into(),
                case_flag: None,
            }),
        };
        assert_eq!(attr.to_string(), "[data-state=\"open\"]");

        let bare = Attribute {
            name: "aria-hidden".into(),
            matcher: None,
        };
        assert_eq!(bare.to_string(), "[aria-hidden]");
    }
}
