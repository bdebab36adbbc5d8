//! Deterministic, side-effect-free selector-string parser.
//!
//! `parse_selector_list` turns raw selector text into [`SelectorChain`]s.
//! Failures are ordinary [`ParseError`] values; the engine surfaces them as a
//! per-file degraded-coverage flag instead of aborting, so the parser never
//! panics and never partially succeeds.

use crate::error::ParseError;
use crate::selector::{
    AttrMatcher, AttrOp, Attribute, Combinator, Compound, Pseudo, PseudoArgs, SelectorChain,
    SimpleSelector,
};

/// Pseudo-classes whose argument is itself a selector list.
const SELECTOR_ARG_PSEUDOS: [&str; 7] = ["global", "has", "is", "local", "matches", "not", "where"];

/// Parse a comma-separated selector list.
///
/// # Errors
/// Returns the first [`ParseError`] encountered; the caller treats the whole
/// list as unparseable.
pub fn parse_selector_list(text: &str) -> Result<Vec<SelectorChain>, ParseError> {
    let members = split_selector_list(text);
    if members.is_empty() {
        return Err(ParseError::EmptySelector);
    }
    members.iter().map(|member| parse_chain(member)).collect()
}

/// Split raw selector text on top-level commas, honoring parentheses,
/// brackets, and quotes. Members come back trimmed; empty members are
/// dropped.
#[must_use]
pub fn split_selector_list(text: &str) -> Vec<String> {
    let mut members = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut current = String::new();

    for c in text.chars() {
        if let Some(q) = quote {
            current.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                let member = current.trim();
                if !member.is_empty() {
                    members.push(member.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let member = current.trim();
    if !member.is_empty() {
        members.push(member.to_string());
    }
    members
}

/// Parse one selector chain (no top-level commas).
///
/// # Errors
/// Returns a [`ParseError`] on unexpected or unterminated input.
pub fn parse_chain(text: &str) -> Result<SelectorChain, ParseError> {
    let mut cursor = Cursor::new(text);
    cursor.skip_ws();

    let leading = cursor.take_combinator();
    if leading.is_some() {
        cursor.skip_ws();
    }

    let mut compounds = vec![parse_compound(&mut cursor)?];
    let mut combinators = Vec::new();

    loop {
        let had_ws = cursor.skip_ws();
        match cursor.peek() {
            None => break,
            Some('>' | '+' | '~') => {
                let combinator = cursor
                    .take_combinator()
                    .unwrap_or_else(|| unreachable!("peeked a combinator"));
                cursor.skip_ws();
                combinators.push(combinator);
                compounds.push(parse_compound(&mut cursor)?);
            }
            Some(_) if had_ws => {
                combinators.push(Combinator::Descendant);
                compounds.push(parse_compound(&mut cursor)?);
            }
            Some(found) => return Err(cursor.unexpected(found)),
        }
    }

    Ok(SelectorChain {
        leading,
        compounds,
        combinators,
    })
}

fn parse_compound(cursor: &mut Cursor<'_>) -> Result<Compound, ParseError> {
    let mut parts = Vec::new();
    loop {
        match cursor.peek() {
            Some('.') => {
                cursor.bump();
                parts.push(SimpleSelector::Class(cursor.expect_ident()?));
            }
            Some('#') => {
                cursor.bump();
                parts.push(SimpleSelector::Id(cursor.expect_ident()?));
            }
            Some('&') => {
                cursor.bump();
                parts.push(SimpleSelector::Nesting);
            }
            Some('*') => {
                cursor.bump();
                parts.push(SimpleSelector::Universal);
            }
            Some('[') => parts.push(SimpleSelector::Attribute(parse_attribute(cursor)?)),
            Some(':') => parts.push(SimpleSelector::Pseudo(parse_pseudo(cursor)?)),
            Some(c) if is_ident_start(c) => {
                parts.push(SimpleSelector::Type(cursor.ident()));
            }
            _ => break,
        }
    }
    if parts.is_empty() {
        return match cursor.peek() {
            Some(found) => Err(cursor.unexpected(found)),
            None => Err(ParseError::EmptySelector),
        };
    }
    Ok(Compound { parts })
}

fn parse_attribute(cursor: &mut Cursor<'_>) -> Result<Attribute, ParseError> {
    cursor.bump(); // '['
    cursor.skip_ws();
    let name = cursor.expect_ident()?;
    cursor.skip_ws();

    if cursor.peek() == Some(']') {
        cursor.bump();
        return Ok(Attribute {
            name,
            matcher: None,
        });
    }

    let op = match cursor.peek() {
        Some('=') => {
            cursor.bump();
            AttrOp::Eq
        }
        Some(prefix @ ('~' | '|' | '^' | '$' | '*')) => {
            cursor.bump();
            if cursor.peek() != Some('=') {
                return Err(cursor.unclosed(']'));
            }
            cursor.bump();
            match prefix {
                '~' => AttrOp::Includes,
                '|' => AttrOp::DashMatch,
                '^' => AttrOp::Prefix,
                '$' => AttrOp::Suffix,
                _ => AttrOp::Substring,
            }
        }
        Some(found) => return Err(cursor.unexpected(found)),
        None => return Err(cursor.unclosed(']')),
    };

    cursor.skip_ws();
    let value = match cursor.peek() {
        Some(quote @ ('"' | '\'')) => {
            cursor.bump();
            let value = cursor.take_until(quote)?;
            cursor.bump(); // closing quote
            value
        }
        Some(_) => {
            let mut value = String::new();
            while let Some(c) = cursor.peek() {
                if c == ']' || c.is_whitespace() {
                    break;
                }
                value.push(c);
                cursor.bump();
            }
            value
        }
        None => return Err(cursor.unclosed(']')),
    };

    cursor.skip_ws();
    let case_flag = match cursor.peek() {
        Some(flag @ ('i' | 'I' | 's' | 'S')) => {
            cursor.bump();
            cursor.skip_ws();
            Some(flag.to_ascii_lowercase())
        }
        _ => None,
    };

    if cursor.peek() != Some(']') {
        return Err(cursor.unclosed(']'));
    }
    cursor.bump();

    Ok(Attribute {
        name,
        matcher: Some(AttrMatcher {
            op,
            value,
            case_flag,
        }),
    })
}

fn parse_pseudo(cursor: &mut Cursor<'_>) -> Result<Pseudo, ParseError> {
    cursor.bump(); // ':'
    let element = cursor.peek() == Some(':');
    if element {
        cursor.bump();
    }
    let name = cursor.expect_ident()?;

    if cursor.peek() != Some('(') {
        return Ok(Pseudo {
            name,
            element,
            args: PseudoArgs::None,
        });
    }
    cursor.bump();
    let inner = cursor.take_balanced()?;

    let args = if SELECTOR_ARG_PSEUDOS.contains(&name.to_ascii_lowercase().as_str()) {
        PseudoArgs::Selectors(parse_selector_list(&inner)?)
    } else {
        PseudoArgs::Raw(inner.trim().to_string())
    };

    Ok(Pseudo {
        name,
        element,
        args,
    })
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

const fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

struct Cursor<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn take_combinator(&mut self) -> Option<Combinator> {
        let combinator = match self.peek()? {
            '>' => Combinator::Child,
            '+' => Combinator::NextSibling,
            '~' => Combinator::SubsequentSibling,
            _ => return None,
        };
        self.bump();
        Some(combinator)
    }

    fn ident(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            name.push(c);
            self.bump();
        }
        name
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        let name = self.ident();
        if name.is_empty() {
            return match self.peek() {
                Some(found) => Err(self.unexpected(found)),
                None => Err(ParseError::EmptySelector),
            };
        }
        Ok(name)
    }

    /// Consume up to (not including) the next unescaped `end`.
    fn take_until(&mut self, end: char) -> Result<String, ParseError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == end {
                return Ok(out);
            }
            out.push(c);
            self.bump();
        }
        Err(self.unclosed(end))
    }

    /// Consume a paren-balanced argument body, leaving the cursor past the
    /// closing `)`.
    fn take_balanced(&mut self) -> Result<String, ParseError> {
        let mut out = String::new();
        let mut depth = 1usize;
        let mut quote: Option<char> = None;
        while let Some(c) = self.peek() {
            self.bump();
            if let Some(q) = quote {
                if c == q {
                    quote = None;
                }
                out.push(c);
                continue;
            }
            match c {
                '"' | '\'' => {
                    quote = Some(c);
                    out.push(c);
                }
                '(' => {
                    depth += 1;
                    out.push(c);
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(c);
                }
                _ => out.push(c),
            }
        }
        Err(self.unclosed(')'))
    }

    fn unexpected(&self, found: char) -> ParseError {
        ParseError::UnexpectedChar {
            found,
            offset: self.pos,
            selector: self.text.to_string(),
        }
    }

    fn unclosed(&self, delimiter: char) -> ParseError {
        ParseError::Unclosed {
            delimiter,
            selector: self.text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse_one(text: &str) -> SelectorChain {
        let chains = parse_selector_list(text).expect("parse");
        assert_eq!(chains.len(), 1, "expected one chain for '{text}'");
        chains.into_iter().next().expect("one chain")
    }

    #[rstest]
    #[case(".card", ".card")]
    #[case(".card > .title", ".card > .title")]
    #[case(".card>.title", ".card > .title")]
    #[case(".card   .title", ".card .title")]
    #[case(".card + .card", ".card + .card")]
    #[case(".card ~ .card", ".card ~ .card")]
    #[case("ul.menu-list > li", "ul.menu-list > li")]
    #[case("> .title", "> .title")]
    #[case("&.title", "&.title")]
    #[case("*", "*")]
    #[case("#main", "#main")]
    #[case(".card:hover", ".card:hover")]
    #[case(".card::before", ".card::before")]
    #[case(":is(.card, .panel) > .title", ":is(.card, .panel) > .title")]
    #[case(":not(.card)", ":not(.card)")]
    #[case(":global(.legacy)", ":global(.legacy)")]
    fn parse_and_display_round_trip(#[case] input: &str, #[case] canonical: &str) {
        assert_eq!(parse_one(input).to_string(), canonical);
    }

    #[test]
    fn splits_on_top_level_commas_only() {
        let members = split_selector_list(".card, :is(.a, .b), [data-x=\"1,2\"]");
        assert_eq!(
            members,
            vec![
                ".card".to_string(),
                ":is(.a, .b)".to_string(),
                "[data-x=\"1,2\"]".to_string(),
            ]
        );
    }

    #[test]
    fn list_parses_each_member() {
        let chains = parse_selector_list(".card, .panel > .title").expect("parse");
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].to_string(), ".card");
        assert_eq!(chains[1].to_string(), ".panel > .title");
    }

    #[test]
    fn nth_child_args_stay_raw() {
        let chain = parse_one("li:nth-child(2n + 1)");
        let SimpleSelector::Pseudo(pseudo) = &chain.compounds[0].parts[1] else {
            panic!("expected pseudo");
        };
        assert_eq!(pseudo.args, PseudoArgs::Raw("2n + 1".into()));
    }

    #[test]
    fn functional_pseudo_args_are_parsed_chains() {
        let chain = parse_one(":is(.card > .title)");
        let SimpleSelector::Pseudo(pseudo) = &chain.compounds[0].parts[0] else {
            panic!("expected pseudo");
        };
        let PseudoArgs::Selectors(inner) = &pseudo.args else {
            panic!("expected selector args");
        };
        assert_eq!(inner[0].to_string(), ".card > .title");
    }

    #[test]
    fn bare_global_parses_without_args() {
        let chain = parse_one(".card :global .legacy");
        assert_eq!(chain.compounds.len(), 3);
        let SimpleSelector::Pseudo(pseudo) = &chain.compounds[1].parts[0] else {
            panic!("expected pseudo");
        };
        assert!(pseudo.is_bare_global());
    }

    #[test]
    fn attribute_variants() {
        let chain = parse_one("[data-state=\"open\"][aria-hidden].card");
        assert_eq!(chain.compounds[0].parts.len(), 3);
        let SimpleSelector::Attribute(attr) = &chain.compounds[0].parts[0] else {
            panic!("expected attribute");
        };
        assert_eq!(attr.name, "data-state");
        assert_eq!(attr.matcher.as_ref().map(|m| m.value.as_str()), Some("open"));

        let unquoted = parse_one("[data-variant=primary i]");
        let SimpleSelector::Attribute(attr) = &unquoted.compounds[0].parts[0] else {
            panic!("expected attribute");
        };
        let matcher = attr.matcher.as_ref().expect("matcher");
        assert_eq!(matcher.value, "primary");
        assert_eq!(matcher.case_flag, Some('i'));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case(".card >")]
    #[case(".")]
    #[case(":is(.card")]
    #[case("[data-x")]
    #[case(".card )")]
    #[case("#{$sel}")]
    fn malformed_selectors_error(#[case] input: &str) {
        assert!(parse_selector_list(input).is_err(), "for '{input}'");
    }

    #[test]
    fn parse_is_deterministic() {
        let a = parse_selector_list(":is(.card, .panel) > .title").expect("parse");
        let b = parse_selector_list(":is(.card, .panel) > .title").expect("parse");
        assert_eq!(a, b);
    }
}
