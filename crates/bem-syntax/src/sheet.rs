//! Compact SCSS-subset stylesheet text parser.
//!
//! Handles nested rules, at-rules (block and statement forms), declarations,
//! and both `//` and `/* */` comments, producing the arena AST the engine
//! consumes. This is the default implementation of the stylesheet-AST
//! collaborator; hosts with their own CSS front end can build a
//! [`Stylesheet`] directly and skip this module.

use crate::ast::{NodeId, NodeKind, Stylesheet};
use crate::error::ParseError;

/// Parse SCSS-subset source into a stylesheet tree.
///
/// # Errors
/// Returns a [`ParseError`] on structurally broken input (unbalanced braces,
/// unterminated comments, or statements that are neither rules nor
/// declarations). A failed file is reported as parse-degraded and skipped;
/// the caller never crashes on it.
pub fn parse_sheet(source: &str) -> Result<Stylesheet, ParseError> {
    SheetParser::new(source).run()
}

struct SheetParser {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    sheet: Stylesheet,
    /// Open containers; the last entry is the current parent. Parallel line
    /// numbers record where each block opened, for unclosed-block errors.
    stack: Vec<(NodeId, u32)>,
}

impl SheetParser {
    fn new(source: &str) -> Self {
        let sheet = Stylesheet::new();
        let root = sheet.root();
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            sheet,
            stack: vec![(root, 1)],
        }
    }

    fn run(mut self) -> Result<Stylesheet, ParseError> {
        loop {
            self.skip_ws();
            match self.peek() {
                None => break,
                Some('}') => {
                    self.bump();
                    if self.stack.len() == 1 {
                        return Err(ParseError::UnexpectedClose { line: self.line });
                    }
                    self.stack.pop();
                }
                Some('/') if self.peek_at(1) == Some('/') => self.line_comment(),
                Some('/') if self.peek_at(1) == Some('*') => self.block_comment()?,
                Some('@') => self.at_rule()?,
                Some(_) => self.statement()?,
            }
        }
        if self.stack.len() > 1 {
            let (_, line) = self.stack[self.stack.len() - 1];
            return Err(ParseError::UnclosedBlock { line });
        }
        Ok(self.sheet)
    }

    fn parent(&self) -> NodeId {
        self.stack[self.stack.len() - 1].0
    }

    fn line_comment(&mut self) {
        let line = self.line;
        self.bump();
        self.bump();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        self.push_comment(&text, line);
    }

    fn block_comment(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.bump();
        self.bump();
        let mut text = String::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::UnclosedComment { line }),
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
        self.push_comment(&text, line);
        Ok(())
    }

    fn push_comment(&mut self, text: &str, line: u32) {
        let parent = self.parent();
        self.sheet.push(
            parent,
            NodeKind::Comment {
                text: text.trim().to_string(),
            },
            line,
        );
    }

    fn at_rule(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        self.bump(); // '@'
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if !(c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                break;
            }
            name.push(c);
            self.bump();
        }

        let (params, opened_block) = self.scan_prelude()?;
        let parent = self.parent();
        let node = self.sheet.push(
            parent,
            NodeKind::AtRule {
                name,
                params: params.trim().to_string(),
            },
            line,
        );
        if opened_block {
            self.stack.push((node, self.line));
        }
        Ok(())
    }

    fn statement(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        let (text, opened_block) = self.scan_prelude()?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let parent = self.parent();
        if opened_block {
            let node = self.sheet.push(
                parent,
                NodeKind::Rule {
                    selector: text.to_string(),
                },
                line,
            );
            self.stack.push((node, self.line));
            return Ok(());
        }

        // SCSS properties can nest (`font: { size: 12px; }`); this subset
        // only takes the flat `property: value` form.
        let Some(colon) = split_declaration(text) else {
            return Err(ParseError::InvalidDeclaration {
                text: text.to_string(),
                line,
            });
        };
        let (property, value) = text.split_at(colon);
        self.sheet.push(
            parent,
            NodeKind::Declaration {
                property: property.trim().to_string(),
                value: value[1..].trim().to_string(),
            },
            line,
        );
        Ok(())
    }

    /// Scan forward to the statement terminator: `{` (returns `true`), or
    /// `;` / `}` / end of input (returns `false`). `}` is left unconsumed.
    /// Comments inside the prelude are skipped; quotes, parens, and brackets
    /// shield delimiters.
    fn scan_prelude(&mut self) -> Result<(String, bool), ParseError> {
        let mut out = String::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        loop {
            let Some(c) = self.peek() else {
                return Ok((out, false));
            };
            if let Some(q) = quote {
                out.push(c);
                self.bump();
                if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => {
                    quote = Some(c);
                    out.push(c);
                    self.bump();
                }
                '(' | '[' => {
                    depth += 1;
                    out.push(c);
                    self.bump();
                }
                ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    out.push(c);
                    self.bump();
                }
                // SCSS interpolation: carry `#{...}` through verbatim so its
                // braces do not terminate the statement. The selector parser
                // downgrades it later; the sheet still parses.
                '#' if self.peek_at(1) == Some('{') => {
                    let line = self.line;
                    out.push('#');
                    out.push('{');
                    self.bump();
                    self.bump();
                    let mut braces = 1usize;
                    loop {
                        match self.peek() {
                            None => return Err(ParseError::UnclosedBlock { line }),
                            Some(c) => {
                                self.bump();
                                if c == '{' {
                                    braces += 1;
                                } else if c == '}' {
                                    braces -= 1;
                                }
                                out.push(c);
                                if braces == 0 {
                                    break;
                                }
                            }
                        }
                    }
                }
                '/' if depth == 0 && self.peek_at(1) == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                '/' if self.peek_at(1) == Some('*') => {
                    let line = self.line;
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            None => return Err(ParseError::UnclosedComment { line }),
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => self.bump(),
                        }
                    }
                    out.push(' ');
                }
                '{' if depth == 0 => {
                    self.bump();
                    return Ok((out, true));
                }
                ';' if depth == 0 => {
                    self.bump();
                    return Ok((out, false));
                }
                '}' if depth == 0 => {
                    return Ok((out, false));
                }
                _ => {
                    out.push(c);
                    self.bump();
                }
            }
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) {
        if self.peek() == Some('\n') {
            self.line += 1;
        }
        self.pos += 1;
    }
}

/// Index of the property/value colon, skipping colons inside parens or
/// quotes. Selectors never reach here (a `{` routes them to the rule arm).
fn split_declaration(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}
