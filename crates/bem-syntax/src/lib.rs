//! # bem-syntax
//!
//! Stylesheet syntax layer for bemcheck: the arena AST with stable integer
//! node ids, the selector sum types, and the deterministic text parsers for
//! selectors and SCSS-subset stylesheets.
//!
//! The engine consumes only [`ast`] and [`selector`]; the text parsers are
//! the default implementations of the collaborators a host lint framework
//! would otherwise supply.

pub mod ast;
pub mod error;
pub mod parser;
pub mod selector;
pub mod sheet;

pub use ast::{NodeId, NodeKind, Stylesheet};
pub use error::ParseError;
pub use parser::{parse_selector_list, split_selector_list};
pub use selector::{
    AttrMatcher, AttrOp, Attribute, Combinator, Compound, Pseudo, PseudoArgs, SelectorChain,
    SimpleSelector,
};
pub use sheet::parse_sheet;
