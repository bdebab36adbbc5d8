//! # bem-core
//!
//! Core building blocks for bemcheck: the structural-kind model, naming and
//! selector policies, compiled pattern sets, static property classification
//! tables, small value parsers, and the bounded LRU cache every expensive
//! step memoizes through.
//!
//! Everything in this crate is pure and deterministic: policies are immutable
//! once compiled, classification is a total function, and the cache is only a
//! performance device — removing it must not change any observable result.

pub mod cache;
pub mod classify;
pub mod error;
pub mod kind;
pub mod patterns;
pub mod policy;
pub mod props;
pub mod values;

pub use cache::LruCache;
pub use classify::classify;
pub use error::PatternError;
pub use kind::{CaseStyle, ChainRole, Kind, Section};
pub use patterns::{PatternSet, ValueMatcher, example_name};
pub use policy::{ConfigIssue, NamingPolicy, ReprMode, SelectorPolicy, ValueRule};
pub use props::{PropertyClass, classify_property, is_margin_property, is_offset_property};
pub use values::{
    MarginSide, PositionValue, Side, is_zero_auto_or_initial, margin_side_token, parse_position,
};
