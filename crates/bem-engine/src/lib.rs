//! # bem-engine
//!
//! The selector classification, resolution, and cross-rule correlation
//! engine behind bemcheck. Given a parsed stylesheet, it strips
//! CSS-modules-style foreign segments, resolves SCSS nesting under an
//! explosion guard, classifies every class into its structural role, builds
//! the family and wrapper-context keys that correlate declarations across
//! rules, scans comment-delimited sections, and runs the naming and
//! placement checks.
//!
//! Construct an [`Engine`] once per run and call [`Engine::check_sheet`] per
//! file. Everything mutable lives in a per-file session owned by that call;
//! the engine itself is immutable and shareable across files.

pub mod analysis;
pub mod family;
mod naming;
mod placement;
pub mod report;
mod resolve;
pub mod sections;
mod session;
pub mod strip;

pub use analysis::{ChainAnalysis, analyze_chain, attributes_in_chain, classes_in_chain};
pub use family::{family_key, wrapper_context_key};
pub use report::{CheckId, FileReport, ResolutionSkip, Violation};
pub use sections::{SectionScan, scan_sections};
pub use session::{DEFAULT_LIMIT, Engine, EngineConfig};
pub use strip::{Stripped, list_is_foreign_only, strip_chain, strip_list};
