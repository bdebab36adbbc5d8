//! Per-file diagnostics.
//!
//! Violations are the engine's product and never abort a run. Duplicate
//! identical messages on the same line are suppressed, and the two
//! degraded-coverage conditions (selector parse failure, resolution
//! explosion) surface as at most one summary entry each per file.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use bem_core::ConfigIssue;

/// Which driving check produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    Naming,
    Placement,
}

impl CheckId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Naming => "naming",
            Self::Placement => "placement",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub check: CheckId,
    /// 1-based source line of the offending node.
    pub line: u32,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.line, self.check, self.message)
    }
}

/// Summary of a nested-selector resolution that hit the explosion guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResolutionSkip {
    /// The configured combined-selector ceiling.
    pub ceiling: usize,
    /// One representative selector from the level that overflowed.
    pub selector: String,
}

/// Everything the engine reports for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileReport {
    pub violations: Vec<Violation>,
    /// Configuration repairs, identical for every file of a run.
    pub config_issues: Vec<ConfigIssue>,
    /// One representative selector that failed to parse, if any did.
    pub parse_degraded: Option<String>,
    /// Set when at least one rule's resolution hit the explosion guard.
    pub resolution_skipped: Option<ResolutionSkip>,
}

impl FileReport {
    /// No violations and full coverage.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
            && self.parse_degraded.is_none()
            && self.resolution_skipped.is_none()
    }
}

/// Accumulates violations with duplicate suppression.
#[derive(Debug, Default)]
pub(crate) struct ReportBuilder {
    report: FileReport,
    seen: HashSet<(CheckId, u32, String)>,
}

impl ReportBuilder {
    pub(crate) fn new(config_issues: Vec<ConfigIssue>) -> Self {
        Self {
            report: FileReport {
                config_issues,
                ..FileReport::default()
            },
            seen: HashSet::new(),
        }
    }

    pub(crate) fn push(&mut self, check: CheckId, line: u32, message: String) {
        if self.seen.insert((check, line, message.clone())) {
            self.report.violations.push(Violation {
                check,
                line,
                message,
            });
        }
    }

    pub(crate) fn finish(
        mut self,
        parse_degraded: Option<String>,
        resolution_skipped: Option<ResolutionSkip>,
    ) -> FileReport {
        self.report.parse_degraded = parse_degraded;
        self.report.resolution_skipped = resolution_skipped;
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_messages_on_one_line_are_suppressed() {
        let mut builder = ReportBuilder::new(Vec::new());
        builder.push(CheckId::Naming, 3, "bad class".into());
        builder.push(CheckId::Naming, 3, "bad class".into());
        builder.push(CheckId::Naming, 4, "bad class".into());
        builder.push(CheckId::Placement, 3, "bad class".into());
        let report = builder.finish(None, None);
        assert_eq!(report.violations.len(), 3);
    }

    #[test]
    fn clean_report() {
        let report = ReportBuilder::new(Vec::new()).finish(None, None);
        assert!(report.is_clean());

        let degraded = ReportBuilder::new(Vec::new()).finish(Some(".bad{".into()), None);
        assert!(!degraded.is_clean());
    }

    #[test]
    fn report_serializes() {
        let mut builder = ReportBuilder::new(Vec::new());
        builder.push(CheckId::Placement, 7, "missing offset".into());
        let report = builder.finish(
            None,
            Some(ResolutionSkip {
                ceiling: 1000,
                selector: ".a".into(),
            }),
        );
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["violations"][0]["check"], "placement");
        assert_eq!(json["resolution_skipped"]["ceiling"], 1000);
    }
}
