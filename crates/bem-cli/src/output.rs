//! Report rendering.

use std::fmt::Write as _;
use std::path::PathBuf;

use bem_engine::FileReport;
use serde::Serialize;

/// One linted file and its report.
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: FileReport,
}

/// Plain-text rendering: one line per violation, then the per-file coverage
/// summaries, then a totals line.
#[must_use]
pub fn render_text(outcomes: &[FileOutcome]) -> String {
    let mut out = String::new();
    let mut total = 0usize;

    for outcome in outcomes {
        let path = outcome.path.display();
        for violation in &outcome.report.violations {
            let _ = writeln!(
                out,
                "{path}:{}: [{}] {}",
                violation.line, violation.check, violation.message
            );
            total += 1;
        }
        for issue in &outcome.report.config_issues {
            let _ = writeln!(out, "{path}: config: {issue}");
        }
        if let Some(example) = &outcome.report.parse_degraded {
            let _ = writeln!(
                out,
                "{path}: warning: some selectors could not be parsed, e.g. '{example}'; coverage is reduced"
            );
        }
        if let Some(skip) = &outcome.report.resolution_skipped {
            let _ = writeln!(
                out,
                "{path}: warning: nested selector resolution exceeded {} combined selectors at '{}'; affected rules were skipped",
                skip.ceiling, skip.selector
            );
        }
    }

    if total == 0 {
        let _ = writeln!(out, "{} file(s) checked, no violations", outcomes.len());
    } else {
        let _ = writeln!(
            out,
            "{} violation(s) in {} file(s)",
            total,
            outcomes.len()
        );
    }
    out
}

/// JSON rendering of every outcome.
pub fn render_json(outcomes: &[FileOutcome]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(outcomes)?)
}
