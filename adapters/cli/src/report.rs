use std::fmt::Write as _;

use anyhow::{Context, Result};
use klotski_catalog::{CatalogLoad, RecordFailure, RecordProblem};
use klotski_core::ValidationIssue;
use klotski_system_validator::ValidatedBoard;
use serde::Serialize;

/// Lint outcome for a whole catalog, ready to be rendered.
#[derive(Debug, Serialize)]
pub(crate) struct Report<'a> {
    accepted: Vec<BoardSummary<'a>>,
    failed: &'a [RecordFailure],
}

/// Accepted board as it appears in the report.
#[derive(Debug, Serialize)]
struct BoardSummary<'a> {
    name: &'a str,
    width: u32,
    height: u32,
    pieces: usize,
    warnings: &'a [ValidationIssue],
}

impl<'a> BoardSummary<'a> {
    fn new(board: &'a ValidatedBoard) -> Self {
        Self {
            name: board.name(),
            width: board.width(),
            height: board.height(),
            pieces: board.all_pieces().count(),
            warnings: board.issues(),
        }
    }
}

impl<'a> Report<'a> {
    /// Summarises the provided catalog load.
    pub(crate) fn new(load: &'a CatalogLoad) -> Self {
        Self {
            accepted: load.boards().iter().map(BoardSummary::new).collect(),
            failed: load.failures(),
        }
    }

    /// Reports whether any record failed.
    pub(crate) fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Reports whether any accepted board carries a warning.
    pub(crate) fn has_warnings(&self) -> bool {
        self.accepted
            .iter()
            .any(|summary| !summary.warnings.is_empty())
    }

    /// Renders one line per record followed by a totals line.
    pub(crate) fn to_text(&self) -> String {
        let mut out = String::new();
        for summary in &self.accepted {
            let _ = writeln!(
                out,
                "ok    {} ({}x{}, {} pieces, {} warning(s))",
                summary.name,
                summary.width,
                summary.height,
                summary.pieces,
                summary.warnings.len()
            );
            for issue in summary.warnings {
                let _ = writeln!(out, "        {issue}");
            }
        }

        for failure in self.failed {
            let name = failure.name.as_deref().unwrap_or("<unnamed>");
            let _ = writeln!(
                out,
                "fail  {name} (line {}): {}",
                failure.line, failure.problem
            );
            if let RecordProblem::Rejected(issues) = &failure.problem {
                for issue in issues {
                    let _ = writeln!(out, "        {issue}");
                }
            }
        }

        let _ = writeln!(
            out,
            "{} accepted, {} failed",
            self.accepted.len(),
            self.failed.len()
        );
        out
    }

    /// Renders the report as a pretty-printed JSON document.
    pub(crate) fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialise lint report")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use klotski_catalog::Catalog;

    const CATALOG: &str = "\
<Open door>
@#####@
@#** #@
@#** #@
@#--##@
@ ..  @

<Split>
@a**a@
@ ..  @
";

    #[test]
    fn text_report_lists_every_record() {
        let load = Catalog::load(CATALOG);
        let report = Report::new(&load);
        let text = report.to_text();

        assert!(text.contains("ok    Open door (5x5, 1 pieces, 0 warning(s))"));
        assert!(text.contains("fail  Split (line 8): rejected with 1 issue(s)"));
        assert!(text.contains("fatal: piece 'a' is split into disjoint shapes at (0, 3)"));
        assert!(text.ends_with("1 accepted, 1 failed\n"));
        assert!(report.has_failures());
        assert!(!report.has_warnings());
    }

    #[test]
    fn json_report_carries_the_same_content() {
        let load = Catalog::load(CATALOG);
        let json = Report::new(&load).to_json().expect("report serialises");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["accepted"][0]["name"], "Open door");
        assert_eq!(value["accepted"][0]["pieces"], 1);
        assert_eq!(value["failed"][0]["name"], "Split");
        assert_eq!(value["failed"][0]["line"], 8);
    }
}
