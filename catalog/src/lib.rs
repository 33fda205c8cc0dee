#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Catalog loader that runs every level through scan, parse and validation.
//!
//! Each level record is an independent unit of work. A failure in one record
//! is collected next to the boards loaded from the rest of the catalog instead
//! of aborting the load.

use klotski_core::{LevelRecord, ParseError, ScanError, ValidationIssue};
use klotski_system_grid_parser::parse_record;
use klotski_system_scanner::scan;
use klotski_system_validator::{ValidatedBoard, Validator};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Level catalog shipped with the game.
pub const BUNDLED_CATALOG: &str = include_str!("../data/boards.kts");

/// Reason a single catalog record did not produce a validated board.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RecordProblem {
    /// The record's boundaries were malformed.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// The record's rows could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The board had at least one fatal validation issue.
    #[error("rejected with {} issue(s)", .0.len())]
    Rejected(Vec<ValidationIssue>),
}

/// Failure report for one catalog record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Name of the level, when the failure can be tied to one.
    pub name: Option<String>,
    /// Catalog line the failure points at.
    pub line: usize,
    /// What went wrong.
    pub problem: RecordProblem,
}

impl RecordFailure {
    fn from_scan(error: ScanError) -> Self {
        let name = match &error {
            ScanError::EmptyLevel { name, .. } | ScanError::MisplacedDescription { name, .. } => {
                Some(name.clone())
            }
            ScanError::OrphanRow { .. } | ScanError::UnmatchedDelimiter { .. } => None,
        };
        Self {
            name,
            line: error.line(),
            problem: RecordProblem::Scan(error),
        }
    }
}

/// Outcome of loading a whole catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogLoad {
    boards: Vec<ValidatedBoard>,
    failures: Vec<RecordFailure>,
}

impl CatalogLoad {
    /// Boards that passed validation, in catalog order.
    #[must_use]
    pub fn boards(&self) -> &[ValidatedBoard] {
        &self.boards
    }

    /// Records that failed, in catalog order.
    #[must_use]
    pub fn failures(&self) -> &[RecordFailure] {
        &self.failures
    }

    /// Reports whether every record produced a board.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn collect(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        let mut load = Self::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Accepted(board) => load.boards.push(board),
                Outcome::Failed(failure) => load.failures.push(failure),
            }
        }

        info!(
            "loaded {} level(s), {} record(s) failed",
            load.boards.len(),
            load.failures.len()
        );
        load
    }
}

/// Entry point for loading level catalogs.
#[derive(Clone, Copy, Debug, Default)]
pub struct Catalog;

impl Catalog {
    /// Loads every level of the catalog text on the calling thread.
    #[must_use]
    pub fn load(text: &str) -> CatalogLoad {
        let validator = Validator::new();
        CatalogLoad::collect(scan(text).map(|item| process(item, validator)))
    }

    /// Loads every level of the catalog text, parsing and validating records
    /// on the rayon thread pool.
    ///
    /// The result is identical to [`Catalog::load`]: boards and failures keep
    /// catalog order.
    #[must_use]
    pub fn load_parallel(text: &str) -> CatalogLoad {
        let validator = Validator::new();
        let items: Vec<_> = scan(text).collect();
        let outcomes: Vec<_> = items
            .into_par_iter()
            .map(|item| process(item, validator))
            .collect();
        CatalogLoad::collect(outcomes)
    }

    /// Loads the catalog shipped with the game.
    #[must_use]
    pub fn bundled() -> CatalogLoad {
        Self::load(BUNDLED_CATALOG)
    }
}

enum Outcome {
    Accepted(ValidatedBoard),
    Failed(RecordFailure),
}

fn process(item: Result<LevelRecord, ScanError>, validator: Validator) -> Outcome {
    let record = match item {
        Ok(record) => record,
        Err(error) => {
            warn!("skipping catalog record: {error}");
            return Outcome::Failed(RecordFailure::from_scan(error));
        }
    };

    let failure = |problem: RecordProblem| RecordFailure {
        name: Some(record.name.clone()),
        line: record.line,
        problem,
    };

    let board = match parse_record(&record) {
        Ok(board) => board,
        Err(error) => {
            warn!(
                "level '{}' (line {}) failed to parse: {error}",
                record.name, record.line
            );
            return Outcome::Failed(failure(error.into()));
        }
    };

    match validator.validate(board) {
        Ok(validated) => {
            for issue in validated.issues() {
                warn!("level '{}' (line {}): {issue}", record.name, record.line);
            }
            Outcome::Accepted(validated)
        }
        Err(issues) => {
            for issue in &issues {
                warn!("level '{}' (line {}): {issue}", record.name, record.line);
            }
            Outcome::Failed(failure(RecordProblem::Rejected(issues)))
        }
    }
}

/// Read-only lookups over a loaded catalog.
pub mod query {
    use super::{CatalogLoad, RecordFailure};
    use klotski_system_validator::ValidatedBoard;

    /// First accepted board carrying the provided name.
    #[must_use]
    pub fn board_named<'a>(load: &'a CatalogLoad, name: &str) -> Option<&'a ValidatedBoard> {
        load.boards().iter().find(|board| board.name() == name)
    }

    /// First failure tied to the provided level name.
    #[must_use]
    pub fn failure_named<'a>(load: &'a CatalogLoad, name: &str) -> Option<&'a RecordFailure> {
        load.failures()
            .iter()
            .find(|failure| failure.name.as_deref() == Some(name))
    }

    /// Number of warnings carried by accepted boards.
    #[must_use]
    pub fn warning_count(load: &CatalogLoad) -> usize {
        load.boards().iter().map(|board| board.issues().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_failures_keep_the_level_name_when_known() {
        let failure = RecordFailure::from_scan(ScanError::EmptyLevel {
            name: "Lonely".to_owned(),
            line: 4,
        });
        assert_eq!(failure.name.as_deref(), Some("Lonely"));
        assert_eq!(failure.line, 4);

        let orphan = RecordFailure::from_scan(ScanError::OrphanRow { line: 2 });
        assert_eq!(orphan.name, None);
        assert_eq!(orphan.line, 2);
    }

    #[test]
    fn rejected_problem_counts_issues() {
        let problem = RecordProblem::Rejected(vec![ValidationIssue::new(
            klotski_core::IssueKind::MissingHeart,
        )]);
        assert_eq!(problem.to_string(), "rejected with 1 issue(s)");
    }
}
