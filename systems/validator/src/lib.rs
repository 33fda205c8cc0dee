#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Board validator that rejects structurally inconsistent levels.
//!
//! Every check runs on every board; the validator never stops at the first
//! failure, so callers always see the complete issue list. Boards without
//! fatal issues are wrapped into a read-only [`ValidatedBoard`] that keeps the
//! remaining warnings alongside the board.

mod connectivity;
mod reachability;

use std::collections::BTreeSet;

use klotski_core::{
    Board, Cell, Coordinate, IssueKind, Piece, PieceId, Severity, ValidationIssue,
};
use log::debug;

/// Stateless validator applying every structural check to a board.
#[derive(Clone, Copy, Debug, Default)]
pub struct Validator;

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs every check and returns the findings in check order.
    ///
    /// The order is: row lengths, piece connectivity (heart first, then by
    /// symbol), heart presence, destination presence, static reachability.
    /// Running the same board twice yields the same list.
    #[must_use]
    pub fn inspect(&self, board: &Board) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        check_rectangular(board, &mut issues);
        check_connected(board, &mut issues);

        let heart = board.heart_piece();
        if heart.is_none() {
            issues.push(ValidationIssue::new(IssueKind::MissingHeart));
        }

        let destinations = board.destinations();
        if destinations.is_empty() {
            issues.push(ValidationIssue::new(IssueKind::NoDestination));
        }

        if let Some(heart) = heart {
            if !destinations.is_empty() && !reachability::destination_reachable(board, heart) {
                issues.push(ValidationIssue::at(
                    IssueKind::DestinationUnreachableStatic,
                    heart.cells().iter().copied().collect(),
                ));
            }
        }

        issues
    }

    /// Validates a board, refining it into a [`ValidatedBoard`].
    ///
    /// Returns every issue found, warnings included, when at least one of
    /// them is fatal.
    pub fn validate(&self, board: Board) -> Result<ValidatedBoard, Vec<ValidationIssue>> {
        let issues = self.inspect(&board);
        debug!(
            "validated level '{}': {} issue(s)",
            board.name(),
            issues.len()
        );

        if issues.iter().any(ValidationIssue::is_fatal) {
            return Err(issues);
        }

        let Some(heart) = board.heart_piece().cloned() else {
            return Err(vec![ValidationIssue::new(IssueKind::MissingHeart)]);
        };
        let destinations = board.destinations();

        Ok(ValidatedBoard {
            board,
            heart,
            destinations,
            issues,
        })
    }
}

fn check_rectangular(board: &Board, issues: &mut Vec<ValidationIssue>) {
    for (row, cells) in (0_u32..).zip(board.rows()) {
        let length = u32::try_from(cells.len()).unwrap_or(u32::MAX);
        if length != board.width() {
            issues.push(ValidationIssue::new(IssueKind::RaggedRow {
                row,
                length,
                width: board.width(),
            }));
        }
    }
}

fn check_connected(board: &Board, issues: &mut Vec<ValidationIssue>) {
    for piece in board.pieces() {
        let components = connectivity::components(piece.cells());
        if components.len() <= 1 {
            continue;
        }

        let strays = components
            .into_iter()
            .skip(1)
            .flatten()
            .collect::<BTreeSet<_>>();
        issues.push(ValidationIssue::at(
            IssueKind::DisconnectedPiece(piece.id()),
            strays.into_iter().collect(),
        ));
    }
}

/// Board that passed validation without fatal issues.
///
/// This is the read-only surface handed to game engines and solvers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedBoard {
    board: Board,
    heart: Piece,
    destinations: BTreeSet<Coordinate>,
    issues: Vec<ValidationIssue>,
}

impl ValidatedBoard {
    /// Level name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.board.name()
    }

    /// Level description, empty when the catalog omits it.
    #[must_use]
    pub fn description(&self) -> &str {
        self.board.description()
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.board.width()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.board.height()
    }

    /// Cell at the provided coordinate, `None` outside the board.
    #[must_use]
    pub fn cell_at(&self, coordinate: Coordinate) -> Option<Cell> {
        self.board.cell_at(coordinate)
    }

    /// Piece registered under the provided identifier.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.board.piece(id)
    }

    /// Piece covering the provided cell.
    #[must_use]
    pub fn piece_at(&self, coordinate: Coordinate) -> Option<&Piece> {
        self.board.piece_at(coordinate)
    }

    /// All pieces, heart first and then by symbol.
    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.board.pieces()
    }

    /// The heart piece; always present on a validated board.
    #[must_use]
    pub fn heart_piece(&self) -> &Piece {
        &self.heart
    }

    /// Coordinates of all destination cells; never empty.
    #[must_use]
    pub fn destinations(&self) -> &BTreeSet<Coordinate> {
        &self.destinations
    }

    /// Coordinates of all wall cells.
    #[must_use]
    pub fn walls(&self) -> BTreeSet<Coordinate> {
        self.board.walls()
    }

    /// Coordinates of all one-way wall cells.
    #[must_use]
    pub fn one_way_walls(&self) -> BTreeSet<Coordinate> {
        self.board.one_way_walls()
    }

    /// Grid rows in top-to-bottom order, for renderers.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.board.rows().iter().map(Vec::as_slice)
    }

    /// Every issue reported during validation; only warnings remain.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Reports whether validation produced any warning.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity() == Severity::Warning)
    }

    /// Underlying board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }
}
