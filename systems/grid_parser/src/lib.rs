#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid parser that turns a scanned level record into a typed board.
//!
//! Every character of a raw row is classified through the fixed symbol table
//! in `klotski-core`. Rows shorter than the longest row are padded with empty
//! floor, since several shipped levels have ragged right edges. Characters
//! outside the table are rejected rather than ignored.

use std::fmt::Write as _;

use klotski_core::{
    Board, Cell, Coordinate, LevelRecord, ParseError, Symbol, DESCRIPTION_DELIMITER, ROW_DELIMITER,
};
use log::debug;

/// Parses one level record into a board.
///
/// `width` becomes the longest raw row and `height` the number of rows.
pub fn parse_record(record: &LevelRecord) -> Result<Board, ParseError> {
    let width = record
        .raw_lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let mut rows = Vec::with_capacity(record.raw_lines.len());
    for (row, line) in (0_u32..).zip(&record.raw_lines) {
        rows.push(parse_row(row, line, width)?);
    }

    let board = Board::new(&record.name, &record.description, rows);
    debug!(
        "parsed level '{}' into a {}x{} board with {} piece(s)",
        board.name(),
        board.width(),
        board.height(),
        board.piece_count()
    );
    Ok(board)
}

fn parse_row(row: u32, line: &str, width: usize) -> Result<Vec<Cell>, ParseError> {
    let mut cells = Vec::with_capacity(width);
    for (column, character) in (0_u32..).zip(line.chars()) {
        let symbol = Symbol::classify(character).ok_or(ParseError::UnknownSymbol {
            symbol: character,
            coordinate: Coordinate::new(row, column),
        })?;
        cells.push(Cell::from_symbol(symbol));
    }
    cells.resize(width, Cell::Empty);
    Ok(cells)
}

/// Writes a board back out in catalog form.
///
/// The output holds the `<Name>` header, the description line when the
/// description is non-empty, and one `@`-delimited row per grid row padded
/// with spaces to the board width. Scanning and parsing the output yields a
/// board equal to a padded input.
#[must_use]
pub fn serialize_board(board: &Board) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<{}>", board.name());
    if !board.description().is_empty() {
        let _ = writeln!(
            out,
            "{DESCRIPTION_DELIMITER}{}{DESCRIPTION_DELIMITER}",
            board.description()
        );
    }

    for row in 0..board.height() {
        out.push(ROW_DELIMITER);
        for column in 0..board.width() {
            let cell = board.cell_at(Coordinate::new(row, column));
            out.push(cell.map_or(' ', Cell::as_char));
        }
        out.push(ROW_DELIMITER);
        out.push('\n');
    }

    out
}
