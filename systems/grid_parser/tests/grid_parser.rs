use std::collections::BTreeSet;

use klotski_core::{Cell, Coordinate, LevelRecord, ParseError, PieceId};
use klotski_system_grid_parser::{parse_record, serialize_board};
use klotski_system_scanner::scan;

const EASY: &str = "\
<Easy>
@  ######  @
@  #a**b#  @
@  #m**n#  @
@  #cdef#  @
@  #ghij#  @
@  #k  l#  @
@  ##--##  @
@        ..@
";

fn single_record(text: &str) -> LevelRecord {
    let mut records = scan(text)
        .collect::<Result<Vec<_>, _>>()
        .expect("fixture should scan");
    assert_eq!(records.len(), 1, "fixture should hold a single level");
    records.remove(0)
}

fn cells(coordinates: &[(u32, u32)]) -> BTreeSet<Coordinate> {
    coordinates
        .iter()
        .map(|&(row, column)| Coordinate::new(row, column))
        .collect()
}

#[test]
fn easy_level_has_expected_shape_and_contents() {
    let board = parse_record(&single_record(EASY)).expect("Easy parses");

    assert_eq!(board.name(), "Easy");
    assert_eq!(board.width(), 10, "width is the longest row");
    assert_eq!(board.height(), 8, "height is the row count");

    let a = board.piece(PieceId::Symbol('a')).expect("piece a");
    assert_eq!(a.cells(), &cells(&[(1, 3)]));
    assert!(!a.is_heart());

    let heart = board.heart_piece().expect("heart piece");
    assert_eq!(heart.cells(), &cells(&[(1, 4), (1, 5), (2, 4), (2, 5)]));

    assert_eq!(board.one_way_walls(), cells(&[(6, 4), (6, 5)]));
    assert_eq!(board.destinations(), cells(&[(7, 8), (7, 9)]));
    assert_eq!(board.piece_count(), 15, "heart plus fourteen lettered pieces");
}

#[test]
fn ragged_rows_are_padded_with_empty_floor() {
    let record = single_record("<Ragged>\n@#*#@\n@.@\n");
    let board = parse_record(&record).expect("ragged rows are accepted");

    assert_eq!(board.width(), 3);
    assert!(board.rows().iter().all(|row| row.len() == 3));
    assert_eq!(board.cell_at(Coordinate::new(1, 1)), Some(Cell::Empty));
    assert_eq!(board.cell_at(Coordinate::new(1, 2)), Some(Cell::Empty));
}

#[test]
fn unknown_symbol_is_rejected_with_its_position() {
    let record = single_record("<Odd>\n@ ** @\n@ ?. @\n");

    assert_eq!(
        parse_record(&record),
        Err(ParseError::UnknownSymbol {
            symbol: '?',
            coordinate: Coordinate::new(1, 1),
        })
    );
}

#[test]
fn piece_symbols_are_case_sensitive() {
    let board = parse_record(&single_record("<Case>\n@aA*.@\n")).expect("parses");

    let lower = board.piece(PieceId::Symbol('a')).expect("lower-case piece");
    let upper = board.piece(PieceId::Symbol('A')).expect("upper-case piece");
    assert_ne!(lower.cells(), upper.cells());
}

#[test]
fn description_is_carried_onto_the_board() {
    let board = parse_record(&single_record("<Told>\n@@a short tale@@\n@*.@\n")).expect("parses");
    assert_eq!(board.description(), "a short tale");
}

#[test]
fn serialized_board_pads_rows_and_keeps_metadata() {
    let board = parse_record(&single_record("<Pad>\n@@note@@\n@#*#@\n@.@\n")).expect("parses");

    assert_eq!(serialize_board(&board), "<Pad>\n@@note@@\n@#*#@\n@.  @\n");
}

#[test]
fn easy_level_survives_a_round_trip() {
    let board = parse_record(&single_record(EASY)).expect("Easy parses");
    let reparsed = parse_record(&single_record(&serialize_board(&board))).expect("reparses");

    assert_eq!(board, reparsed);
}
