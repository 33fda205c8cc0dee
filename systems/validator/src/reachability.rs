//! Static reachability of the destination for the heart piece.
//!
//! The search treats the heart as a rigid stamp and every other piece as a
//! fixed obstacle. It is a breadth-first search over the upper-left anchor of
//! the heart's bounding box, so each state is one placement of the whole
//! footprint. A placement wins when every destination cell of the board lies
//! under the heart.

use std::collections::{BTreeSet, VecDeque};

use klotski_core::{Board, Cell, Coordinate, Piece, PieceId};

/// Reports whether some placement of `heart` reachable by unit translations
/// covers every destination cell of the board.
pub(crate) fn destination_reachable(board: &Board, heart: &Piece) -> bool {
    let origin = heart.origin();
    let footprint: Vec<(u32, u32)> = heart
        .cells()
        .iter()
        .map(|cell| (cell.row() - origin.row(), cell.column() - origin.column()))
        .collect();

    let span_rows = footprint.iter().map(|&(row, _)| row).max().unwrap_or(0) + 1;
    let span_columns = footprint.iter().map(|&(_, column)| column).max().unwrap_or(0) + 1;
    let (Some(anchor_rows), Some(anchor_columns)) = (
        (board.height() + 1).checked_sub(span_rows),
        (board.width() + 1).checked_sub(span_columns),
    ) else {
        return false;
    };

    let Some(start) = index(anchor_columns, origin) else {
        return false;
    };
    let cell_count = usize::try_from(anchor_rows)
        .ok()
        .zip(usize::try_from(anchor_columns).ok())
        .and_then(|(rows, columns)| rows.checked_mul(columns))
        .unwrap_or(0);
    if start >= cell_count {
        return false;
    }

    let destinations = board.destinations();
    let mut visited = vec![false; cell_count];
    let mut queue = VecDeque::new();
    visited[start] = true;
    queue.push_back(origin);

    while let Some(anchor) = queue.pop_front() {
        if covers(&destinations, anchor, &footprint) {
            return true;
        }

        for neighbor in anchor.neighbors(anchor_columns, anchor_rows) {
            let Some(neighbor_index) = index(anchor_columns, neighbor) else {
                continue;
            };

            if visited[neighbor_index] || !fits(board, neighbor, &footprint) {
                continue;
            }

            visited[neighbor_index] = true;
            queue.push_back(neighbor);
        }
    }

    false
}

fn placed(anchor: Coordinate, footprint: &[(u32, u32)]) -> impl Iterator<Item = Coordinate> + '_ {
    footprint
        .iter()
        .map(move |&(row, column)| Coordinate::new(anchor.row() + row, anchor.column() + column))
}

fn fits(board: &Board, anchor: Coordinate, footprint: &[(u32, u32)]) -> bool {
    placed(anchor, footprint).all(|cell| {
        matches!(
            board.cell_at(cell),
            Some(
                Cell::Empty
                    | Cell::Destination
                    | Cell::OneWayWall
                    | Cell::PieceOccupied(PieceId::Heart)
            )
        )
    })
}

fn covers(
    destinations: &BTreeSet<Coordinate>,
    anchor: Coordinate,
    footprint: &[(u32, u32)],
) -> bool {
    let cells: BTreeSet<_> = placed(anchor, footprint).collect();
    destinations.is_subset(&cells)
}

fn index(width: u32, cell: Coordinate) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(usize::try_from(width).ok()?)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&str]) -> Board {
        let cells = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|character| {
                        klotski_core::Symbol::classify(character)
                            .map(Cell::from_symbol)
                            .expect("test rows use known symbols")
                    })
                    .collect()
            })
            .collect();
        Board::new("test", "", cells)
    }

    fn heart(board: &Board) -> &Piece {
        board.heart_piece().expect("test board has a heart")
    }

    fn reachable(rows: &[&str]) -> bool {
        let board = board(rows);
        destination_reachable(&board, heart(&board))
    }

    #[test]
    fn open_corridor_is_reachable() {
        assert!(reachable(&["**   ..", "**   .."]));
    }

    #[test]
    fn one_way_wall_lets_the_heart_through() {
        assert!(reachable(&["#**#", "#--#", "#..#"]));
    }

    #[test]
    fn ordinary_piece_blocks_the_heart() {
        assert!(!reachable(&["#**#", "#a-#", "#..#"]));
    }

    #[test]
    fn walls_block_the_heart() {
        assert!(!reachable(&["**#..", "**#.."]));
    }

    #[test]
    fn larger_heart_covers_a_smaller_goal() {
        assert!(reachable(&["#**#", "#**#", "#  #", "#..#"]));
        assert!(reachable(&["** .", "**  "]));
    }

    #[test]
    fn every_destination_must_end_under_the_heart() {
        assert!(!reachable(&["*  ..."]));
        assert!(!reachable(&[".**  ."]));
    }

    #[test]
    fn irregular_footprint_moves_as_a_rigid_shape() {
        assert!(reachable(&["*   . ", "**  .."]));
    }

    #[test]
    fn footprint_is_never_mirrored_or_rotated() {
        assert!(!reachable(&["*    .", "**  .."]));
    }
}
