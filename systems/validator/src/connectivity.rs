//! Edge-connectivity of piece footprints.

use std::collections::{BTreeSet, VecDeque};

use klotski_core::Coordinate;

/// Splits a set of cells into its 4-connected components.
///
/// Components are discovered by flood fill starting from the smallest
/// remaining cell, so the first component always contains the cell that comes
/// first in row-major order.
pub(crate) fn components(cells: &BTreeSet<Coordinate>) -> Vec<BTreeSet<Coordinate>> {
    let mut remaining = cells.clone();
    let mut found = Vec::new();

    while let Some(seed) = remaining.pop_first() {
        let mut component = BTreeSet::from([seed]);
        let mut frontier = VecDeque::from([seed]);

        while let Some(cell) = frontier.pop_front() {
            for neighbor in cell.neighbors(u32::MAX, u32::MAX) {
                if remaining.remove(&neighbor) {
                    let _ = component.insert(neighbor);
                    frontier.push_back(neighbor);
                }
            }
        }

        found.push(component);
    }

    found
}
