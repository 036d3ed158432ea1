use std::collections::BTreeSet;

use crate::types::Coordinate;

/// Closest item by Manhattan distance. On ties the first item in set order
/// wins.
pub(super) fn nearest_item(from: Coordinate, items: &BTreeSet<Coordinate>) -> Option<Coordinate> {
    let mut best: Option<(i32, Coordinate)> = None;
    for item in items {
        let dist = from.manhattan(*item);
        if best.map(|(best_dist, _)| dist < best_dist).unwrap_or(true) {
            best = Some((dist, *item));
        }
    }
    best.map(|(_, item)| item)
}
