use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::types::{Coordinate, Direction};

/// Square grid of side `size` with a fixed set of blocked cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridIndex {
    size: i32,
    blocked: BTreeSet<Coordinate>,
}

impl GridIndex {
    pub fn new(size: i32, blocked: impl IntoIterator<Item = Coordinate>) -> Self {
        let blocked = blocked
            .into_iter()
            .filter(|cell| in_square(size, *cell))
            .collect();
        Self { size, blocked }
    }

    pub fn open(size: i32) -> Self {
        Self::new(size, std::iter::empty())
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn obstacles(&self) -> &BTreeSet<Coordinate> {
        &self.blocked
    }

    pub fn in_bounds(&self, cell: Coordinate) -> bool {
        in_square(self.size, cell)
    }

    pub fn is_blocked(&self, cell: Coordinate) -> bool {
        self.blocked.contains(&cell)
    }

    pub fn is_walkable(&self, cell: Coordinate) -> bool {
        self.in_bounds(cell) && !self.is_blocked(cell)
    }

    #[cfg(test)]
    pub fn free_cell_count(&self) -> usize {
        (self.size.max(0) as usize).pow(2) - self.blocked.len()
    }

    /// Walkable 4-neighbors of `cell`, in [`Direction::EXPANSION_ORDER`].
    pub fn neighbors(&self, cell: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        Direction::EXPANSION_ORDER
            .into_iter()
            .map(move |dir| cell.offset(dir))
            .filter(|next| self.is_walkable(*next))
    }

    pub fn reachable_from(&self, start: Coordinate) -> HashSet<Coordinate> {
        let mut out = HashSet::new();
        if !self.is_walkable(start) {
            return out;
        }

        let mut queue = VecDeque::new();
        out.insert(start);
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            for next in self.neighbors(cell) {
                if out.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        out
    }
}

fn in_square(size: i32, cell: Coordinate) -> bool {
    cell.x >= 0 && cell.y >= 0 && cell.x < size && cell.y < size
}
