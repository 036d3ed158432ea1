//! A* search over a [`GridIndex`] with unit-cost 4-directional moves.
//!
//! The frontier is ordered by `(estimated total, cost so far, discovery
//! sequence)` and neighbors are expanded in a fixed order, so a given grid,
//! start and goal always produce the same path.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use crate::grid::GridIndex;
use crate::types::Coordinate;

/// Cells to walk, excluding the start cell and ending at the goal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    cells: VecDeque<Coordinate>,
}

impl Path {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[cfg(test)]
    pub fn peek(&self) -> Option<Coordinate> {
        self.cells.front().copied()
    }

    #[cfg(test)]
    pub fn goal(&self) -> Option<Coordinate> {
        self.cells.back().copied()
    }

    pub fn pop_front(&mut self) -> Option<Coordinate> {
        self.cells.pop_front()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.cells.iter()
    }

    #[cfg(test)]
    pub fn to_vec(&self) -> Vec<Coordinate> {
        self.cells.iter().copied().collect()
    }
}

impl FromIterator<Coordinate> for Path {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    estimate: i32,
    cost: i32,
    sequence: u64,
    cell: Coordinate,
}

/// Shortest path from `start` to `goal`. Empty when `start == goal` or the
/// goal cannot be reached.
pub fn find_path(grid: &GridIndex, start: Coordinate, goal: Coordinate) -> Path {
    if start == goal || !grid.is_walkable(goal) {
        return Path::default();
    }

    let mut frontier = BinaryHeap::new();
    let mut cost_so_far: HashMap<Coordinate, i32> = HashMap::new();
    let mut came_from: HashMap<Coordinate, Coordinate> = HashMap::new();
    let mut sequence = 0u64;

    cost_so_far.insert(start, 0);
    frontier.push(Reverse(FrontierEntry {
        estimate: start.manhattan(goal),
        cost: 0,
        sequence,
        cell: start,
    }));

    while let Some(Reverse(current)) = frontier.pop() {
        if current.cell == goal {
            return reconstruct(&came_from, start, goal);
        }
        if cost_so_far
            .get(&current.cell)
            .is_some_and(|best| current.cost > *best)
        {
            continue;
        }

        for next in grid.neighbors(current.cell) {
            let new_cost = current.cost + 1;
            let improves = cost_so_far
                .get(&next)
                .map_or(true, |known| new_cost < *known);
            if !improves {
                continue;
            }
            cost_so_far.insert(next, new_cost);
            came_from.insert(next, current.cell);
            sequence += 1;
            frontier.push(Reverse(FrontierEntry {
                estimate: new_cost + next.manhattan(goal),
                cost: new_cost,
                sequence,
                cell: next,
            }));
        }
    }

    Path::default()
}

fn reconstruct(
    came_from: &HashMap<Coordinate, Coordinate>,
    start: Coordinate,
    goal: Coordinate,
) -> Path {
    let mut cells = VecDeque::new();
    let mut current = goal;
    while current != start {
        cells.push_front(current);
        match came_from.get(&current) {
            Some(prev) => current = *prev,
            None => return Path::default(),
        }
    }
    Path { cells }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};

    use super::*;
    use crate::rng::Rng;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn bfs_distance(grid: &GridIndex, start: Coordinate, goal: Coordinate) -> Option<usize> {
        let mut dist = HashMap::new();
        let mut queue = VecDeque::new();
        dist.insert(start, 0usize);
        queue.push_back(start);
        while let Some(cell) = queue.pop_front() {
            if cell == goal {
                return dist.get(&cell).copied();
            }
            let d = dist[&cell];
            for next in grid.neighbors(cell) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn random_grid(rng: &mut Rng, size: i32, obstacles: usize) -> GridIndex {
        let cells: Vec<_> = (0..obstacles).map(|_| rng.cell(size)).collect();
        GridIndex::new(size, cells)
    }

    fn assert_valid(grid: &GridIndex, start: Coordinate, goal: Coordinate, path: &Path) {
        let mut prev = start;
        for cell in path.iter() {
            assert!(
                prev.is_adjacent(*cell),
                "{prev:?} -> {cell:?} is not a step"
            );
            assert!(grid.is_walkable(*cell), "{cell:?} is blocked");
            prev = *cell;
        }
        assert_eq!(path.goal(), Some(goal));
    }

    #[test]
    fn straight_corridor_on_open_grid() {
        let grid = GridIndex::open(20);
        let path = find_path(&grid, c(0, 0), c(0, 3));
        assert_eq!(path.to_vec(), vec![c(0, 1), c(0, 2), c(0, 3)]);
    }

    #[test]
    fn start_equal_to_goal_yields_empty_path() {
        let grid = GridIndex::open(5);
        assert!(find_path(&grid, c(2, 2), c(2, 2)).is_empty());
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let walls = [c(3, 2), c(3, 4), c(2, 3), c(4, 3)];
        let grid = GridIndex::new(7, walls);
        assert!(find_path(&grid, c(0, 0), c(3, 3)).is_empty());
        assert!(find_path(&grid, c(3, 3), c(0, 0)).is_empty());
    }

    #[test]
    fn blocked_or_out_of_bounds_goal_is_unreachable() {
        let grid = GridIndex::new(5, [c(4, 4)]);
        assert!(find_path(&grid, c(0, 0), c(4, 4)).is_empty());
        assert!(find_path(&grid, c(0, 0), c(5, 0)).is_empty());
    }

    #[test]
    fn path_routes_around_wall() {
        // wall across x=2 except the bottom row
        let wall = (0..4).map(|y| c(2, y));
        let grid = GridIndex::new(5, wall);
        let path = find_path(&grid, c(0, 0), c(4, 0));
        assert_valid(&grid, c(0, 0), c(4, 0), &path);
        assert_eq!(path.len(), 12);
    }

    #[test]
    fn ties_resolve_in_expansion_order() {
        let grid = GridIndex::open(5);
        let path = find_path(&grid, c(0, 0), c(2, 2));
        assert_eq!(path.to_vec(), vec![c(0, 1), c(0, 2), c(1, 2), c(2, 2)]);
    }

    #[test]
    fn repeated_searches_return_identical_paths() {
        for seed in 0..50u64 {
            let mut rng = Rng::new(seed);
            let grid = random_grid(&mut rng, 12, 30);
            let start = rng.cell(12);
            let goal = rng.cell(12);
            let first = find_path(&grid, start, goal);
            for _ in 0..3 {
                assert_eq!(find_path(&grid, start, goal), first);
            }
        }
    }

    #[test]
    fn path_length_matches_breadth_first_distance() {
        for seed in 0..200u64 {
            let mut rng = Rng::new(seed);
            let grid = random_grid(&mut rng, 8, 20);
            let start = rng.cell(8);
            let goal = rng.cell(8);
            let path = find_path(&grid, start, goal);

            match bfs_distance(&grid, start, goal) {
                Some(0) => assert!(path.is_empty()),
                Some(dist) if grid.is_walkable(goal) => {
                    assert_eq!(path.len(), dist, "seed={seed} {start:?}->{goal:?}");
                    assert_valid(&grid, start, goal, &path);
                }
                _ => assert!(path.is_empty(), "seed={seed} expected no path"),
            }
        }
    }

    #[test]
    fn path_pops_from_the_front() {
        let grid = GridIndex::open(4);
        let mut path = find_path(&grid, c(0, 0), c(0, 2));
        assert_eq!(path.peek(), Some(c(0, 1)));
        assert_eq!(path.pop_front(), Some(c(0, 1)));
        assert_eq!(path.pop_front(), Some(c(0, 2)));
        assert_eq!(path.pop_front(), None);
        assert!(path.is_empty());
    }
}
