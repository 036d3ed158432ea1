use crate::grid::GridIndex;
use crate::pathfinder::{find_path, Path};
use crate::types::{Coordinate, Direction};

/// Grid position plus the path the entity is currently walking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MobileEntity {
    position: Coordinate,
    dir: Direction,
    path: Path,
}

impl MobileEntity {
    pub fn new(position: Coordinate) -> Self {
        Self {
            position,
            dir: Direction::None,
            path: Path::default(),
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn dir(&self) -> Direction {
        self.dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn step_along_path(&mut self) -> bool {
        let Some(next) = self.path.pop_front() else {
            self.dir = Direction::None;
            return false;
        };
        self.dir = Direction::between(self.position, next);
        self.position = next;
        true
    }
}

/// The item collector. Replans from scratch every tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seeker {
    body: MobileEntity,
    score: u32,
}

impl Seeker {
    pub fn new(spawn: Coordinate) -> Self {
        Self {
            body: MobileEntity::new(spawn),
            score: 0,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.body.position
    }

    pub fn dir(&self) -> Direction {
        self.body.dir
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// Moves one cell toward `goal` on a freshly computed path, or stays put
    /// when there is no goal or it is unreachable.
    pub fn advance(&mut self, goal: Option<Coordinate>, grid: &GridIndex) -> Coordinate {
        self.body.path = match goal {
            Some(goal) => find_path(grid, self.body.position, goal),
            None => Path::default(),
        };
        self.body.step_along_path();
        self.body.position
    }
}

/// A chaser. Walks its cached path to the end before asking for a new one,
/// and spends the replanning tick standing still.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pursuer {
    id: usize,
    body: MobileEntity,
}

impl Pursuer {
    pub fn new(id: usize, spawn: Coordinate) -> Self {
        Self {
            id,
            body: MobileEntity::new(spawn),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn position(&self) -> Coordinate {
        self.body.position
    }

    pub fn dir(&self) -> Direction {
        self.body.dir
    }

    pub fn path(&self) -> &Path {
        self.body.path()
    }

    pub fn advance(&mut self, target: Coordinate, grid: &GridIndex) -> Coordinate {
        if !self.body.path.is_empty() {
            self.body.step_along_path();
            return self.body.position;
        }
        self.body.path = find_path(grid, self.body.position, target);
        self.body.dir = Direction::None;
        self.body.position
    }

    #[cfg(test)]
    pub(crate) fn with_path(id: usize, position: Coordinate, path: Path) -> Self {
        Self {
            id,
            body: MobileEntity {
                position,
                dir: Direction::None,
                path,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn seeker_moves_every_tick_toward_goal() {
        let grid = GridIndex::open(6);
        let mut seeker = Seeker::new(c(0, 0));
        assert_eq!(seeker.advance(Some(c(0, 3)), &grid), c(0, 1));
        assert_eq!(seeker.dir(), Direction::Down);
        assert_eq!(seeker.advance(Some(c(0, 3)), &grid), c(0, 2));
        assert_eq!(seeker.advance(Some(c(0, 3)), &grid), c(0, 3));
        assert_eq!(seeker.advance(Some(c(0, 3)), &grid), c(0, 3));
        assert_eq!(seeker.dir(), Direction::None);
    }

    #[test]
    fn seeker_follows_goal_changes_immediately() {
        let grid = GridIndex::open(6);
        let mut seeker = Seeker::new(c(2, 2));
        assert_eq!(seeker.advance(Some(c(2, 5)), &grid), c(2, 3));
        assert_eq!(seeker.advance(Some(c(5, 3)), &grid), c(3, 3));
    }

    #[test]
    fn seeker_without_goal_stays() {
        let grid = GridIndex::open(6);
        let mut seeker = Seeker::new(c(1, 1));
        assert_eq!(seeker.advance(None, &grid), c(1, 1));
    }

    #[test]
    fn pursuer_plans_on_one_tick_and_moves_on_the_next() {
        let grid = GridIndex::open(6);
        let mut pursuer = Pursuer::new(0, c(0, 0));

        assert_eq!(pursuer.advance(c(0, 2), &grid), c(0, 0));
        assert_eq!(pursuer.path().len(), 2);
        assert_eq!(pursuer.advance(c(0, 2), &grid), c(0, 1));
        assert_eq!(pursuer.advance(c(0, 2), &grid), c(0, 2));
        assert!(pursuer.path().is_empty());
        // next call replans instead of moving
        assert_eq!(pursuer.advance(c(3, 2), &grid), c(0, 2));
        assert_eq!(pursuer.path().goal(), Some(c(3, 2)));
    }

    #[test]
    fn pursuer_keeps_stale_path_until_exhausted() {
        let grid = GridIndex::open(6);
        let mut pursuer = Pursuer::new(0, c(0, 0));
        pursuer.advance(c(0, 3), &grid);
        assert_eq!(pursuer.advance(c(5, 5), &grid), c(0, 1));
        assert_eq!(pursuer.path().goal(), Some(c(0, 3)));
    }

    #[test]
    fn pursuer_with_unreachable_target_holds_position() {
        let walls = [c(1, 0), c(0, 1)];
        let grid = GridIndex::new(4, walls);
        let mut pursuer = Pursuer::new(0, c(0, 0));
        for _ in 0..4 {
            assert_eq!(pursuer.advance(c(3, 3), &grid), c(0, 0));
            assert!(pursuer.path().is_empty());
        }
    }

    #[test]
    fn score_accumulates() {
        let mut seeker = Seeker::new(c(0, 0));
        seeker.add_score(10);
        seeker.add_score(10);
        assert_eq!(seeker.score(), 20);
    }
}
