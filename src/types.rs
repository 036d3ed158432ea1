use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Coordinate) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn offset(self, dir: Direction) -> Coordinate {
        match dir {
            Direction::Down => Coordinate::new(self.x, self.y + 1),
            Direction::Up => Coordinate::new(self.x, self.y - 1),
            Direction::Right => Coordinate::new(self.x + 1, self.y),
            Direction::Left => Coordinate::new(self.x - 1, self.y),
            Direction::None => self,
        }
    }

    #[cfg(test)]
    pub fn is_adjacent(self, other: Coordinate) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Up,
    Right,
    Left,
    None,
}

impl Direction {
    /// Neighbor expansion order used by every search over the grid.
    pub const EXPANSION_ORDER: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Left,
    ];

    pub fn between(from: Coordinate, to: Coordinate) -> Self {
        match (to.x - from.x, to.y - from.y) {
            (0, 1) => Self::Down,
            (0, -1) => Self::Up,
            (1, 0) => Self::Right,
            (-1, 0) => Self::Left,
            _ => Self::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ongoing,
    Win,
    Lose,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ongoing => "ongoing",
            Outcome::Win => "win",
            Outcome::Lose => "lose",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    ItemCollected {
        x: i32,
        y: i32,
        score: u32,
    },
    SeekerCaught {
        #[serde(rename = "pursuerId")]
        pursuer_id: usize,
    },
    SessionEnded {
        outcome: Outcome,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct SeekerView {
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub score: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct PursuerView {
    pub id: usize,
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    #[serde(rename = "pathLen")]
    pub path_len: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct WorldInit {
    pub size: i32,
    pub seed: u64,
    pub obstacles: Vec<(i32, i32)>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub outcome: Outcome,
    pub seeker: SeekerView,
    pub pursuers: Vec<PursuerView>,
    pub items: Vec<(i32, i32)>,
    pub events: Vec<RuntimeEvent>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub outcome: Outcome,
    pub ticks: u64,
    pub score: u32,
    #[serde(rename = "itemsCollected")]
    pub items_collected: usize,
    #[serde(rename = "itemsRemaining")]
    pub items_remaining: usize,
}
