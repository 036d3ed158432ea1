use crate::types::Coordinate;

/// Reasons a session layout cannot be generated from a [`SessionConfig`].
///
/// [`SessionConfig`]: crate::config::SessionConfig
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("grid size must be positive, got {0}")]
    EmptyGrid(i32),

    #[error("spawn {0:?} is outside a {1}x{1} grid")]
    SpawnOutOfBounds(Coordinate, i32),

    #[error("spawn {0:?} is used by more than one entity")]
    OverlappingSpawn(Coordinate),

    #[error("spawn {0:?} is on an obstacle")]
    BlockedSpawn(Coordinate),

    #[error("only {available} free reachable cells for {requested} items")]
    InsufficientFreeCells { requested: usize, available: usize },

    #[error("placed {placed} of {requested} items before hitting the {attempts}-draw cap")]
    PlacementCapExceeded {
        requested: usize,
        placed: usize,
        attempts: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
