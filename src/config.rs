use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    GRID_SIZE, ITEM_COUNT, ITEM_SCORE, MAX_PLACEMENT_ATTEMPTS, OBSTACLE_DRAWS, PURSUER_SPAWNS,
    SEEKER_SPAWN,
};
use crate::error::ConfigError;
use crate::types::Coordinate;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(rename = "gridSize", alias = "grid_size")]
    pub grid_size: i32,
    #[serde(rename = "obstacleDraws", alias = "obstacle_draws")]
    pub obstacle_draws: usize,
    #[serde(rename = "itemCount", alias = "item_count")]
    pub item_count: usize,
    #[serde(rename = "itemScore", alias = "item_score")]
    pub item_score: u32,
    #[serde(rename = "seekerSpawn", alias = "seeker_spawn")]
    pub seeker_spawn: Coordinate,
    #[serde(rename = "pursuerSpawns", alias = "pursuer_spawns")]
    pub pursuer_spawns: Vec<Coordinate>,
    #[serde(rename = "maxPlacementAttempts", alias = "max_placement_attempts")]
    pub max_placement_attempts: usize,
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            obstacle_draws: OBSTACLE_DRAWS,
            item_count: ITEM_COUNT,
            item_score: ITEM_SCORE,
            seeker_spawn: SEEKER_SPAWN.into(),
            pursuer_spawns: PURSUER_SPAWNS
                .iter()
                .copied()
                .map(Coordinate::from)
                .collect(),
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            seed: 0,
        }
    }
}

impl SessionConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reads a JSON config; fields missing from the file keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
