use std::collections::{BTreeSet, HashSet};

use crate::config::SessionConfig;
use crate::error::GenerationError;
use crate::grid::GridIndex;
use crate::rng::Rng;
use crate::types::Coordinate;

#[derive(Clone, Debug)]
pub struct GeneratedWorld {
    pub grid: GridIndex,
    pub items: BTreeSet<Coordinate>,
    pub seeker_spawn: Coordinate,
    pub pursuer_spawns: Vec<Coordinate>,
}

pub fn generate_world(
    config: &SessionConfig,
    rng: &mut Rng,
) -> Result<GeneratedWorld, GenerationError> {
    let spawn_cells = validate_spawns(config)?;
    let grid = place_obstacles(config, &spawn_cells, rng);
    let items = place_items(config, &grid, rng)?;

    Ok(GeneratedWorld {
        grid,
        items,
        seeker_spawn: config.seeker_spawn,
        pursuer_spawns: config.pursuer_spawns.clone(),
    })
}

pub(crate) fn validate_spawns(
    config: &SessionConfig,
) -> Result<HashSet<Coordinate>, GenerationError> {
    if config.grid_size <= 0 {
        return Err(GenerationError::EmptyGrid(config.grid_size));
    }
    let bounds = GridIndex::open(config.grid_size);
    let mut seen = HashSet::new();
    for spawn in std::iter::once(&config.seeker_spawn).chain(&config.pursuer_spawns) {
        if !bounds.in_bounds(*spawn) {
            return Err(GenerationError::SpawnOutOfBounds(*spawn, config.grid_size));
        }
        if !seen.insert(*spawn) {
            return Err(GenerationError::OverlappingSpawn(*spawn));
        }
    }
    Ok(seen)
}

/// Draws `obstacle_draws` cells; duplicates and spawn cells are dropped, so
/// the final count may be lower.
fn place_obstacles(
    config: &SessionConfig,
    spawn_cells: &HashSet<Coordinate>,
    rng: &mut Rng,
) -> GridIndex {
    let mut blocked = BTreeSet::new();
    for _ in 0..config.obstacle_draws {
        let cell = rng.cell(config.grid_size);
        if spawn_cells.contains(&cell) {
            continue;
        }
        blocked.insert(cell);
    }
    GridIndex::new(config.grid_size, blocked)
}

/// Items go only on free cells the seeker can reach from its spawn.
fn place_items(
    config: &SessionConfig,
    grid: &GridIndex,
    rng: &mut Rng,
) -> Result<BTreeSet<Coordinate>, GenerationError> {
    let mut candidates = grid.reachable_from(config.seeker_spawn);
    candidates.remove(&config.seeker_spawn);
    if candidates.len() < config.item_count {
        return Err(GenerationError::InsufficientFreeCells {
            requested: config.item_count,
            available: candidates.len(),
        });
    }

    let mut items = BTreeSet::new();
    let mut attempts = 0;
    while items.len() < config.item_count {
        if attempts >= config.max_placement_attempts {
            return Err(GenerationError::PlacementCapExceeded {
                requested: config.item_count,
                placed: items.len(),
                attempts,
            });
        }
        attempts += 1;
        let cell = rng.cell(config.grid_size);
        if candidates.contains(&cell) {
            items.insert(cell);
        }
    }
    Ok(items)
}
