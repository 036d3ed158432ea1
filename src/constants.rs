pub const TICK_RATE: u32 = 15;
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;

pub const GRID_SIZE: i32 = 20;
pub const OBSTACLE_DRAWS: usize = 50;
pub const ITEM_COUNT: usize = 50;
pub const ITEM_SCORE: u32 = 10;
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

pub const SEEKER_SPAWN: (i32, i32) = (10, 10);
pub const PURSUER_SPAWNS: [(i32, i32); 3] = [(5, 5), (15, 15), (7, 7)];

/// Upper bound for headless runs: every cell visited a few times over.
pub fn default_tick_limit(grid_size: i32, item_count: usize) -> u64 {
    let cells = (grid_size.max(1) as u64).pow(2);
    cells * 4 + item_count as u64 * grid_size.max(1) as u64 * 2
}
