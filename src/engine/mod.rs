use std::collections::BTreeSet;

use crate::config::SessionConfig;
use crate::entity::{Pursuer, Seeker};
use crate::error::GenerationError;
use crate::grid::GridIndex;
use crate::rng::Rng;
use crate::types::{
    Coordinate, Outcome, PursuerView, RuntimeEvent, SeekerView, SessionSummary, Snapshot, WorldInit,
};
use crate::world::{generate_world, validate_spawns, GeneratedWorld};

mod spawn_system;
mod utils;

use self::utils::nearest_item;

#[derive(Clone, Debug)]
struct Session {
    seed: u64,
    grid: GridIndex,
    items: BTreeSet<Coordinate>,
    items_total: usize,
    seeker: Seeker,
    pursuers: Vec<Pursuer>,
    outcome: Outcome,
    tick: u64,
    events: Vec<RuntimeEvent>,
}

/// Owns one game session and advances it one tick at a time.
#[derive(Clone, Debug)]
pub struct WorldState {
    config: SessionConfig,
    rng: Rng,
    session: Session,
}

impl WorldState {
    pub fn new(config: SessionConfig) -> Result<Self, GenerationError> {
        let (session, rng) = Self::build_session(&config, config.seed)?;
        Ok(Self {
            config,
            rng,
            session,
        })
    }

    /// Session on a hand-built board. Spawns must be in bounds, distinct and
    /// walkable. Items on blocked cells or on the seeker's spawn are dropped.
    pub fn with_layout(
        grid: GridIndex,
        items: impl IntoIterator<Item = Coordinate>,
        seeker_spawn: Coordinate,
        pursuer_spawns: &[Coordinate],
    ) -> Result<Self, GenerationError> {
        let items: BTreeSet<Coordinate> = items
            .into_iter()
            .filter(|item| grid.is_walkable(*item) && *item != seeker_spawn)
            .collect();
        let config = SessionConfig {
            grid_size: grid.size(),
            item_count: items.len(),
            seeker_spawn,
            pursuer_spawns: pursuer_spawns.to_vec(),
            ..SessionConfig::default()
        };
        validate_spawns(&config)?;
        if let Some(spawn) = std::iter::once(&seeker_spawn)
            .chain(pursuer_spawns)
            .find(|spawn| grid.is_blocked(**spawn))
        {
            return Err(GenerationError::BlockedSpawn(*spawn));
        }
        let world = GeneratedWorld {
            grid,
            items,
            seeker_spawn,
            pursuer_spawns: pursuer_spawns.to_vec(),
        };
        let session = Session {
            seed: config.seed,
            seeker: Self::spawn_seeker(&world),
            pursuers: Self::spawn_pursuers(&world),
            items_total: world.items.len(),
            grid: world.grid,
            items: world.items,
            outcome: Outcome::Ongoing,
            tick: 0,
            events: Vec::new(),
        };
        Ok(Self {
            rng: Rng::new(config.seed),
            config,
            session,
        })
    }

    /// Replaces the whole session with a new one drawn from this engine's
    /// seed stream. On error the current session is kept.
    pub fn reset(&mut self) -> Result<(), GenerationError> {
        let seed = self.rng.next_seed();
        self.reset_with_seed(seed)
    }

    pub fn reset_with_seed(&mut self, seed: u64) -> Result<(), GenerationError> {
        let (session, rng) = Self::build_session(&self.config, seed)?;
        self.session = session;
        self.rng = rng;
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.session.seed
    }

    pub fn tick(&self) -> u64 {
        self.session.tick
    }

    pub fn outcome(&self) -> Outcome {
        self.session.outcome
    }

    pub fn is_ended(&self) -> bool {
        self.session.outcome.is_terminal()
    }

    pub fn grid(&self) -> &GridIndex {
        &self.session.grid
    }

    pub fn items(&self) -> &BTreeSet<Coordinate> {
        &self.session.items
    }

    pub fn seeker(&self) -> &Seeker {
        &self.session.seeker
    }

    pub fn pursuers(&self) -> &[Pursuer] {
        &self.session.pursuers
    }

    /// Runs one tick. The seeker moves and collects first, the outcome is
    /// decided next, and pursuers move only if the session is still going.
    pub fn step(&mut self) -> Outcome {
        if self.is_ended() {
            return self.session.outcome;
        }
        let item_score = self.config.item_score;
        let session = &mut self.session;
        session.tick += 1;

        let goal = nearest_item(session.seeker.position(), &session.items);
        let position = session.seeker.advance(goal, &session.grid);

        if session.items.remove(&position) {
            session.seeker.add_score(item_score);
            session.events.push(RuntimeEvent::ItemCollected {
                x: position.x,
                y: position.y,
                score: session.seeker.score(),
            });
        }

        session.outcome = Self::evaluate_outcome(session);
        if session.outcome.is_terminal() {
            session.events.push(RuntimeEvent::SessionEnded {
                outcome: session.outcome,
            });
            return session.outcome;
        }

        for pursuer in &mut session.pursuers {
            pursuer.advance(position, &session.grid);
        }
        Outcome::Ongoing
    }

    fn evaluate_outcome(session: &mut Session) -> Outcome {
        let position = session.seeker.position();
        if let Some(pursuer) = session
            .pursuers
            .iter()
            .find(|pursuer| pursuer.position() == position)
        {
            session.events.push(RuntimeEvent::SeekerCaught {
                pursuer_id: pursuer.id(),
            });
            return Outcome::Lose;
        }
        if session.items.is_empty() {
            return Outcome::Win;
        }
        Outcome::Ongoing
    }

    pub fn get_world_init(&self) -> WorldInit {
        WorldInit {
            size: self.session.grid.size(),
            seed: self.session.seed,
            obstacles: self
                .session
                .grid
                .obstacles()
                .iter()
                .map(|cell| (cell.x, cell.y))
                .collect(),
        }
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let session = &mut self.session;
        let seeker = &session.seeker;
        Snapshot {
            tick: session.tick,
            outcome: session.outcome,
            seeker: SeekerView {
                x: seeker.position().x,
                y: seeker.position().y,
                dir: seeker.dir(),
                score: seeker.score(),
            },
            pursuers: session
                .pursuers
                .iter()
                .map(|pursuer| PursuerView {
                    id: pursuer.id(),
                    x: pursuer.position().x,
                    y: pursuer.position().y,
                    dir: pursuer.dir(),
                    path_len: pursuer.path().len(),
                })
                .collect(),
            items: session.items.iter().map(|item| (item.x, item.y)).collect(),
            events: if include_events {
                std::mem::take(&mut session.events)
            } else {
                Vec::new()
            },
        }
    }

    pub fn build_summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.session.seed,
            outcome: self.session.outcome,
            ticks: self.session.tick,
            score: self.session.seeker.score(),
            items_collected: self.session.items_total - self.session.items.len(),
            items_remaining: self.session.items.len(),
        }
    }
}
