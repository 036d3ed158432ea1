use super::*;

impl WorldState {
    pub(super) fn spawn_seeker(world: &GeneratedWorld) -> Seeker {
        Seeker::new(world.seeker_spawn)
    }

    pub(super) fn spawn_pursuers(world: &GeneratedWorld) -> Vec<Pursuer> {
        world
            .pursuer_spawns
            .iter()
            .enumerate()
            .map(|(id, spawn)| Pursuer::new(id, *spawn))
            .collect()
    }

    /// Builds a complete session from a freshly seeded generator. Nothing on
    /// `self` is touched, so a failure leaves the running session intact.
    pub(super) fn build_session(
        config: &SessionConfig,
        seed: u64,
    ) -> Result<(Session, Rng), GenerationError> {
        let mut rng = Rng::new(seed);
        let world = generate_world(config, &mut rng)?;
        let session = Session {
            seed,
            seeker: Self::spawn_seeker(&world),
            pursuers: Self::spawn_pursuers(&world),
            items_total: world.items.len(),
            grid: world.grid,
            items: world.items,
            outcome: Outcome::Ongoing,
            tick: 0,
            events: Vec::new(),
        };
        Ok((session, rng))
    }
}
