use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};

use crate::types::Coordinate;

/// Seeded random source for session generation. The same seed always
/// yields the same draw sequence.
#[derive(Clone, Debug)]
pub struct Rng {
    inner: StdRng,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `min..=max`; returns `min` when the range is empty.
    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.inner.random_range(min..=max)
    }

    pub fn cell(&mut self, size: i32) -> Coordinate {
        let x = self.int(0, size - 1);
        let y = self.int(0, size - 1);
        Coordinate::new(x, y)
    }

    /// Fresh seed for the next session drawn from this stream.
    pub fn next_seed(&mut self) -> u64 {
        self.inner.random()
    }
}
