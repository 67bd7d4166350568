//! Random array generation.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of random arrays.
#[derive(Debug, Clone)]
pub struct ArrayGenerator {
    rng: StdRng,
}

impl ArrayGenerator {
    /// Seed from the thread-local generator.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deterministic generator for reproducible runs.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `len` values drawn uniformly from `range`.
    pub fn generate(&mut self, len: usize, range: RangeInclusive<u32>) -> Vec<u32> {
        (0..len).map(|_| self.rng.random_range(range.clone())).collect()
    }
}

impl Default for ArrayGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
