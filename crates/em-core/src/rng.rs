//! Deterministic per-entity RNG.
//!
//! # Determinism strategy
//!
//! Each movement-scheduler replica gets its own independent `SmallRng`
//! seeded by:
//!
//!   seed = global_seed XOR (replica_index * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive replica indices uniformly across the seed space.
//! Replicas never share RNG state, and the speeds drawn for one entity do not
//! depend on how many other entities were replicated before or after it.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-entity deterministic RNG.
pub struct EntityRng(SmallRng);

impl EntityRng {
    /// Seed deterministically from the run's global seed and a replica index.
    pub fn new(global_seed: u64, replica: usize) -> Self {
        let seed = global_seed ^ (replica as u64).wrapping_mul(MIXING_CONSTANT);
        EntityRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
