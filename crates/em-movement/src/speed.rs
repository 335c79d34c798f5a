//! Speed sources for the sampled-speed timing mode.
//!
//! The scheduler consumes one sampled value per epoch and treats it opaquely;
//! only the fallback uses [`SpeedSampler::max_speed`].

use em_core::{CoreResult, EntityRng, SpeedRange};

/// Supplies per-epoch travel speeds for one entity.
pub trait SpeedSampler: Send {
    /// Speed for the next epoch, in m/s.
    fn sample(&mut self) -> f64;

    /// Fastest speed the entity can travel at.
    fn max_speed(&self) -> f64;

    /// Independent sampler for replica number `replica` of a prototype.
    fn fork(&self, replica: usize) -> Self
    where
        Self: Sized;
}

// ── UniformSpeed ──────────────────────────────────────────────────────────────

/// Uniform draw from `[min, max]` with a deterministic per-replica RNG.
pub struct UniformSpeed {
    range: SpeedRange,
    seed:  u64,
    rng:   EntityRng,
}

impl UniformSpeed {
    pub fn new(range: SpeedRange, seed: u64, replica: usize) -> CoreResult<Self> {
        range.validate()?;
        Ok(Self { range, seed, rng: EntityRng::new(seed, replica) })
    }

    pub fn range(&self) -> SpeedRange {
        self.range
    }
}

impl SpeedSampler for UniformSpeed {
    fn sample(&mut self) -> f64 {
        self.rng.gen_range(self.range.min..=self.range.max)
    }

    fn max_speed(&self) -> f64 {
        self.range.max
    }

    fn fork(&self, replica: usize) -> Self {
        Self { range: self.range, seed: self.seed, rng: EntityRng::new(self.seed, replica) }
    }
}

// ── ConstantSpeed ─────────────────────────────────────────────────────────────

/// Always the same speed, which is also the maximum.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantSpeed(pub f64);

impl SpeedSampler for ConstantSpeed {
    fn sample(&mut self) -> f64 {
        self.0
    }

    fn max_speed(&self) -> f64 {
        self.0
    }

    fn fork(&self, _replica: usize) -> Self {
        *self
    }
}
