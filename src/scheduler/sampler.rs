//! Candidate samplers for bounded-retry placement.
//!
//! Each placement attempt draws one candidate from the eligible list.
//! The sampler decides which: uniformly at random (production runs,
//! spreads sessions across days and rooms) or in order (deterministic
//! tests; with a budget at least the candidate count it is exhaustive).

use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses a candidate index for each placement attempt.
pub trait CandidateSampler: Debug {
    /// Sampler name (for logs).
    fn name(&self) -> &'static str;

    /// Picks an index in `0..len` for attempt number `attempt`.
    ///
    /// Callers never pass `len == 0`.
    fn pick(&mut self, attempt: usize, len: usize) -> usize;
}

/// Uniform random sampling with replacement.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    /// Creates a sampler with a fixed seed (reproducible runs).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a sampler seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is given, OS-seeded otherwise.
    pub fn with_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl CandidateSampler for RandomSampler {
    fn name(&self) -> &'static str {
        "random"
    }

    fn pick(&mut self, _attempt: usize, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Deterministic round-robin: attempt `k` takes candidate `k % len`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler;

impl CandidateSampler for SequentialSampler {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn pick(&mut self, attempt: usize, len: usize) -> usize {
        attempt % len
    }
}
