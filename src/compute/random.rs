//! Randomness source for evolutionary operators.
//!
//! Algorithms only draw through [`RandomSource`], so a scripted source can
//! stand in for the seeded generator in tests.

use rand::prelude::*;

/// Sampling primitives consumed by every algorithm.
pub trait RandomSource {
    /// Uniform real in `[0, 1)`.
    fn random_uniform(&mut self) -> f64;

    /// Uniform integer in `[min, max]`, both ends inclusive.
    fn random_int(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        min + (self.random_uniform() * span).floor() as i64
    }

    /// Normal sample via the Box-Muller transform.
    fn random_gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - self.random_uniform();
        let u2 = self.random_uniform();
        let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        z0 * std_dev + mean
    }

    /// Uniform index in `[0, len)`.
    fn random_index(&mut self, len: usize) -> usize {
        self.random_int(0, len as i64 - 1) as usize
    }
}

/// Random number generator wrapper for evolutionary operators.
pub struct EaRng {
    rng: StdRng,
}

impl EaRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::random, Self::new)
    }
}

impl RandomSource for EaRng {
    fn random_uniform(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    fn random_int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed list of uniforms, cycling when exhausted.
#[cfg(test)]
pub(crate) struct ScriptedRng {
    values: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn random_uniform(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
