//! Deterministic random streams for the demo data generator.
//!
//! RULE: The generator never touches a platform RNG. Each fact table
//! draws from its own stream, seeded from (master_seed, stream index),
//! so adding a table never shifts the numbers of existing tables.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct FactRng {
    pub stream: FactStream,
    inner:      Pcg64Mcg,
}

impl FactRng {
    pub fn new(master_seed: u64, stream: FactStream) -> Self {
        let derived_seed = master_seed ^ (stream as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            stream,
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Uniform float in [0.0, 1.0).
    pub fn unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Multiplicative noise around 1.0, within ±`spread`.
    pub fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + (self.unit() * 2.0 - 1.0) * spread
    }

    /// Integer in [lo, hi].
    pub fn between(&mut self, lo: i64, hi: i64) -> i64 {
        self.inner.gen_range(lo..=hi)
    }

    /// Heavy-tailed draw, used for region and district size weights.
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        let u = self.unit().max(1e-10);
        x_min * u.powf(-1.0 / alpha)
    }
}

/// Stable stream assignments. Append only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum FactStream {
    Weights      = 0,
    Transactions = 1,
    Districts    = 2,
    Brands       = 3,
    Users        = 4,
    Insurance    = 5,
}
