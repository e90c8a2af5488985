//! Seeded randomness for round resolution.
//! Every draw a round makes flows through one [`RoundRng`] so that a round is
//! a pure function of (snapshot, actions, seed). Production callers seed from
//! an entropy source; tests seed with fixed values.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

pub struct RoundRng {
    inner: ChaCha8Rng,
}

impl RoundRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Uniform draw in `[0, 1)` with 53 bits of precision.
    pub fn fraction(&mut self) -> f64 {
        (self.inner.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Bernoulli draw. Probabilities outside `[0, 1]` saturate.
    pub fn chance(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.fraction() < probability
    }

    /// Uniform integer in the inclusive range `[min, max]`.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = (max - min) as u64 + 1;
        min + (self.inner.next_u64() % span) as i32
    }

    /// Uniform index into a collection of `len` elements. `len` must be > 0.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.inner.next_u64() % len as u64) as usize
    }
}
