use crate::domain::ports::MarketNoise;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Draws from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngNoise;

impl MarketNoise for ThreadRngNoise {
    fn sample(&self, spread: f64) -> f64 {
        1.0 + rand::thread_rng().gen_range(-spread..=spread)
    }
}

/// Reproducible noise for pinned quotes.
#[derive(Debug)]
pub struct SeededNoise {
    rng: Mutex<StdRng>,
}

impl SeededNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl MarketNoise for SeededNoise {
    fn sample(&self, spread: f64) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => 1.0 + rng.gen_range(-spread..=spread),
            // poisoned lock: recover the generator state
            Err(poisoned) => 1.0 + poisoned.into_inner().gen_range(-spread..=spread),
        }
    }
}

/// Constant factor, ignoring the spread.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise {
    factor: f64,
}

impl FixedNoise {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    pub fn neutral() -> Self {
        Self::new(1.0)
    }
}

impl MarketNoise for FixedNoise {
    fn sample(&self, _spread: f64) -> f64 {
        self.factor
    }
}
