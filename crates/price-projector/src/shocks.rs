//! Sources of the daily random term.
//!
//! The projector asks a [`ShockSource`] for one draw per simulated day. Production
//! code uses [`GaussianShocks`]; tests and replays inject [`FixedShocks`] or a seeded
//! generator to get reproducible paths.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

pub trait ShockSource {
    /// One draw with mean 0 and standard deviation `volatility`.
    fn draw(&mut self, volatility: f64) -> f64;
}

/// Normally distributed shocks from a random number generator
pub struct GaussianShocks<R: Rng> {
    rng: R,
}

impl GaussianShocks<StdRng> {
    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GaussianShocks<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ShockSource for GaussianShocks<R> {
    fn draw(&mut self, volatility: f64) -> f64 {
        match Normal::new(0.0, volatility) {
            Ok(normal) => self.rng.sample(normal),
            Err(_) => {
                tracing::debug!(volatility, "invalid volatility for normal draw, using zero shock");
                0.0
            }
        }
    }
}

/// Replays a fixed list of standardized shocks, scaled by the volatility.
///
/// Cycles when exhausted; an empty list always yields zero.
pub struct FixedShocks {
    z_scores: Vec<f64>,
    next: usize,
}

impl FixedShocks {
    pub fn new(z_scores: Vec<f64>) -> Self {
        Self { z_scores, next: 0 }
    }

    /// Zero noise: the path follows mean reversion only
    pub fn zero() -> Self {
        Self::new(Vec::new())
    }

    /// The same standardized shock every day
    pub fn constant(z: f64) -> Self {
        Self::new(vec![z])
    }
}

impl ShockSource for FixedShocks {
    fn draw(&mut self, volatility: f64) -> f64 {
        if self.z_scores.is_empty() {
            return 0.0;
        }
        let z = self.z_scores[self.next % self.z_scores.len()];
        self.next += 1;
        z * volatility
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_shocks_are_reproducible() {
        let mut a = GaussianShocks::seeded(42);
        let mut b = GaussianShocks::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.draw(0.02), b.draw(0.02));
        }
    }

    #[test]
    fn test_gaussian_shocks_scale_with_volatility() {
        let mut shocks = GaussianShocks::seeded(7);
        let draws: Vec<f64> = (0..5000).map(|_| shocks.draw(0.01)).collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let var = draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / draws.len() as f64;
        assert!(mean.abs() < 0.001);
        assert!((var.sqrt() - 0.01).abs() < 0.001);
    }

    #[test]
    fn test_invalid_volatility_yields_zero() {
        let mut shocks = GaussianShocks::seeded(1);
        assert_eq!(shocks.draw(f64::NAN), 0.0);
    }

    #[test]
    fn test_fixed_shocks_cycle() {
        let mut shocks = FixedShocks::new(vec![1.0, -2.0]);
        assert_eq!(shocks.draw(0.01), 0.01);
        assert_eq!(shocks.draw(0.01), -0.02);
        assert_eq!(shocks.draw(0.01), 0.01);
        assert_eq!(FixedShocks::zero().draw(0.05), 0.0);
    }
}
