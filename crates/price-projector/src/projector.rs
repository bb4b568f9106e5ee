use analysis_core::stats::{mean, median, round_to, trailing_mean};
use analysis_core::{closes, Bar};

use crate::config::ProjectionConfig;
use crate::levels::{bollinger_bands, support_resistance, volatility};
use crate::models::{
    PredictionResult, RealisticRange, SupportResistance, Trend, DEGRADED_DISCLAIMER,
    PROJECTION_DISCLAIMER,
};
use crate::shocks::{GaussianShocks, ShockSource};

/// Volatility-capped random walk with mean reversion toward the Bollinger
/// middle band.
///
/// `project` never fails: short series, empty series and non-positive prices
/// all produce a flat low-confidence projection instead of an error.
#[derive(Debug, Clone, Default)]
pub struct PriceProjector {
    config: ProjectionConfig,
}

impl PriceProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project `horizon` days ahead with entropy-seeded noise.
    pub fn project(&self, bars: &[Bar], current_price: f64, horizon: usize) -> PredictionResult {
        let mut shocks = GaussianShocks::from_entropy();
        self.project_with(bars, current_price, horizon, &mut shocks)
    }

    /// Project with an injected noise source.
    ///
    /// A `horizon` of 0 is treated as 1. A non-positive or non-finite
    /// `current_price` falls back to the last close.
    pub fn project_with<S: ShockSource + ?Sized>(
        &self,
        bars: &[Bar],
        current_price: f64,
        horizon: usize,
        shocks: &mut S,
    ) -> PredictionResult {
        let horizon = horizon.max(1);
        let closes = closes(bars);
        let current_price = resolve_current_price(current_price, &closes);

        if bars.len() < self.config.min_bars || current_price <= 0.0 {
            tracing::debug!(
                bars = bars.len(),
                current_price,
                min_bars = self.config.min_bars,
                "not enough data, using degraded projection"
            );
            return self.degraded(&closes, current_price, horizon);
        }

        let cfg = &self.config;
        let vol = volatility(&closes, cfg);
        let bands = bollinger_bands(&closes, cfg);
        let levels = support_resistance(bars, cfg);

        let mut path = Vec::with_capacity(horizon);
        let mut last = current_price;
        for _ in 0..horizon {
            let reversion = match &bands {
                Some(bb) => cfg.mean_reversion_weight * (bb.middle - last) / bb.middle,
                None => 0.0,
            };
            let reversion = if reversion.is_finite() { reversion } else { 0.0 };
            let noise = cfg.noise_weight * shocks.draw(vol);
            let noise = if noise.is_finite() { noise } else { 0.0 };

            let change = (reversion + noise).clamp(-cfg.max_daily_change, cfg.max_daily_change);
            let next = snap_to_levels(last * (1.0 + change), &levels, cfg.snap_band);
            let next = if next.is_finite() { next } else { last };

            path.push(next);
            last = next;
        }

        let avg = mean(&path);
        let trend_pct = (avg - current_price) / current_price * 100.0;
        let next_day = path[0];

        let confidence = (cfg.base_confidence * cfg.confidence_decay.powi(horizon as i32 - 1))
            .max(cfg.min_confidence);
        let range = (horizon as f64 * cfg.range_step).min(cfg.range_cap);

        tracing::debug!(
            horizon,
            volatility = vol,
            trend_pct,
            banded = bands.is_some(),
            "projection complete"
        );

        PredictionResult {
            current_price,
            next_day_prediction: next_day,
            trend: Trend::classify(trend_pct, cfg.sideways_threshold_pct, cfg.strong_trend_pct),
            trend_percentage: trend_pct,
            confidence: round_to(confidence, 1),
            potential_change_pct: (next_day - current_price) / current_price * 100.0,
            avg_prediction: avg,
            volatility_pct: vol * 100.0,
            bollinger_bands: bands,
            support_resistance: levels,
            realistic_range: RealisticRange {
                optimistic: current_price * (1.0 + range),
                pessimistic: current_price * (1.0 - range),
                most_likely: median(&path),
            },
            predictions: path,
            disclaimer: PROJECTION_DISCLAIMER.to_string(),
        }
    }

    /// Flat projection from a short moving average: a small correction when
    /// the price is stretched above it, a small rebound when below, else no
    /// change.
    fn degraded(&self, closes: &[f64], current_price: f64, horizon: usize) -> PredictionResult {
        let cfg = &self.config;

        if current_price <= 0.0 {
            return PredictionResult {
                current_price: 0.0,
                predictions: vec![0.0; horizon],
                next_day_prediction: 0.0,
                trend: Trend::Sideways,
                trend_percentage: 0.0,
                confidence: cfg.degraded_confidence,
                potential_change_pct: 0.0,
                avg_prediction: 0.0,
                volatility_pct: cfg.degraded_volatility * 100.0,
                bollinger_bands: None,
                support_resistance: SupportResistance::current_only(0.0),
                realistic_range: RealisticRange {
                    optimistic: 0.0,
                    pessimistic: 0.0,
                    most_likely: 0.0,
                },
                disclaimer: DEGRADED_DISCLAIMER.to_string(),
            };
        }

        // Fewer closes than the window means no average and no step
        let average = trailing_mean(closes, cfg.degraded_ma_window)
            .filter(|ma| ma.is_finite() && *ma > 0.0);
        let step = match average {
            Some(ma) if current_price > ma * (1.0 + cfg.degraded_band) => -cfg.degraded_step,
            Some(ma) if current_price < ma * (1.0 - cfg.degraded_band) => cfg.degraded_step,
            _ => 0.0,
        };

        let next = current_price * (1.0 + step);
        let change_pct = step * 100.0;

        PredictionResult {
            current_price,
            predictions: vec![next; horizon],
            next_day_prediction: next,
            trend: Trend::classify(change_pct, cfg.sideways_threshold_pct, cfg.strong_trend_pct),
            trend_percentage: change_pct,
            confidence: cfg.degraded_confidence,
            potential_change_pct: change_pct,
            avg_prediction: next,
            volatility_pct: cfg.degraded_volatility * 100.0,
            bollinger_bands: None,
            support_resistance: SupportResistance::current_only(current_price),
            realistic_range: RealisticRange {
                optimistic: current_price * (1.0 + cfg.degraded_range),
                pessimistic: current_price * (1.0 - cfg.degraded_range),
                most_likely: next,
            },
            disclaimer: DEGRADED_DISCLAIMER.to_string(),
        }
    }
}

/// Live price if usable, else the last close, else 0.
fn resolve_current_price(current_price: f64, closes: &[f64]) -> f64 {
    if current_price.is_finite() && current_price > 0.0 {
        return current_price;
    }
    match closes.last() {
        Some(&close) if close.is_finite() && close > 0.0 => close,
        _ => 0.0,
    }
}

/// Bounce a projected price back inside the recent range once it overshoots
/// a known extreme by more than `band`.
fn snap_to_levels(next: f64, levels: &SupportResistance, band: f64) -> f64 {
    if let Some(high) = levels.recent_high {
        if next > high * (1.0 + band) {
            return high * (1.0 - band);
        }
    }
    if let Some(low) = levels.recent_low {
        if next < low * (1.0 - band) {
            return low * (1.0 + band);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(high: Option<f64>, low: Option<f64>) -> SupportResistance {
        SupportResistance {
            recent_high: high,
            recent_low: low,
            current: 1000.0,
            psychological_levels: Vec::new(),
        }
    }

    #[test]
    fn test_snap_to_levels() {
        let sr = levels(Some(1000.0), Some(900.0));
        assert_eq!(snap_to_levels(1030.0, &sr, 0.02), 1000.0 * 0.98);
        assert_eq!(snap_to_levels(870.0, &sr, 0.02), 900.0 * 1.02);
        assert_eq!(snap_to_levels(1015.0, &sr, 0.02), 1015.0);
        assert_eq!(snap_to_levels(1030.0, &levels(None, None), 0.02), 1030.0);
    }

    #[test]
    fn test_resolve_current_price_fallbacks() {
        assert_eq!(resolve_current_price(1250.0, &[1200.0]), 1250.0);
        assert_eq!(resolve_current_price(0.0, &[1200.0]), 1200.0);
        assert_eq!(resolve_current_price(f64::NAN, &[1200.0]), 1200.0);
        assert_eq!(resolve_current_price(-5.0, &[]), 0.0);
    }
}
