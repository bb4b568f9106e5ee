//! Deterministic inputs of the projection: volatility, Bollinger Bands and
//! support/resistance. Each is a pure function of the bar series.

use analysis_core::stats::{mean, pct_returns, std_dev, trailing_std_dev};
use analysis_core::Bar;

use crate::config::ProjectionConfig;
use crate::models::{BollingerBands, SupportResistance};

/// One-day return volatility, clamped to `[volatility_floor, volatility_cap]`.
///
/// Uses the sample standard deviation of the last `min(volatility_window, n)`
/// returns. Falls back to `default_volatility` with fewer than `min_returns`
/// returns or when the estimate is not finite.
pub fn volatility(closes: &[f64], config: &ProjectionConfig) -> f64 {
    let returns = pct_returns(closes);
    if returns.len() < config.min_returns {
        return config.default_volatility;
    }

    let window = config.volatility_window.min(returns.len());
    match trailing_std_dev(&returns, window) {
        Some(sd) if sd.is_finite() => sd.clamp(config.volatility_floor, config.volatility_cap),
        _ => config.default_volatility,
    }
}

/// Bollinger Bands over the trailing `band_window` closes.
///
/// `None` when the window is not filled or the middle band is not a positive
/// finite number (it is used as a divisor downstream).
pub fn bollinger_bands(closes: &[f64], config: &ProjectionConfig) -> Option<BollingerBands> {
    let window = config.band_window;
    if window < 2 || closes.len() < window {
        return None;
    }

    let recent = &closes[closes.len() - window..];
    let middle = mean(recent);
    let sd = std_dev(recent);
    if !middle.is_finite() || middle <= 0.0 || !sd.is_finite() {
        return None;
    }

    let upper = middle + config.band_std_devs * sd;
    let lower = middle - config.band_std_devs * sd;

    Some(BollingerBands {
        upper,
        middle,
        lower,
        width_pct: (upper - lower) / middle * 100.0,
    })
}

/// Recent extremes over the trailing `level_window` bars plus round-number
/// levels around the last close.
pub fn support_resistance(bars: &[Bar], config: &ProjectionConfig) -> SupportResistance {
    let current = bars.last().map(|b| b.close).unwrap_or(0.0);
    if config.level_window == 0 || bars.len() < config.level_window {
        return SupportResistance::current_only(current);
    }

    let recent = &bars[bars.len() - config.level_window..];
    let high = recent.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = recent.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

    SupportResistance {
        recent_high: Some(high).filter(|h| h.is_finite() && *h > 0.0),
        recent_low: Some(low).filter(|l| l.is_finite() && *l > 0.0),
        current,
        psychological_levels: psychological_levels(current, config),
    }
}

/// Round-number levels near `price`: the nearest multiple of `level_step`
/// (ties to even) and two steps either side, positive ones only, lowest first,
/// truncated to `max_psychological_levels`.
pub fn psychological_levels(price: f64, config: &ProjectionConfig) -> Vec<f64> {
    let step = config.level_step;
    if !price.is_finite() || price <= 0.0 || step <= 0.0 {
        return Vec::new();
    }

    let base = (price / step).round_ties_even() * step;
    (-2..=2)
        .map(|k| base + k as f64 * step)
        .filter(|level| *level > 0.0)
        .take(config.max_psychological_levels)
        .collect()
}
