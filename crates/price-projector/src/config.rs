use analysis_core::AnalysisError;
use serde::{Deserialize, Serialize};
use std::env;

/// Policy knobs of the projection model.
///
/// Defaults are tuned for liquid IDX blue chips, which rarely move more than
/// 3% in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
    // Path simulation
    pub max_daily_change: f64,       // 0.03
    pub mean_reversion_weight: f64,  // 0.3
    pub noise_weight: f64,           // 0.7
    /// Snap threshold around recent extremes
    /// (next > high * (1 + band) bounces to high * (1 - band))
    pub snap_band: f64,              // 0.02

    // Volatility
    pub volatility_window: usize,    // 10
    pub min_returns: usize,          // 5
    pub default_volatility: f64,     // 0.015
    pub volatility_floor: f64,       // 0.005
    pub volatility_cap: f64,         // 0.05

    // Bands and levels
    pub band_window: usize,          // 20
    pub band_std_devs: f64,          // 2.0
    pub level_window: usize,         // 20
    pub level_step: f64,             // 100.0 (round-number spacing)
    pub max_psychological_levels: usize, // 3

    // Trend labels, in percent
    pub sideways_threshold_pct: f64, // 0.5
    pub strong_trend_pct: f64,       // 2.0

    // Confidence
    pub base_confidence: f64,        // 70
    pub min_confidence: f64,         // 30
    pub confidence_decay: f64,       // 0.8

    // Realistic range
    pub range_step: f64,             // 0.015 per horizon day
    pub range_cap: f64,              // 0.05

    // Degraded mode
    /// Series shorter than this only get the ultra-conservative projection
    pub min_bars: usize,             // 10
    pub degraded_ma_window: usize,   // 5
    pub degraded_band: f64,          // 0.02
    pub degraded_step: f64,          // 0.005
    pub degraded_confidence: f64,    // 40
    pub degraded_volatility: f64,    // 0.015
    pub degraded_range: f64,         // 0.03
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            max_daily_change: 0.03,
            mean_reversion_weight: 0.3,
            noise_weight: 0.7,
            snap_band: 0.02,
            volatility_window: 10,
            min_returns: 5,
            default_volatility: 0.015,
            volatility_floor: 0.005,
            volatility_cap: 0.05,
            band_window: 20,
            band_std_devs: 2.0,
            level_window: 20,
            level_step: 100.0,
            max_psychological_levels: 3,
            sideways_threshold_pct: 0.5,
            strong_trend_pct: 2.0,
            base_confidence: 70.0,
            min_confidence: 30.0,
            confidence_decay: 0.8,
            range_step: 0.015,
            range_cap: 0.05,
            min_bars: 10,
            degraded_ma_window: 5,
            degraded_band: 0.02,
            degraded_step: 0.005,
            degraded_confidence: 40.0,
            degraded_volatility: 0.015,
            degraded_range: 0.03,
        }
    }
}

impl ProjectionConfig {
    /// Load overrides from `PROJECTOR_*` environment variables.
    ///
    /// Unset variables keep their defaults; a value that does not parse is an error.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let defaults = Self::default();
        let config = Self {
            max_daily_change: env_or("PROJECTOR_MAX_DAILY_CHANGE", defaults.max_daily_change)?,
            mean_reversion_weight: env_or(
                "PROJECTOR_MEAN_REVERSION_WEIGHT",
                defaults.mean_reversion_weight,
            )?,
            noise_weight: env_or("PROJECTOR_NOISE_WEIGHT", defaults.noise_weight)?,
            confidence_decay: env_or("PROJECTOR_CONFIDENCE_DECAY", defaults.confidence_decay)?,
            base_confidence: env_or("PROJECTOR_BASE_CONFIDENCE", defaults.base_confidence)?,
            min_confidence: env_or("PROJECTOR_MIN_CONFIDENCE", defaults.min_confidence)?,
            min_bars: env_or("PROJECTOR_MIN_BARS", defaults.min_bars)?,
            degraded_band: env_or("PROJECTOR_DEGRADED_BAND", defaults.degraded_band)?,
            degraded_step: env_or("PROJECTOR_DEGRADED_STEP", defaults.degraded_step)?,
            range_step: env_or("PROJECTOR_RANGE_STEP", defaults.range_step)?,
            range_cap: env_or("PROJECTOR_RANGE_CAP", defaults.range_cap)?,
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Variant that keeps series under 30 bars in degraded mode.
    pub fn strict() -> Self {
        Self {
            min_bars: 30,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.max_daily_change > 0.0 && self.max_daily_change < 1.0) {
            return Err(AnalysisError::InvalidData(format!(
                "max_daily_change must be in (0, 1), got {}",
                self.max_daily_change
            )));
        }
        if self.volatility_floor > self.volatility_cap {
            return Err(AnalysisError::InvalidData(
                "volatility_floor exceeds volatility_cap".to_string(),
            ));
        }
        if self.min_confidence > self.base_confidence {
            return Err(AnalysisError::InvalidData(
                "min_confidence exceeds base_confidence".to_string(),
            ));
        }
        if !(self.confidence_decay > 0.0 && self.confidence_decay <= 1.0) {
            return Err(AnalysisError::InvalidData(format!(
                "confidence_decay must be in (0, 1], got {}",
                self.confidence_decay
            )));
        }
        if self.band_window < 2 || self.level_window == 0 || self.degraded_ma_window == 0 {
            return Err(AnalysisError::InvalidData("window sizes must be positive".to_string()));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AnalysisError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| {
                AnalysisError::InvalidData(format!("{} has invalid value '{}'", key, raw))
            }),
        Err(_) => Ok(default),
    }
}
