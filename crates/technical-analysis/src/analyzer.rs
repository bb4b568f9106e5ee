use analysis_core::stats::round_to;
use analysis_core::{Bar, TechnicalAnalyzer, TechnicalSummary};

use crate::indicators::*;

/// Minimum number of bars before RSI/MACD are considered meaningful
pub const MIN_BARS: usize = 20;

const RSI_PERIOD: usize = 14;

/// Scores momentum from RSI(14) and the MACD(12, 26, 9) histogram.
///
/// Points: RSI < 30 gives 2, RSI < 50 gives 1; a positive histogram gives 2.
pub struct TechnicalEngine;

impl TechnicalEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(&self, bars: &[Bar]) -> TechnicalSummary {
        if bars.len() < MIN_BARS {
            tracing::debug!("Only {} bars, using neutral technical summary", bars.len());
            return TechnicalSummary::neutral();
        }

        let closes: Vec<f64> = bars
            .iter()
            .map(|b| b.close)
            .filter(|c| c.is_finite())
            .collect();
        if closes.len() < MIN_BARS {
            tracing::debug!("Too few finite closes, using neutral technical summary");
            return TechnicalSummary::neutral();
        }

        let rsi_value = rsi(&closes, RSI_PERIOD).last().copied().unwrap_or(50.0);
        let macd_value = macd(&closes, 12, 26, 9).histogram.last().copied().unwrap_or(0.0);

        let mut score = 0;
        if rsi_value < 30.0 {
            score += 2;
        } else if rsi_value < 50.0 {
            score += 1;
        }
        if macd_value > 0.0 {
            score += 2;
        }

        TechnicalSummary {
            rsi: round_to(rsi_value, 2),
            macd: round_to(macd_value, 4),
            raw_score: score,
            degraded: false,
        }
    }
}

impl TechnicalAnalyzer for TechnicalEngine {
    fn analyze(&self, bars: &[Bar]) -> TechnicalSummary {
        self.calculate(bars)
    }
}

impl Default for TechnicalEngine {
    fn default() -> Self {
        Self::new()
    }
}
