use analysis_core::stats::round_to;
use serde::{Deserialize, Serialize};

pub const PROJECTION_DISCLAIMER: &str = "Projection based on historical volatility. \
Actual prices can move differently. For educational use only, not investment advice.";

pub const DEGRADED_DISCLAIMER: &str = "Very conservative projection because price history \
is limited. Not suitable as a basis for investment decisions.";

/// Direction implied by the projected path relative to the current price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "bullish")]
    Bullish,
    #[serde(rename = "slightly bullish")]
    SlightlyBullish,
    #[serde(rename = "sideways")]
    Sideways,
    #[serde(rename = "slightly bearish")]
    SlightlyBearish,
    #[serde(rename = "bearish")]
    Bearish,
}

impl Trend {
    /// Classify a trend percentage.
    ///
    /// `|pct| < sideways` is sideways; beyond `strong` in either direction is a
    /// full bullish/bearish call; everything in between is "slightly".
    pub fn classify(pct: f64, sideways: f64, strong: f64) -> Self {
        if !pct.is_finite() || pct.abs() < sideways {
            Trend::Sideways
        } else if pct > strong {
            Trend::Bullish
        } else if pct > 0.0 {
            Trend::SlightlyBullish
        } else if pct < -strong {
            Trend::Bearish
        } else {
            Trend::SlightlyBearish
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            Trend::Bullish => "bullish",
            Trend::SlightlyBullish => "slightly bullish",
            Trend::Sideways => "sideways",
            Trend::SlightlyBearish => "slightly bearish",
            Trend::Bearish => "bearish",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_low: Option<f64>,
    pub current: f64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub psychological_levels: Vec<f64>,
}

impl SupportResistance {
    /// Levels without recent extremes, used when the window is not filled
    pub fn current_only(current: f64) -> Self {
        Self {
            recent_high: None,
            recent_low: None,
            current,
            psychological_levels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealisticRange {
    pub optimistic: f64,
    pub pessimistic: f64,
    pub most_likely: f64,
}

/// Full output of one projection. Never mutated after it is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub current_price: f64,
    /// One value per horizon day, in order
    pub predictions: Vec<f64>,
    pub next_day_prediction: f64,
    pub trend: Trend,
    pub trend_percentage: f64,
    /// 30 to 70 in normal mode
    pub confidence: f64,
    pub potential_change_pct: f64,
    pub avg_prediction: f64,
    pub volatility_pct: f64,
    pub bollinger_bands: Option<BollingerBands>,
    pub support_resistance: SupportResistance,
    pub realistic_range: RealisticRange,
    pub disclaimer: String,
}

impl PredictionResult {
    /// True when the projection came from the sparse-data fallback
    pub fn is_degraded(&self) -> bool {
        self.bollinger_bands.is_none() && self.support_resistance.recent_high.is_none()
    }

    /// Copy rounded for display: prices and percentages to 2 dp.
    pub fn rounded(&self) -> Self {
        let r2 = |v: f64| round_to(v, 2);
        Self {
            current_price: r2(self.current_price),
            predictions: self.predictions.iter().map(|&p| r2(p)).collect(),
            next_day_prediction: r2(self.next_day_prediction),
            trend: self.trend,
            trend_percentage: r2(self.trend_percentage),
            confidence: round_to(self.confidence, 1),
            potential_change_pct: r2(self.potential_change_pct),
            avg_prediction: r2(self.avg_prediction),
            volatility_pct: r2(self.volatility_pct),
            bollinger_bands: self.bollinger_bands.as_ref().map(|bb| BollingerBands {
                upper: r2(bb.upper),
                middle: r2(bb.middle),
                lower: r2(bb.lower),
                width_pct: r2(bb.width_pct),
            }),
            support_resistance: SupportResistance {
                recent_high: self.support_resistance.recent_high.map(r2),
                recent_low: self.support_resistance.recent_low.map(r2),
                current: r2(self.support_resistance.current),
                psychological_levels: self.support_resistance.psychological_levels.clone(),
            },
            realistic_range: RealisticRange {
                optimistic: r2(self.realistic_range.optimistic),
                pessimistic: r2(self.realistic_range.pessimistic),
                most_likely: r2(self.realistic_range.most_likely),
            },
            disclaimer: self.disclaimer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_bands() {
        assert_eq!(Trend::classify(0.0, 0.5, 2.0), Trend::Sideways);
        assert_eq!(Trend::classify(0.49, 0.5, 2.0), Trend::Sideways);
        assert_eq!(Trend::classify(-0.49, 0.5, 2.0), Trend::Sideways);
        assert_eq!(Trend::classify(0.5, 0.5, 2.0), Trend::SlightlyBullish);
        assert_eq!(Trend::classify(2.0, 0.5, 2.0), Trend::SlightlyBullish);
        assert_eq!(Trend::classify(2.01, 0.5, 2.0), Trend::Bullish);
        assert_eq!(Trend::classify(-2.0, 0.5, 2.0), Trend::SlightlyBearish);
        assert_eq!(Trend::classify(-2.01, 0.5, 2.0), Trend::Bearish);
        assert_eq!(Trend::classify(f64::NAN, 0.5, 2.0), Trend::Sideways);
    }

    #[test]
    fn test_trend_serializes_as_label() {
        let json = serde_json::to_string(&Trend::SlightlyBearish).unwrap();
        assert_eq!(json, "\"slightly bearish\"");
    }
}
