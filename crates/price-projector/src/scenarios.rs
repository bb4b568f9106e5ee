//! Coarse trading scenarios: a bullish, bearish and sideways plan sized by
//! recent volatility instead of a single point forecast.

use analysis_core::stats::round_to;
use analysis_core::{closes, Bar};
use serde::{Deserialize, Serialize};

use crate::config::ProjectionConfig;
use crate::levels::volatility;

/// Bars needed before volatility-sized plans are offered
pub const MIN_SCENARIO_BARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanLevels {
    Directional { target: f64, stop_loss: f64 },
    Range { upper: f64, lower: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPlan {
    pub probability_pct: f64,
    pub description: String,
    /// Trigger condition or strategy for the plan
    pub condition: String,
    pub levels: PlanLevels,
    pub risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConservativeAdvice {
    pub message: String,
    pub recommendation: String,
    pub suggested_action: String,
    pub risk_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TradingScenarios {
    Plans {
        bullish: ScenarioPlan,
        bearish: ScenarioPlan,
        sideways: ScenarioPlan,
    },
    Conservative(ConservativeAdvice),
}

impl TradingScenarios {
    pub fn is_conservative(&self) -> bool {
        matches!(self, TradingScenarios::Conservative(_))
    }
}

/// Build scenarios around the last close.
///
/// Short series only get generic wait-and-see advice.
pub fn trading_scenarios(bars: &[Bar], config: &ProjectionConfig) -> TradingScenarios {
    let closes = closes(bars);
    let price = match closes.last() {
        Some(&p) if bars.len() >= MIN_SCENARIO_BARS && p.is_finite() && p > 0.0 => p,
        _ => return TradingScenarios::Conservative(conservative_advice()),
    };
    let v = volatility(&closes, config);
    let at = |multiple: f64| round_to(price * (1.0 + v * multiple), 2);

    TradingScenarios::Plans {
        bullish: ScenarioPlan {
            probability_pct: 30.0,
            description: "Upside breakout on heavy volume".to_string(),
            condition: "Volume above its 20-day average".to_string(),
            levels: PlanLevels::Directional {
                target: at(3.0),
                stop_loss: at(-2.0),
            },
            risk: "Medium-High".to_string(),
        },
        bearish: ScenarioPlan {
            probability_pct: 25.0,
            description: "Pullback toward support".to_string(),
            condition: "RSI above 70 with a negative MACD".to_string(),
            levels: PlanLevels::Directional {
                target: at(-2.5),
                stop_loss: at(1.5),
            },
            risk: "Medium".to_string(),
        },
        sideways: ScenarioPlan {
            probability_pct: 45.0,
            description: "Consolidation inside a range".to_string(),
            condition: "Range trading".to_string(),
            levels: PlanLevels::Range {
                upper: at(1.5),
                lower: at(-1.5),
            },
            risk: "Low".to_string(),
        },
    }
}

fn conservative_advice() -> ConservativeAdvice {
    ConservativeAdvice {
        message: "Not enough data for a meaningful technical read".to_string(),
        recommendation: "Wait for further confirmation".to_string(),
        suggested_action: "Monitor and wait for a clear setup".to_string(),
        risk_level: "High (uncertain)".to_string(),
    }
}
