//! Rule-based stress scenarios and the resilience score derived from them.

use analysis_core::{FundamentalSummary, TechnicalSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressKind {
    #[serde(rename = "Market Crash")]
    MarketCrash,
    #[serde(rename = "Bull Market")]
    BullMarket,
    #[serde(rename = "Rate Hike")]
    RateHike,
    #[serde(rename = "Earnings Shock")]
    EarningsShock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    pub kind: StressKind,
    /// Score points gained or lost under the scenario
    pub impact: i32,
    pub comment: String,
}

pub fn stress_scenarios(
    fundamental: &FundamentalSummary,
    technical: &TechnicalSummary,
) -> Vec<StressScenario> {
    let tech = technical.raw_score;

    let rate_impact = if fundamental.pbv.is_some_and(|pbv| pbv > 3.0) { -2 } else { -1 };
    let earnings_impact = match fundamental.roe {
        Some(roe) if roe >= 0.10 => -1,
        _ => -2,
    };

    vec![
        StressScenario {
            kind: StressKind::MarketCrash,
            impact: -tech.max(1),
            comment: "Heavy selling pressure; consumer staples tend to hold up better.".to_string(),
        },
        StressScenario {
            kind: StressKind::BullMarket,
            impact: tech + 1,
            comment: "Positive momentum may reinforce the trend.".to_string(),
        },
        StressScenario {
            kind: StressKind::RateHike,
            impact: rate_impact,
            comment: "Higher rates compress valuations.".to_string(),
        },
        StressScenario {
            kind: StressKind::EarningsShock,
            impact: earnings_impact,
            comment: "Falling earnings weigh on sentiment.".to_string(),
        },
    ]
}

/// 70 plus 5 points per unit of total impact, clamped to 10..=100
pub fn resilience_score(scenarios: &[StressScenario]) -> i32 {
    let total: i32 = scenarios.iter().map(|s| s.impact).sum();
    (70 + total * 5).clamp(10, 100)
}
