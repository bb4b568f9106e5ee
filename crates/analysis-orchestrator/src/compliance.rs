use serde::{Deserialize, Serialize};

const BASE_DISCLAIMER: &str = "This analysis is generated by an automated system as a \
research aid. It is not an investment recommendation or a solicitation to buy or sell any \
security. Investors are fully responsible for every investment decision they make.";

const SHORT_HORIZON_NOTE: &str = "This analysis is not designed for very short-term trading \
or speculative activity.";

const RETAIL_NOTE: &str = "This information is general and does not consider the objectives, \
risk profile or financial situation of any individual investor.";

const CAPITAL_RISK_NOTE: &str = "Equity investments carry risk, including the loss of part \
or all of the invested capital.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Retail,
    Professional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentHorizon {
    Short,
    #[default]
    Medium,
    Long,
}

/// Audience of a generated report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplianceContext {
    pub user_type: UserType,
    pub horizon: InvestmentHorizon,
}

impl ComplianceContext {
    pub fn disclaimer(&self) -> String {
        let mut parts = vec![BASE_DISCLAIMER];
        if self.horizon == InvestmentHorizon::Short {
            parts.push(SHORT_HORIZON_NOTE);
        }
        if self.user_type == UserType::Retail {
            parts.push(RETAIL_NOTE);
        }
        parts.push(CAPITAL_RISK_NOTE);
        parts.join(" ")
    }
}

/// Fixed notice shown next to a forecast-style output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskNotice {
    pub title: String,
    pub points: Vec<String>,
    pub guidance: Vec<String>,
    pub acceptance_required: bool,
}

pub fn price_projection_notice() -> RiskNotice {
    RiskNotice {
        title: "Price projection risk warning".to_string(),
        points: vec![
            "Not a guarantee: a projection is a probabilistic estimate.".to_string(),
            "Limited accuracy: stock price projections are right 50-60% of the time at best."
                .to_string(),
            "External factors: sudden news, geopolitics and regulator action are not modeled."
                .to_string(),
            "Volatility: the Indonesian market is volatile and hard to forecast.".to_string(),
            "Your responsibility: you own every investment decision.".to_string(),
        ],
        guidance: vec![
            "Use projections as one tool among many".to_string(),
            "Prioritize long-term fundamental analysis".to_string(),
            "Diversify to reduce risk".to_string(),
            "Consult a certified financial adviser".to_string(),
        ],
        acceptance_required: true,
    }
}

pub fn trading_scenario_notice() -> RiskNotice {
    RiskNotice {
        title: "How to read trading scenarios".to_string(),
        points: vec![
            "Probabilities are estimates, not certainties.".to_string(),
            "Always weigh every scenario, not just one.".to_string(),
            "Size positions so a single trade risks at most 1-2% of capital.".to_string(),
            "Wait for technical confirmation before acting.".to_string(),
            "Set take-profit and stop-loss levels before entering.".to_string(),
        ],
        guidance: vec![
            "Capital Rp 100,000,000 with 1% risk per trade is Rp 1,000,000".to_string(),
            "With a 5% stop loss the position size is Rp 20,000,000".to_string(),
        ],
        acceptance_required: false,
    }
}
