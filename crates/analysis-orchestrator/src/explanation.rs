use analysis_core::{AnalysisError, FundamentalSummary, Recommendation, TechnicalSummary};
use serde::{Deserialize, Serialize};

use crate::scoring::ScoreCard;

/// Rewrites a rule-based explanation into friendlier prose, e.g. through a
/// language model. Failures fall back to the rule text.
pub trait Narrator: Send + Sync {
    fn narrate(&self, rule_text: &str) -> Result<String, AnalysisError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub rule_based: String,
    pub narrated: Option<String>,
    /// Narrated text when available, otherwise the rule text
    pub text: String,
}

/// Deterministic explanation built from the scores.
///
/// Paragraphs (headline, score, fundamentals, technicals, dividend,
/// conclusion) are separated by blank lines; sections with no data are left out.
pub fn rule_explanation(
    ticker: &str,
    card: &ScoreCard,
    fundamental: &FundamentalSummary,
    technical: &TechnicalSummary,
) -> String {
    let mut lines = vec![
        format!("{} - {}", ticker, card.label),
        format!("Overall score: {}", card.final_score),
    ];

    let mut fund_notes = Vec::new();
    if let Some(per) = fundamental.per {
        fund_notes.push(if per < 15.0 {
            "PER valuation looks cheap"
        } else {
            "PER is relatively high"
        });
    }
    if let Some(pbv) = fundamental.pbv {
        fund_notes.push(if pbv < 2.0 {
            "PBV is still attractive"
        } else {
            "PBV is fairly expensive"
        });
    }
    if let Some(roe) = fundamental.roe {
        fund_notes.push(if roe > 0.15 {
            "strong ROE points to efficient management"
        } else {
            "ROE is on the low side"
        });
    }
    if !fund_notes.is_empty() {
        lines.push(format!("Fundamentals: {}.", fund_notes.join(", ")));
    }

    let mut tech_notes = vec![if technical.rsi < 30.0 {
        "RSI oversold (rebound potential)"
    } else if technical.rsi < 50.0 {
        "RSI neutral"
    } else {
        "RSI approaching overbought"
    }];
    if technical.macd > 0.0 {
        tech_notes.push("positive MACD momentum");
    }
    lines.push(format!("Technicals: {}.", tech_notes.join(", ")));

    if let Some(dy) = fundamental.dividend_yield.filter(|dy| *dy > 0.0) {
        lines.push(format!("Dividend: yield of about {:.2}%.", dy * 100.0));
    }

    lines.push(
        match card.label {
            Recommendation::StrongBuy | Recommendation::Buy => {
                "Worth watching for gradual accumulation, especially for medium to long-term \
                 investors."
            }
            Recommendation::Hold => "Better monitored while waiting for further confirmation.",
            _ => "Risk is relatively high; not recommended for now.",
        }
        .to_string(),
    );

    lines.join("\n\n")
}

/// Rule-based explanation, optionally rewritten by a [`Narrator`]
#[derive(Default)]
pub struct HybridExplainer {
    narrator: Option<Box<dyn Narrator>>,
}

impl HybridExplainer {
    pub fn new() -> Self {
        Self { narrator: None }
    }

    pub fn with_narrator(narrator: Box<dyn Narrator>) -> Self {
        Self {
            narrator: Some(narrator),
        }
    }

    pub fn explain(
        &self,
        ticker: &str,
        card: &ScoreCard,
        fundamental: &FundamentalSummary,
        technical: &TechnicalSummary,
    ) -> Explanation {
        let rule_based = rule_explanation(ticker, card, fundamental, technical);

        let narrated = self.narrator.as_ref().and_then(|narrator| {
            match narrator.narrate(&rule_based) {
                Ok(text) if !text.trim().is_empty() => Some(text),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Narration failed for {}: {}", ticker, e);
                    None
                }
            }
        });

        Explanation {
            text: narrated.clone().unwrap_or_else(|| rule_based.clone()),
            rule_based,
            narrated,
        }
    }
}
