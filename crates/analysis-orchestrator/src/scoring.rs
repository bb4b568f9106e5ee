use analysis_core::{FundamentalSummary, Recommendation, TechnicalSummary};
use serde::{Deserialize, Serialize};

/// Combined fundamental and technical points with the resulting label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub fundamental: i32,
    pub technical: i32,
    pub final_score: i32,
    pub label: Recommendation,
}

impl ScoreCard {
    pub fn new(fundamental: &FundamentalSummary, technical: &TechnicalSummary) -> Self {
        let final_score = fundamental.score + technical.raw_score;
        Self {
            fundamental: fundamental.score,
            technical: technical.raw_score,
            final_score,
            label: Recommendation::from_score(final_score),
        }
    }
}
