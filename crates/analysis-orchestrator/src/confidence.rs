use analysis_core::{FundamentalSummary, TechnicalSummary};

use crate::scoring::ScoreCard;

const BASELINE: i32 = 30;
const MISSING_PENALTY: i32 = 5;

/// Signal-quality confidence (10 to 100) for a scored stock.
///
/// Strong scores, a high ROE and positive MACD momentum raise it; every
/// missing valuation field lowers it. A neutral technical read from a short
/// history still carries an RSI, so it is not penalized.
pub fn confidence_score(
    card: &ScoreCard,
    fundamental: &FundamentalSummary,
    technical: &TechnicalSummary,
) -> i32 {
    let mut confidence = BASELINE;

    confidence += match card.final_score {
        s if s >= 7 => 35,
        s if s >= 5 => 25,
        s if s >= 3 => 15,
        _ => 0,
    };

    if fundamental.roe.is_some_and(|roe| roe > 0.15) {
        confidence += 10;
    }
    if technical.macd > 0.0 {
        confidence += 10;
    }

    confidence -= fundamental.missing_fields() as i32 * MISSING_PENALTY;

    confidence.clamp(10, 100)
}
