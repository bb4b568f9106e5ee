use analysis_core::{FundamentalAnalyzer, FundamentalSummary, Fundamentals};

pub struct FundamentalEngine;

impl FundamentalEngine {
    pub fn new() -> Self {
        Self
    }

    fn score_pe(&self, pe: Option<f64>) -> i32 {
        match pe {
            Some(pe) if pe > 0.0 && pe < 15.0 => 2,
            Some(pe) if pe > 0.0 && pe < 25.0 => 1,
            _ => 0,
        }
    }

    fn score_pbv(&self, pbv: Option<f64>) -> i32 {
        match pbv {
            Some(pbv) if pbv < 2.0 => 2,
            Some(pbv) if pbv < 3.0 => 1,
            _ => 0,
        }
    }

    fn score_roe(&self, roe: Option<f64>) -> i32 {
        match roe {
            Some(roe) if roe > 0.15 => 2,
            Some(roe) if roe > 0.08 => 1,
            _ => 0,
        }
    }

    /// Score valuation and profitability (0 to 6 points).
    ///
    /// Non-finite inputs are treated as missing. A non-positive PER (loss-making
    /// company) earns no valuation points.
    pub fn analyze(&self, fundamentals: &Fundamentals) -> FundamentalSummary {
        let per = finite(fundamentals.trailing_pe);
        let pbv = finite(fundamentals.price_to_book);
        let roe = finite(fundamentals.return_on_equity);

        let score = self.score_pe(per) + self.score_pbv(pbv) + self.score_roe(roe);
        tracing::debug!(?per, ?pbv, ?roe, score, "fundamental score");

        FundamentalSummary {
            per,
            pbv,
            roe,
            dividend_yield: normalize_dividend_yield(fundamentals.dividend_yield),
            score,
        }
    }
}

impl FundamentalAnalyzer for FundamentalEngine {
    fn analyze(&self, fundamentals: &Fundamentals) -> FundamentalSummary {
        FundamentalEngine::analyze(self, fundamentals)
    }
}

impl Default for FundamentalEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Dividend yield as a fraction. Providers report it either as a fraction
/// (0.045) or as a percentage (4.5); anything above 1.0 is read as a percentage.
pub fn normalize_dividend_yield(raw: Option<f64>) -> Option<f64> {
    match finite(raw)? {
        dy if dy > 1.0 => Some(dy / 100.0),
        dy => Some(dy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fundamentals(pe: Option<f64>, pbv: Option<f64>, roe: Option<f64>) -> Fundamentals {
        Fundamentals {
            trailing_pe: pe,
            price_to_book: pbv,
            return_on_equity: roe,
            dividend_yield: None,
        }
    }

    #[test]
    fn test_cheap_profitable_bank_scores_max() {
        let summary =
            FundamentalEngine::new().analyze(&fundamentals(Some(9.5), Some(1.4), Some(0.19)));
        assert_eq!(summary.score, 6);
    }

    #[test]
    fn test_tiered_points() {
        let summary =
            FundamentalEngine::new().analyze(&fundamentals(Some(20.0), Some(2.5), Some(0.10)));
        assert_eq!(summary.score, 3);

        let summary =
            FundamentalEngine::new().analyze(&fundamentals(Some(40.0), Some(5.0), Some(0.05)));
        assert_eq!(summary.score, 0);
    }

    #[test]
    fn test_negative_pe_is_not_cheap() {
        let summary = FundamentalEngine::new().analyze(&fundamentals(Some(-4.0), None, None));
        assert_eq!(summary.score, 0);
        assert_eq!(summary.per, Some(-4.0));
    }

    #[test]
    fn test_missing_values_score_nothing() {
        let summary = FundamentalEngine::new().analyze(&fundamentals(None, Some(f64::NAN), None));
        assert_eq!(summary.score, 0);
        assert!(summary.pbv.is_none());
        assert_eq!(summary.missing_fields(), 3);
    }

    #[test]
    fn test_dividend_yield_normalization() {
        assert_eq!(normalize_dividend_yield(Some(4.5)), Some(0.045));
        assert_eq!(normalize_dividend_yield(Some(0.045)), Some(0.045));
        assert_eq!(normalize_dividend_yield(None), None);
        assert_eq!(normalize_dividend_yield(Some(f64::INFINITY)), None);
    }
}
