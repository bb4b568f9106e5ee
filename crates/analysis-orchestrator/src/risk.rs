use analysis_core::{FundamentalSummary, TechnicalSummary};

/// Plain-language risk notes for a scored stock. Never empty.
pub fn risk_disclosures(
    fundamental: &FundamentalSummary,
    technical: &TechnicalSummary,
) -> Vec<String> {
    let mut risks = Vec::new();

    if fundamental.per.is_some_and(|per| per > 25.0) {
        risks.push("Valuation is relatively high (PER above average).".to_string());
    }
    // A zero ROE is treated as unreported
    if fundamental.roe.is_some_and(|roe| roe != 0.0 && roe < 0.10) {
        risks.push("Profitability is weak (ROE below 10%).".to_string());
    }
    if technical.rsi > 70.0 {
        risks.push("Price may be overbought (RSI is high).".to_string());
    }
    if !fundamental.dividend_yield.is_some_and(|dy| dy > 0.0) {
        risks.push("No dividend, or the dividend is insignificant.".to_string());
    }

    if risks.is_empty() {
        risks.push("The main risk comes from overall market conditions.".to_string());
    }
    risks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fundamental(per: Option<f64>, roe: Option<f64>, dy: Option<f64>) -> FundamentalSummary {
        FundamentalSummary {
            per,
            pbv: Some(1.0),
            roe,
            dividend_yield: dy,
            score: 0,
        }
    }

    fn technical(rsi: f64) -> TechnicalSummary {
        TechnicalSummary {
            rsi,
            macd: 0.0,
            raw_score: 0,
            degraded: false,
        }
    }

    #[test]
    fn test_all_risks() {
        let risks = risk_disclosures(&fundamental(Some(40.0), Some(0.05), None), &technical(75.0));
        assert_eq!(risks.len(), 4);
        assert!(risks[0].contains("PER"));
        assert!(risks[1].contains("ROE"));
        assert!(risks[2].contains("RSI"));
        assert!(risks[3].contains("dividend"));
    }

    #[test]
    fn test_generic_market_risk_when_clean() {
        let risks = risk_disclosures(
            &fundamental(Some(10.0), Some(0.2), Some(0.04)),
            &technical(55.0),
        );
        assert_eq!(risks, vec!["The main risk comes from overall market conditions.".to_string()]);
    }

    #[test]
    fn test_missing_values_raise_no_valuation_risk() {
        let risks = risk_disclosures(&fundamental(None, None, Some(0.03)), &technical(50.0));
        assert_eq!(risks.len(), 1);
        assert!(risks[0].contains("market"));
    }
}
