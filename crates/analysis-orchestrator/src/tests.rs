use std::sync::Arc;

use analysis_core::{
    AnalysisError, Bar, Fundamentals, Recommendation, StockSnapshot, TechnicalAnalyzer,
    TechnicalSummary,
};
use chrono::{DateTime, Duration, Utc};
use fundamental_analysis::FundamentalEngine;
use price_projector::{PredictionCache, ProjectionConfig, TradingScenarios};

use crate::{
    InMemorySource, InvestmentHorizon, ScreenerEngine, ScreenerFilters, StockAnalyzer,
    ComplianceContext, UserType,
};

fn bars(n: usize, base: f64) -> Vec<Bar> {
    let start = DateTime::parse_from_rfc3339("2024-01-02T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    (0..n)
        .map(|i| {
            let close = base + (i as f64 * 0.45).sin() * base * 0.02 + i as f64 * base * 0.001;
            Bar {
                timestamp: start + Duration::days(i as i64),
                open: close * 0.998,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 5_000_000.0,
            }
        })
        .collect()
}

fn bank_fundamentals() -> Fundamentals {
    Fundamentals {
        trailing_pe: Some(9.0),
        price_to_book: Some(1.2),
        return_on_equity: Some(0.2),
        dividend_yield: Some(5.5),
    }
}

fn pricey_fundamentals() -> Fundamentals {
    Fundamentals {
        trailing_pe: Some(20.0),
        price_to_book: Some(2.5),
        return_on_equity: Some(0.1),
        dividend_yield: None,
    }
}

/// Fixed technical read so screener scores depend on fundamentals only
struct FlatTechnical;

impl TechnicalAnalyzer for FlatTechnical {
    fn analyze(&self, _bars: &[Bar]) -> TechnicalSummary {
        TechnicalSummary {
            rsi: 45.0,
            macd: -0.5,
            raw_score: 1,
            degraded: false,
        }
    }
}

fn stub_analyzer() -> StockAnalyzer {
    StockAnalyzer::default()
        .with_engines(Box::new(FlatTechnical), Box::new(FundamentalEngine::new()))
}

#[test]
fn test_analyze_full_snapshot() {
    let snapshot =
        StockSnapshot::new("bbca", bars(60, 9_000.0)).with_fundamentals(bank_fundamentals());
    let report = StockAnalyzer::default().analyze(&snapshot).unwrap();

    assert_eq!(report.ticker, "BBCA.JK");
    assert_eq!(report.score.fundamental, 6);
    assert_eq!(report.score.final_score, report.score.fundamental + report.score.technical);
    assert_eq!(report.score.label, Recommendation::from_score(report.score.final_score));
    assert_eq!(report.fundamental.dividend_yield, Some(0.055));
    assert_eq!(report.projection.predictions.len(), 5);
    assert_eq!(report.stress_scenarios.len(), 4);
    assert!((10..=100).contains(&report.confidence));
    assert!((10..=100).contains(&report.resilience_score));
    assert!(!report.risks.is_empty());
    assert!(report.explanation.text.starts_with("BBCA.JK - "));
    assert!(matches!(report.trading_scenarios, TradingScenarios::Plans { .. }));
    assert!(!report.projection_cached);
}

#[test]
fn test_analyze_uses_live_price() {
    let snapshot = StockSnapshot::new("TLKM", bars(40, 3_000.0)).with_current_price(3_150.0);
    let report = StockAnalyzer::default().analyze(&snapshot).unwrap();
    assert_eq!(report.projection.current_price, 3_150.0);

    let snapshot = StockSnapshot::new("TLKM", bars(40, 3_000.0));
    let last = snapshot.last_close().unwrap();
    let report = StockAnalyzer::default().analyze(&snapshot).unwrap();
    assert_eq!(report.projection.current_price, last);
}

#[test]
fn test_analyze_rejects_unusable_snapshots() {
    let empty = StockSnapshot::new("BBRI", Vec::new());
    assert!(matches!(
        StockAnalyzer::default().analyze(&empty),
        Err(AnalysisError::InsufficientData(_))
    ));

    let unnamed = StockSnapshot::new("  ", bars(30, 1_000.0));
    assert!(matches!(
        StockAnalyzer::default().analyze(&unnamed),
        Err(AnalysisError::InvalidData(_))
    ));
}

#[test]
fn test_short_history_still_reports() {
    let snapshot = StockSnapshot::new("GOTO", bars(8, 80.0));
    let report = StockAnalyzer::default().analyze(&snapshot).unwrap();

    assert!(report.technical.degraded);
    assert!(report.projection.is_degraded());
    assert_eq!(report.projection.confidence, 40.0);
    assert!(report.trading_scenarios.is_conservative());
}

#[test]
fn test_horizon_and_compliance_settings() {
    let analyzer = StockAnalyzer::new(ProjectionConfig::default())
        .with_horizon(3)
        .with_compliance(ComplianceContext {
            user_type: UserType::Professional,
            horizon: InvestmentHorizon::Short,
        });
    let snapshot = StockSnapshot::new("ASII", bars(50, 5_000.0));
    let report = analyzer.analyze(&snapshot).unwrap();

    assert_eq!(report.projection.predictions.len(), 3);
    assert_eq!(report.projection.confidence, 44.8);
    assert!(report.disclaimer.contains("very short-term"));
    assert!(!report.disclaimer.contains("individual investor"));
}

#[test]
fn test_cached_projection_is_reused() {
    let cache = Arc::new(PredictionCache::new(60));
    let analyzer = StockAnalyzer::default().with_cache(Arc::clone(&cache));
    let snapshot = StockSnapshot::new("BMRI", bars(45, 6_000.0));

    let first = analyzer.analyze(&snapshot).unwrap();
    let second = analyzer.analyze(&snapshot).unwrap();

    assert!(!first.projection_cached);
    assert!(second.projection_cached);
    assert_eq!(first.projection.predictions, second.projection.predictions);
    assert_eq!(cache.len(), 1);
}

fn source() -> Arc<InMemorySource> {
    let mut source = InMemorySource::new();
    source
        .insert(
            StockSnapshot::new("BBRI", bars(40, 4_500.0)).with_fundamentals(bank_fundamentals()),
        )
        .unwrap();
    source
        .insert(
            StockSnapshot::new("UNVR", bars(40, 2_500.0)).with_fundamentals(pricey_fundamentals()),
        )
        .unwrap();
    source.insert(StockSnapshot::new("ANTM", bars(40, 1_500.0))).unwrap();
    Arc::new(source)
}

fn tickers() -> Vec<String> {
    ["UNVR", "MISSING", "BBRI", "ANTM"].iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_screen_sorts_and_reports_failures() {
    let screener = ScreenerEngine::new(Arc::new(stub_analyzer()), source());
    let result = screener.screen(&tickers(), &ScreenerFilters::default());

    assert_eq!(result.total_analyzed, 4);
    assert_eq!(result.total_failed, 1);

    let order: Vec<&str> = result.rows.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(order, vec!["BBRI.JK", "UNVR.JK", "ANTM.JK", "MISSING"]);

    let scores: Vec<i32> = result.rows.iter().map(|r| r.final_score).collect();
    assert_eq!(scores, vec![7, 4, 1, 0]);

    let failed = &result.rows[3];
    assert_eq!(failed.label, Recommendation::Error);
    assert!(failed.error.as_deref().unwrap_or_default().contains("MISSING"));
}

#[test]
fn test_parallel_screen_matches_sequential() {
    let screener = ScreenerEngine::new(Arc::new(stub_analyzer()), source());
    let filters = ScreenerFilters::default();

    let sequential = screener.screen(&tickers(), &filters);
    let parallel = screener.screen_parallel(&tickers(), &filters, 3).unwrap();

    let key = |rows: &[crate::ScreenerRow]| -> Vec<(String, i32)> {
        rows.iter().map(|r| (r.ticker.clone(), r.final_score)).collect()
    };
    assert_eq!(key(&sequential.rows), key(&parallel.rows));
    assert_eq!(parallel.total_failed, 1);
}

#[test]
fn test_screen_filters() {
    let screener = ScreenerEngine::new(Arc::new(stub_analyzer()), source());

    let filters = ScreenerFilters {
        min_score: Some(4),
        limit: None,
        include_errors: false,
    };
    let result = screener.screen(&tickers(), &filters);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.total_failed, 1);

    let filters = ScreenerFilters {
        min_score: None,
        limit: Some(1),
        include_errors: true,
    };
    let result = screener.screen_parallel(&tickers(), &filters, 1).unwrap();
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].ticker, "BBRI.JK");
    assert_eq!(result.rows[0].label, Recommendation::StrongBuy);
}

#[test]
fn test_rows_serialize_labels() {
    let screener = ScreenerEngine::new(Arc::new(stub_analyzer()), source());
    let result = screener.screen(&tickers(), &ScreenerFilters::default());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["rows"][0]["label"], "STRONG BUY");
    assert_eq!(json["rows"][3]["label"], "ERROR");
    assert!(json["rows"][0].get("error").is_none());
}
