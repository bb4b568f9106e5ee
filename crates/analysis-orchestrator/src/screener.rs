use std::collections::HashMap;
use std::sync::Arc;

use analysis_core::{normalize_ticker, AnalysisError, Recommendation, StockSnapshot};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analyzer::{StockAnalyzer, StockReport};

pub const DEFAULT_WORKERS: usize = 3;

/// Supplies snapshots to the screener by ticker
pub trait SnapshotSource: Send + Sync {
    fn snapshot(&self, ticker: &str) -> Result<StockSnapshot, AnalysisError>;
}

/// Snapshots held in memory, keyed by normalized ticker
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    snapshots: HashMap<String, StockSnapshot>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, snapshot: StockSnapshot) -> Result<(), AnalysisError> {
        let ticker = normalize_ticker(&snapshot.symbol)?;
        self.snapshots.insert(ticker, snapshot);
        Ok(())
    }
}

impl SnapshotSource for InMemorySource {
    fn snapshot(&self, ticker: &str) -> Result<StockSnapshot, AnalysisError> {
        let ticker = normalize_ticker(ticker)?;
        self.snapshots
            .get(&ticker)
            .cloned()
            .ok_or_else(|| AnalysisError::DataSource(format!("no data for {}", ticker)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerRow {
    pub ticker: String,
    pub final_score: i32,
    pub label: Recommendation,
    pub confidence: i32,
    pub per: Option<f64>,
    pub pbv: Option<f64>,
    pub roe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub rsi: Option<f64>,
    pub resilience_score: i32,
    pub next_day_prediction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScreenerRow {
    fn from_report(report: &StockReport) -> Self {
        Self {
            ticker: report.ticker.clone(),
            final_score: report.score.final_score,
            label: report.score.label,
            confidence: report.confidence,
            per: report.fundamental.per,
            pbv: report.fundamental.pbv,
            roe: report.fundamental.roe,
            dividend_yield: report.fundamental.dividend_yield,
            rsi: Some(report.technical.rsi),
            resilience_score: report.resilience_score,
            next_day_prediction: Some(report.projection.next_day_prediction),
            error: None,
        }
    }

    fn failed(ticker: &str, error: &AnalysisError) -> Self {
        Self {
            ticker: ticker.to_string(),
            final_score: 0,
            label: Recommendation::Error,
            confidence: 0,
            per: None,
            pbv: None,
            roe: None,
            dividend_yield: None,
            rsi: None,
            resilience_score: 0,
            next_day_prediction: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerResult {
    pub rows: Vec<ScreenerRow>,
    pub total_analyzed: usize,
    pub total_failed: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct ScreenerFilters {
    pub min_score: Option<i32>,
    pub limit: Option<usize>,
    pub include_errors: bool,
}

impl Default for ScreenerFilters {
    fn default() -> Self {
        Self {
            min_score: None,
            limit: None,
            include_errors: true,
        }
    }
}

/// Batch analysis over a ticker list
pub struct ScreenerEngine {
    analyzer: Arc<StockAnalyzer>,
    source: Arc<dyn SnapshotSource>,
}

impl ScreenerEngine {
    pub fn new(analyzer: Arc<StockAnalyzer>, source: Arc<dyn SnapshotSource>) -> Self {
        Self { analyzer, source }
    }

    /// Analyze tickers one after another
    pub fn screen(&self, tickers: &[String], filters: &ScreenerFilters) -> ScreenerResult {
        tracing::info!("Starting sequential screen of {} tickers", tickers.len());
        let rows: Vec<ScreenerRow> = tickers.iter().map(|t| self.analyze_one(t)).collect();
        self.finish(rows, tickers.len(), filters)
    }

    /// Analyze tickers on a dedicated pool of `workers` threads
    pub fn screen_parallel(
        &self,
        tickers: &[String],
        filters: &ScreenerFilters,
        workers: usize,
    ) -> Result<ScreenerResult, AnalysisError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("screener-{}", i))
            .build()
            .map_err(|e| AnalysisError::Unknown(format!("failed to build screener pool: {}", e)))?;

        tracing::info!(
            "Starting parallel screen of {} tickers on {} workers",
            tickers.len(),
            workers.max(1)
        );
        let rows: Vec<ScreenerRow> =
            pool.install(|| tickers.par_iter().map(|t| self.analyze_one(t)).collect());
        Ok(self.finish(rows, tickers.len(), filters))
    }

    fn analyze_one(&self, ticker: &str) -> ScreenerRow {
        let result = self
            .source
            .snapshot(ticker)
            .and_then(|snapshot| self.analyzer.analyze(&snapshot));

        match result {
            Ok(report) => ScreenerRow::from_report(&report),
            Err(e) => {
                tracing::warn!("Failed to analyze {}: {}", ticker, e);
                ScreenerRow::failed(ticker, &e)
            }
        }
    }

    fn finish(
        &self,
        mut rows: Vec<ScreenerRow>,
        total_analyzed: usize,
        filters: &ScreenerFilters,
    ) -> ScreenerResult {
        let total_failed = rows.iter().filter(|r| r.is_error()).count();

        rows.retain(|row| {
            if row.is_error() {
                return filters.include_errors;
            }
            filters.min_score.map_or(true, |min| row.final_score >= min)
        });

        // Highest score first, failures last
        rows.sort_by(|a, b| {
            a.is_error()
                .cmp(&b.is_error())
                .then_with(|| b.final_score.cmp(&a.final_score))
        });

        if let Some(limit) = filters.limit {
            rows.truncate(limit);
        }

        tracing::info!(
            "Screen complete: {}/{} tickers analyzed, {} failed, returning {}",
            total_analyzed - total_failed,
            total_analyzed,
            total_failed,
            rows.len()
        );

        ScreenerResult {
            rows,
            total_analyzed,
            total_failed,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Worker count from `SCREENER_WORKERS` (default 3)
pub fn workers_from_env() -> Result<usize, AnalysisError> {
    match std::env::var("SCREENER_WORKERS") {
        Ok(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(AnalysisError::InvalidData(format!(
                "SCREENER_WORKERS has invalid value '{}'",
                raw
            ))),
        },
        Err(_) => Ok(DEFAULT_WORKERS),
    }
}
