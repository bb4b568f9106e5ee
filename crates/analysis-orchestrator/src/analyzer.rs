use std::sync::Arc;

use analysis_core::{
    normalize_ticker, AnalysisError, FundamentalAnalyzer, FundamentalSummary, StockSnapshot,
    TechnicalAnalyzer, TechnicalSummary,
};
use chrono::{DateTime, Utc};
use fundamental_analysis::FundamentalEngine;
use price_projector::{
    trading_scenarios, PredictionCache, PredictionResult, PriceProjector, ProjectionConfig,
    TradingScenarios,
};
use serde::Serialize;
use technical_analysis::TechnicalEngine;

use crate::compliance::ComplianceContext;
use crate::confidence::confidence_score;
use crate::explanation::{Explanation, HybridExplainer, Narrator};
use crate::risk::risk_disclosures;
use crate::scoring::ScoreCard;
use crate::stress::{resilience_score, stress_scenarios, StressScenario};

pub const DEFAULT_HORIZON_DAYS: usize = 5;

/// Everything known about one ticker after a full analysis pass
#[derive(Debug, Clone, Serialize)]
pub struct StockReport {
    pub ticker: String,
    pub score: ScoreCard,
    pub technical: TechnicalSummary,
    pub fundamental: FundamentalSummary,
    pub explanation: Explanation,
    pub confidence: i32,
    pub risks: Vec<String>,
    pub stress_scenarios: Vec<StressScenario>,
    pub resilience_score: i32,
    pub disclaimer: String,
    pub projection: PredictionResult,
    pub projection_cached: bool,
    pub trading_scenarios: TradingScenarios,
    pub analyzed_at: DateTime<Utc>,
}

/// Runs every engine over a [`StockSnapshot`].
pub struct StockAnalyzer {
    technical: Box<dyn TechnicalAnalyzer>,
    fundamental: Box<dyn FundamentalAnalyzer>,
    projector: PriceProjector,
    explainer: HybridExplainer,
    cache: Option<Arc<PredictionCache>>,
    compliance: ComplianceContext,
    horizon: usize,
}

impl StockAnalyzer {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            technical: Box::new(TechnicalEngine::new()),
            fundamental: Box::new(FundamentalEngine::new()),
            projector: PriceProjector::new(config),
            explainer: HybridExplainer::new(),
            cache: None,
            compliance: ComplianceContext::default(),
            horizon: DEFAULT_HORIZON_DAYS,
        }
    }

    pub fn with_horizon(mut self, days: usize) -> Self {
        self.horizon = days.max(1);
        self
    }

    pub fn with_cache(mut self, cache: Arc<PredictionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_narrator(mut self, narrator: Box<dyn Narrator>) -> Self {
        self.explainer = HybridExplainer::with_narrator(narrator);
        self
    }

    pub fn with_compliance(mut self, context: ComplianceContext) -> Self {
        self.compliance = context;
        self
    }

    pub fn with_engines(
        mut self,
        technical: Box<dyn TechnicalAnalyzer>,
        fundamental: Box<dyn FundamentalAnalyzer>,
    ) -> Self {
        self.technical = technical;
        self.fundamental = fundamental;
        self
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn analyze(&self, snapshot: &StockSnapshot) -> Result<StockReport, AnalysisError> {
        let ticker = normalize_ticker(&snapshot.symbol)?;
        if snapshot.bars.is_empty() {
            return Err(AnalysisError::InsufficientData(format!("no price history for {}", ticker)));
        }

        let technical = self.technical.analyze(&snapshot.bars);
        let fundamental = self.fundamental.analyze(&snapshot.fundamentals);
        let score = ScoreCard::new(&fundamental, &technical);

        let explanation = self.explainer.explain(&ticker, &score, &fundamental, &technical);
        let confidence = confidence_score(&score, &fundamental, &technical);
        let risks = risk_disclosures(&fundamental, &technical);
        let scenarios = stress_scenarios(&fundamental, &technical);
        let resilience = resilience_score(&scenarios);

        let current_price = snapshot.current_price.unwrap_or(0.0);
        let (projection, projection_cached) = match &self.cache {
            Some(cache) => {
                let cached = cache.get_or_project(
                    &self.projector,
                    &ticker,
                    &snapshot.bars,
                    current_price,
                    self.horizon,
                )?;
                (cached.result.as_ref().clone(), cached.cache_used)
            }
            None => (self.projector.project(&snapshot.bars, current_price, self.horizon), false),
        };

        tracing::debug!(
            ticker = %ticker,
            score = score.final_score,
            label = %score.label,
            confidence,
            "analysis complete"
        );

        Ok(StockReport {
            trading_scenarios: trading_scenarios(&snapshot.bars, self.projector.config()),
            ticker,
            score,
            technical,
            fundamental,
            explanation,
            confidence,
            risks,
            stress_scenarios: scenarios,
            resilience_score: resilience,
            disclaimer: self.compliance.disclaimer(),
            projection,
            projection_cached,
            analyzed_at: Utc::now(),
        })
    }
}

impl Default for StockAnalyzer {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}
