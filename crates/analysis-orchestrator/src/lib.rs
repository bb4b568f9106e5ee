//! Per-ticker analysis pipeline and batch screener.
//!
//! [`StockAnalyzer`] runs the technical and fundamental engines, the rule
//! engines layered on their scores, and the price projection over one
//! [`StockSnapshot`](analysis_core::StockSnapshot). [`ScreenerEngine`] fans the
//! analyzer out over a ticker list.

pub mod analyzer;
pub mod compliance;
pub mod confidence;
pub mod explanation;
pub mod risk;
pub mod scoring;
pub mod screener;
pub mod stress;

#[cfg(test)]
mod tests;

pub use analyzer::{StockAnalyzer, StockReport, DEFAULT_HORIZON_DAYS};
pub use compliance::{
    price_projection_notice, trading_scenario_notice, ComplianceContext, InvestmentHorizon,
    RiskNotice, UserType,
};
pub use confidence::confidence_score;
pub use explanation::{rule_explanation, Explanation, HybridExplainer, Narrator};
pub use risk::risk_disclosures;
pub use scoring::ScoreCard;
pub use screener::{
    workers_from_env, InMemorySource, ScreenerEngine, ScreenerFilters, ScreenerResult, ScreenerRow,
    SnapshotSource, DEFAULT_WORKERS,
};
pub use stress::{resilience_score, stress_scenarios, StressKind, StressScenario};
