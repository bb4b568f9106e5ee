use crate::{Bar, Fundamentals, FundamentalSummary, TechnicalSummary};

/// Trait for technical scoring engines
pub trait TechnicalAnalyzer: Send + Sync {
    fn analyze(&self, bars: &[Bar]) -> TechnicalSummary;
}

/// Trait for fundamental scoring engines
pub trait FundamentalAnalyzer: Send + Sync {
    fn analyze(&self, fundamentals: &Fundamentals) -> FundamentalSummary;
}
