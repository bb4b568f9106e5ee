//! Conservative multi-day price projection for IDX equities.
//!
//! The projector is a pure function of a bar series, a current price and a
//! horizon, plus one noise draw per simulated day. Caching lives in
//! [`cache::PredictionCache`], outside the projector.

pub mod cache;
pub mod config;
pub mod levels;
pub mod models;
pub mod projector;
pub mod scenarios;
pub mod shocks;

pub use cache::{CachedProjection, PredictionCache, ProjectionKey};
pub use config::ProjectionConfig;
pub use levels::{bollinger_bands, psychological_levels, support_resistance, volatility};
pub use models::*;
pub use projector::PriceProjector;
pub use scenarios::{
    trading_scenarios, ConservativeAdvice, PlanLevels, ScenarioPlan, TradingScenarios,
};
pub use shocks::{FixedShocks, GaussianShocks, ShockSource};
