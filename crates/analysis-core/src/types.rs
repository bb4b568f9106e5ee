use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Closing prices of a bar series, oldest first.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Valuation snapshot as reported by the market-data provider.
///
/// Field aliases accept the provider's camelCase keys so a raw `info` payload
/// deserializes directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fundamentals {
    #[serde(default, alias = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(default, alias = "priceToBook")]
    pub price_to_book: Option<f64>,
    /// Fraction, e.g. 0.18 for 18%
    #[serde(default, alias = "returnOnEquity")]
    pub return_on_equity: Option<f64>,
    #[serde(default, alias = "dividendYield")]
    pub dividend_yield: Option<f64>,
}

/// Everything the analyzers need for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub symbol: String,
    pub bars: Vec<Bar>,
    #[serde(default)]
    pub fundamentals: Fundamentals,
    /// Live quote, possibly newer than the last bar
    #[serde(default)]
    pub current_price: Option<f64>,
}

impl StockSnapshot {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
            fundamentals: Fundamentals::default(),
            current_price: None,
        }
    }

    pub fn with_fundamentals(mut self, fundamentals: Fundamentals) -> Self {
        self.fundamentals = fundamentals;
        self
    }

    pub fn with_current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }
}

/// Output of the technical scoring engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalSummary {
    pub rsi: f64,
    /// MACD histogram (MACD line minus signal line)
    pub macd: f64,
    /// 0 to 4 points
    pub raw_score: i32,
    /// True when the neutral default was returned for lack of data
    #[serde(default)]
    pub degraded: bool,
}

impl TechnicalSummary {
    pub fn neutral() -> Self {
        Self {
            rsi: 50.0,
            macd: 0.0,
            raw_score: 1,
            degraded: true,
        }
    }
}

/// Output of the fundamental scoring engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalSummary {
    pub per: Option<f64>,
    pub pbv: Option<f64>,
    pub roe: Option<f64>,
    /// Fraction, normalized from percentage inputs
    pub dividend_yield: Option<f64>,
    /// 0 to 6 points
    pub score: i32,
}

impl FundamentalSummary {
    /// Number of valuation fields (PER, PBV, ROE) that were unavailable.
    pub fn missing_fields(&self) -> usize {
        [self.per, self.pbv, self.roe]
            .iter()
            .filter(|v| v.is_none())
            .count()
    }
}

/// Overall stance derived from the combined score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "AVOID")]
    Avoid,
    /// Analysis could not be completed
    #[serde(rename = "ERROR")]
    Error,
}

impl Recommendation {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 7 => Recommendation::StrongBuy,
            s if s >= 5 => Recommendation::Buy,
            s if s >= 3 => Recommendation::Hold,
            _ => Recommendation::Avoid,
        }
    }

    /// Human-readable label for the recommendation
    pub fn to_label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "STRONG BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Avoid => "AVOID",
            Recommendation::Error => "ERROR",
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Recommendation::StrongBuy | Recommendation::Buy)
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_label())
    }
}
