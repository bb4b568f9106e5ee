use std::sync::Arc;

use analysis_core::{normalize_ticker, AnalysisError, Bar};
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::models::PredictionResult;
use crate::projector::PriceProjector;

const DEFAULT_TTL_SECS: i64 = 60;

/// Identity of a cached projection. The last bar timestamp keys data
/// freshness: a new bar invalidates the entry even within the TTL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectionKey {
    pub ticker: String,
    pub horizon: usize,
    pub last_bar: Option<DateTime<Utc>>,
}

struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CachedProjection {
    pub result: Arc<PredictionResult>,
    pub cache_used: bool,
    pub cache_age_secs: f64,
}

/// In-process TTL cache wrapped around a [`PriceProjector`].
pub struct PredictionCache {
    entries: DashMap<ProjectionKey, CacheEntry<Arc<PredictionResult>>>,
    ttl: Duration,
}

impl PredictionCache {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl: Duration::seconds(ttl_secs.max(0)),
        }
    }

    /// TTL from `PROJECTOR_CACHE_TTL_SECS` (default 60 seconds)
    pub fn from_env() -> Result<Self, AnalysisError> {
        let ttl = match std::env::var("PROJECTOR_CACHE_TTL_SECS") {
            Ok(raw) => raw.trim().parse::<i64>().map_err(|_| {
                AnalysisError::InvalidData(format!(
                    "PROJECTOR_CACHE_TTL_SECS has invalid value '{}'",
                    raw
                ))
            })?,
            Err(_) => DEFAULT_TTL_SECS,
        };
        Ok(Self::new(ttl))
    }

    pub fn get_or_project(
        &self,
        projector: &PriceProjector,
        ticker: &str,
        bars: &[Bar],
        current_price: f64,
        horizon: usize,
    ) -> Result<CachedProjection, AnalysisError> {
        self.get_or_project_at(projector, ticker, bars, current_price, horizon, Utc::now())
    }

    /// Same as [`get_or_project`](Self::get_or_project) with an explicit clock.
    ///
    /// The key's shard stays locked while a miss is computed, so concurrent
    /// callers for one key run the projection once.
    pub fn get_or_project_at(
        &self,
        projector: &PriceProjector,
        ticker: &str,
        bars: &[Bar],
        current_price: f64,
        horizon: usize,
        now: DateTime<Utc>,
    ) -> Result<CachedProjection, AnalysisError> {
        let key = ProjectionKey {
            ticker: normalize_ticker(ticker)?,
            horizon: horizon.max(1),
            last_bar: bars.last().map(|b| b.timestamp),
        };

        let entry = self.entries.entry(key);
        if let Entry::Occupied(ref occupied) = entry {
            let cached = occupied.get();
            let age = now - cached.cached_at;
            if age < self.ttl {
                tracing::debug!(
                    ticker = %occupied.key().ticker,
                    age_ms = age.num_milliseconds(),
                    "projection cache hit"
                );
                return Ok(CachedProjection {
                    result: Arc::clone(&cached.data),
                    cache_used: true,
                    cache_age_secs: age.num_milliseconds() as f64 / 1000.0,
                });
            }
        }

        let result = Arc::new(projector.project(bars, current_price, horizon));
        entry.insert(CacheEntry {
            data: Arc::clone(&result),
            cached_at: now,
        });

        Ok(CachedProjection {
            result,
            cache_used: false,
            cache_age_secs: 0.0,
        })
    }

    /// Drop every entry for one ticker
    pub fn clear(&self, ticker: &str) -> Result<(), AnalysisError> {
        let ticker = normalize_ticker(ticker)?;
        self.entries.retain(|key, _| key.ticker != ticker);
        Ok(())
    }

    pub fn clear_all(&self) {
        self.entries.clear();
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.cached_at < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PredictionCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(n: usize) -> Vec<Bar> {
        let start = DateTime::parse_from_rfc3339("2024-01-02T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        (0..n)
            .map(|i| {
                let close = 4_500.0 + (i as f64 * 0.7).sin() * 60.0;
                Bar {
                    timestamp: start + Duration::days(i as i64),
                    open: close,
                    high: close + 25.0,
                    low: close - 25.0,
                    close,
                    volume: 2_000_000.0,
                }
            })
            .collect()
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = PredictionCache::new(60);
        let projector = PriceProjector::default();
        let data = bars(40);
        let t0 = Utc::now();

        let first = cache.get_or_project_at(&projector, "bbca", &data, 4_520.0, 5, t0).unwrap();
        assert!(!first.cache_used);

        let second = cache
            .get_or_project_at(&projector, "BBCA.JK", &data, 4_520.0, 5, t0 + Duration::seconds(30))
            .unwrap();
        assert!(second.cache_used);
        assert!((second.cache_age_secs - 30.0).abs() < 1e-9);
        assert_eq!(second.result.predictions, first.result.predictions);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_recomputed() {
        let cache = PredictionCache::new(60);
        let projector = PriceProjector::default();
        let data = bars(40);
        let t0 = Utc::now();

        cache.get_or_project_at(&projector, "TLKM", &data, 3_000.0, 3, t0).unwrap();
        let later = cache
            .get_or_project_at(&projector, "TLKM", &data, 3_000.0, 3, t0 + Duration::seconds(61))
            .unwrap();
        assert!(!later.cache_used);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_separate_horizon_and_freshness() {
        let cache = PredictionCache::new(60);
        let projector = PriceProjector::default();
        let data = bars(40);
        let t0 = Utc::now();

        cache.get_or_project_at(&projector, "BBRI", &data, 4_500.0, 5, t0).unwrap();
        let other_horizon = cache
            .get_or_project_at(&projector, "BBRI", &data, 4_500.0, 3, t0)
            .unwrap();
        assert!(!other_horizon.cache_used);

        let newer = bars(41);
        let fresh = cache.get_or_project_at(&projector, "BBRI", &newer, 4_500.0, 5, t0).unwrap();
        assert!(!fresh.cache_used);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_clear_by_ticker() {
        let cache = PredictionCache::new(60);
        let projector = PriceProjector::default();
        let data = bars(40);

        cache.get_or_project(&projector, "BBCA", &data, 4_500.0, 5).unwrap();
        cache.get_or_project(&projector, "BMRI", &data, 4_500.0, 5).unwrap();
        cache.clear("bbca").unwrap();
        assert_eq!(cache.len(), 1);

        cache.clear_all();
        assert!(cache.is_empty());
        assert!(cache.clear("  ").is_err());
    }

    #[test]
    fn test_purge_expired() {
        let cache = PredictionCache::new(10);
        let projector = PriceProjector::default();
        let t0 = Utc::now();
        cache.get_or_project_at(&projector, "ASII", &bars(30), 5_000.0, 5, t0).unwrap();
        cache.purge_expired(t0 + Duration::seconds(5));
        assert_eq!(cache.len(), 1);
        cache.purge_expired(t0 + Duration::seconds(11));
        assert!(cache.is_empty());
    }
}
