//! Local data files: `<TICKER>.csv` price history and optional
//! `<TICKER>.json` fundamentals.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use analysis_core::{normalize_ticker, AnalysisError, Bar, Fundamentals, StockSnapshot};
use analysis_orchestrator::SnapshotSource;
use chrono::{DateTime, NaiveDate, Utc};

/// Parse OHLCV rows from CSV with a header row.
///
/// Columns are matched by name, case-insensitively; extra columns are
/// ignored. Rows without a usable date or close are skipped. Output is sorted
/// by date with duplicate dates dropped (last one wins).
pub fn parse_bars<R: Read>(reader: R) -> Result<Vec<Bar>, AnalysisError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AnalysisError::InvalidData(format!("unreadable CSV header: {}", e)))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

    let date_idx = column("date")
        .or_else(|| column("datetime"))
        .or_else(|| column("timestamp"))
        .ok_or_else(|| AnalysisError::InvalidData("CSV has no Date column".to_string()))?;
    let close_idx = column("close")
        .ok_or_else(|| AnalysisError::InvalidData("CSV has no Close column".to_string()))?;
    let open_idx = column("open");
    let high_idx = column("high");
    let low_idx = column("low");
    let volume_idx = column("volume");

    let mut bars = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| AnalysisError::InvalidData(format!("CSV row {}: {}", line + 2, e)))?;
        let number = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .and_then(|v| v.parse::<f64>().ok())
        };

        let Some(timestamp) = record.get(date_idx).and_then(parse_timestamp) else {
            tracing::debug!(row = line + 2, "skipping row without a valid date");
            continue;
        };
        let Some(close) = number(Some(close_idx)).filter(|c| c.is_finite()) else {
            tracing::debug!(row = line + 2, "skipping row without a close");
            continue;
        };

        bars.push(Bar {
            timestamp,
            open: number(open_idx).unwrap_or(close),
            high: number(high_idx).unwrap_or(close),
            low: number(low_idx).unwrap_or(close),
            close,
            volume: number(volume_idx).unwrap_or(0.0),
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    bars.reverse();
    bars.dedup_by_key(|b| b.timestamp);
    bars.reverse();
    Ok(bars)
}

pub fn load_bars(path: &Path) -> Result<Vec<Bar>, AnalysisError> {
    let file = File::open(path)
        .map_err(|e| AnalysisError::DataSource(format!("cannot open {}: {}", path.display(), e)))?;
    parse_bars(BufReader::new(file))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // "2024-01-02" or "2024-01-02 00:00:00+07:00" style exports
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Snapshots read from a data directory
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// First existing file among `BBCA.JK.<ext>` and `BBCA.<ext>`
    fn find(&self, ticker: &str, ext: &str) -> Option<PathBuf> {
        let code = ticker.split('.').next().unwrap_or(ticker);
        [ticker, code]
            .iter()
            .map(|name| self.dir.join(format!("{}.{}", name, ext)))
            .find(|path| path.is_file())
    }

    fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, AnalysisError> {
        let Some(path) = self.find(ticker, "json") else {
            return Ok(Fundamentals::default());
        };
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            AnalysisError::DataSource(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| AnalysisError::InvalidData(format!("{}: {}", path.display(), e)))
    }
}

impl SnapshotSource for DirectorySource {
    fn snapshot(&self, ticker: &str) -> Result<StockSnapshot, AnalysisError> {
        let ticker = normalize_ticker(ticker)?;
        let path = self.find(&ticker, "csv").ok_or_else(|| {
            AnalysisError::DataSource(format!(
                "no price file for {} in {}",
                ticker,
                self.dir.display()
            ))
        })?;

        let bars = load_bars(&path)?;
        let fundamentals = self.fundamentals(&ticker)?;
        tracing::debug!(ticker = %ticker, bars = bars.len(), "loaded snapshot");

        Ok(StockSnapshot::new(ticker, bars).with_fundamentals(fundamentals))
    }
}
