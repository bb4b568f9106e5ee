//! analyzer-cli: score and project IDX stocks from local data files.
//!
//! Usage:
//!   analyzer-cli project --bars data/BBCA.csv --days 5 --seed 42
//!   analyzer-cli analyze BBCA --data-dir data
//!   analyzer-cli screen BBCA BBRI TLKM ASII --parallel --workers 3 --limit 10

mod loader;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use analysis_orchestrator::{
    workers_from_env, ScreenerEngine, ScreenerFilters, SnapshotSource, StockAnalyzer,
    DEFAULT_HORIZON_DAYS,
};
use anyhow::{bail, Context};
use price_projector::{GaussianShocks, PriceProjector, ProjectionConfig};
use serde::Serialize;

use crate::loader::{load_bars, DirectorySource};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("project") => run_project(&args[2..]),
        Some("analyze") => run_analyze(&args[2..]),
        Some("screen") => run_screen(&args[2..]),
        _ => {
            print_usage();
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "analyzer_cli=info,price_projector=info,analysis_orchestrator=info".into()
    });
    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    // stdout carries the JSON result, logs go to stderr
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  analyzer-cli project --bars FILE [--price P] [--days N] [--seed S]");
    eprintln!("  analyzer-cli analyze TICKER [--data-dir DIR] [--days N]");
    eprintln!("  analyzer-cli screen TICKER... [--data-dir DIR] [--parallel] [--workers N]");
    eprintln!("                      [--limit N] [--min-score N] [--no-errors]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DATA_DIR           data directory (default: data)");
    eprintln!("  SCREENER_WORKERS   parallel screener threads (default: 3)");
    eprintln!("  PROJECTOR_*        projection policy overrides");
}

fn run_project(args: &[String]) -> anyhow::Result<()> {
    let path = flag_value(args, "--bars").context("--bars FILE is required")?;
    let price: f64 = parse_flag(args, "--price")?.unwrap_or(0.0);
    let days: usize = parse_flag(args, "--days")?.unwrap_or(DEFAULT_HORIZON_DAYS);
    let seed: Option<u64> = parse_flag(args, "--seed")?;

    let bars = load_bars(Path::new(path)).with_context(|| format!("failed to load {}", path))?;
    tracing::info!("Loaded {} bars from {}", bars.len(), path);

    let projector = PriceProjector::new(ProjectionConfig::from_env()?);
    let result = match seed {
        Some(seed) => projector.project_with(&bars, price, days, &mut GaussianShocks::seeded(seed)),
        None => projector.project(&bars, price, days),
    };

    print_json(&result.rounded())
}

fn run_analyze(args: &[String]) -> anyhow::Result<()> {
    let Some(ticker) = positionals(args).into_iter().next() else {
        bail!("analyze needs a TICKER");
    };
    let days: usize = parse_flag(args, "--days")?.unwrap_or(DEFAULT_HORIZON_DAYS);

    let source = DirectorySource::new(data_dir(args));
    let analyzer = StockAnalyzer::new(ProjectionConfig::from_env()?).with_horizon(days);

    let snapshot = source.snapshot(&ticker)?;
    let mut report = analyzer
        .analyze(&snapshot)
        .with_context(|| format!("analysis failed for {}", ticker))?;
    report.projection = report.projection.rounded();

    tracing::info!(
        "{}: {} (score {})",
        report.ticker,
        report.score.label,
        report.score.final_score
    );
    print_json(&report)
}

fn run_screen(args: &[String]) -> anyhow::Result<()> {
    let tickers = positionals(args);
    if tickers.is_empty() {
        bail!("screen needs at least one TICKER");
    }

    let filters = ScreenerFilters {
        min_score: parse_flag(args, "--min-score")?,
        limit: parse_flag(args, "--limit")?,
        include_errors: !args.iter().any(|a| a == "--no-errors"),
    };

    let analyzer = StockAnalyzer::new(ProjectionConfig::from_env()?);
    let source = Arc::new(DirectorySource::new(data_dir(args)));
    let screener = ScreenerEngine::new(Arc::new(analyzer), source);

    let result = if args.iter().any(|a| a == "--parallel") {
        let workers = match parse_flag(args, "--workers")? {
            Some(n) => n,
            None => workers_from_env()?,
        };
        screener.screen_parallel(&tickers, &filters, workers)?
    } else {
        screener.screen(&tickers, &filters)
    };

    print_json(&result)
}

fn data_dir(args: &[String]) -> PathBuf {
    flag_value(args, "--data-dir")
        .map(PathBuf::from)
        .or_else(|| std::env::var("DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_flag<T>(args: &[String], flag: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match flag_value(args, flag) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid value '{}' for {}: {}", raw, flag, e)),
        None => Ok(None),
    }
}

/// Leading arguments before the first `--flag`
fn positionals(args: &[String]) -> Vec<String> {
    args.iter().take_while(|a| !a.starts_with("--")).cloned().collect()
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
