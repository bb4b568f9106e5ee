use crate::AnalysisError;

/// Exchange suffix for IDX listings.
pub const IDX_SUFFIX: &str = ".JK";

/// Canonical form of a ticker: trimmed, uppercase, with an exchange suffix.
///
/// Bare IDX codes get `.JK` appended; symbols that already carry a suffix
/// (`BBCA.JK`, `AAPL.US`) are kept as-is.
pub fn normalize_ticker(raw: &str) -> Result<String, AnalysisError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AnalysisError::InvalidData("ticker must not be empty".to_string()));
    }
    if ticker.contains('.') {
        Ok(ticker)
    } else {
        Ok(format!("{}{}", ticker, IDX_SUFFIX))
    }
}
