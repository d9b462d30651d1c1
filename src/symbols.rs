use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use crate::core::error::{ExportError, Result};

/// Reads ticker symbols from a CSV file. Every non-empty field of every row is a symbol.
pub fn load_symbols<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut symbols = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ExportError::csv(path, e))?;
        symbols.extend(
            record
                .iter()
                .filter(|field| !field.is_empty())
                .map(str::to_string),
        );
    }

    debug!(
        "There are {} stocks to process in {}",
        symbols.len(),
        path.display()
    );
    Ok(symbols)
}

/// Command line symbols first, then the ones from the file.
///
/// A symbol repeated in any letter case is kept only at its first position,
/// since the API is queried with the lowercased ticker.
pub fn collect_symbols(args: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut candidates: Vec<String> = args
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if let Some(path) = file {
        candidates.extend(load_symbols(path)?);
    }

    let mut seen = HashSet::new();
    let mut symbols = Vec::with_capacity(candidates.len());
    for symbol in candidates {
        if seen.insert(symbol.to_lowercase()) {
            symbols.push(symbol);
        } else {
            debug!("Skipping duplicate symbol {}", symbol);
        }
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_symbols_across_rows_and_columns() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("tickers.csv");
        fs::write(&path, "AAPL, MSFT ,shop-ct\n\nRY-CT,,\n")?;

        let symbols = load_symbols(&path)?;
        assert_eq!(symbols, vec!["AAPL", "MSFT", "shop-ct", "RY-CT"]);
        Ok(())
    }

    #[test]
    fn test_load_symbols_missing_file() {
        let err = load_symbols("/nonexistent/tickers.csv").unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_collect_symbols_order() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("tickers.csv");
        fs::write(&path, "GOOG,AMZN\n")?;

        let args = vec!["ABC".to_string(), " ".to_string()];
        let symbols = collect_symbols(&args, Some(&path))?;
        assert_eq!(symbols, vec!["ABC", "GOOG", "AMZN"]);

        assert_eq!(collect_symbols(&args, None)?, vec!["ABC"]);
        Ok(())
    }

    #[test]
    fn test_collect_symbols_drops_repeats() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("tickers.csv");
        fs::write(&path, "abc,GOOG\nMSFT,goog\n")?;

        let args = vec!["ABC".to_string(), "MSFT".to_string(), "ABC".to_string()];
        let symbols = collect_symbols(&args, Some(&path))?;
        assert_eq!(symbols, vec!["ABC", "MSFT", "GOOG"]);
        Ok(())
    }
}
