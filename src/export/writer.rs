use chrono::NaiveDateTime;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::error::{ExportError, Result};
use crate::export::transform::QuickenRecord;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// `{dir}/iex_quotes_YYYYMMDD_HHMMSS.csv`
pub fn default_output_path<P: AsRef<Path>>(dir: P, now: NaiveDateTime) -> PathBuf {
    dir.as_ref()
        .join(format!("iex_quotes_{}.csv", now.format("%Y%m%d_%H%M%S")))
}

/// Creates or truncates `path` and writes one `SYMBOL,PRICE,DATE` line per record.
///
/// A file left incomplete by a failed write is removed before the error is returned.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[QuickenRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let result = write_to(file, path, records);
    if result.is_err() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove incomplete output {}: {}", path.display(), e);
        }
    }
    result
}

fn write_to(file: File, path: &Path, records: &[QuickenRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    for record in records {
        writer
            .write_record([&record.symbol, &record.price, &record.date])
            .map_err(|e| ExportError::csv(path, e))?;
    }
    writer.flush().map_err(|e| ExportError::io(path, e))?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads back a file in the layout produced by [`write_records`].
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<QuickenRecord>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| ExportError::csv(path, e))?;

    reader
        .records()
        .map(|result| {
            let record = result.map_err(|e| ExportError::csv(path, e))?;
            Ok(QuickenRecord {
                symbol: record.get(0).unwrap_or_default().to_string(),
                price: record.get(1).unwrap_or_default().to_string(),
                date: record.get(2).unwrap_or_default().to_string(),
            })
        })
        .collect()
}
