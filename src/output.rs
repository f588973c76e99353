//! Table serialization and run summary output.
//!
//! Writes processed tables in the input dialect and renders [`RunStats`] as a
//! debug dump or JSON.

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Dialect;
use crate::error::RaterError;
use crate::parser::Table;
use crate::stats::RunStats;
use csv::WriterBuilder;
use std::fs::File;
use std::path::Path;

/// Logs run statistics using Rust's debug pretty-print format.
pub fn print_pretty(stats: &RunStats) {
    debug!("{:#?}", stats);
}

/// Logs run statistics as pretty-printed JSON.
pub fn print_json(stats: &RunStats) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

/// Writes every row of `table` to `path`, creating or truncating the file.
///
/// Uses the same delimiter and terminator as the source, quoting only the
/// fields that need it. A failure part way through leaves whatever was already
/// written in place.
pub fn write_table(
    path: impl AsRef<Path>,
    table: &Table,
    dialect: &Dialect,
) -> crate::error::Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = table.len(), "Writing table");

    let file = File::create(path).map_err(|e| RaterError::unavailable(path, e))?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(dialect.delimiter)
        .terminator(dialect.terminator.to_csv())
        .from_writer(file);

    for row in table {
        writer
            .write_record(row)
            .map_err(|e| RaterError::unavailable(path, e))?;
    }
    writer.flush().map_err(|e| RaterError::unavailable(path, e))?;

    Ok(())
}
