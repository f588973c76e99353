//! Reader for delimited student tables.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Terminator};
use tracing::debug;

use crate::config::Dialect;
use crate::error::{RaterError, Result};

/// One student record: identifier at index 0, raw score tokens after it.
pub type Row = Vec<String>;

/// Every row of an input file, in file order.
pub type Table = Vec<Row>;

/// Reads the whole table at `path` into memory.
///
/// There is no header row. Blank lines are skipped and rows may differ in
/// width; deciding what to do with irregular rows is left to the caller.
///
/// # Errors
///
/// Returns [`RaterError::ResourceUnavailable`] if the file cannot be opened or
/// any record cannot be read (including invalid UTF-8). No partial table is
/// returned.
pub fn read_table(path: impl AsRef<Path>, dialect: &Dialect) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| RaterError::unavailable(path, e))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(dialect.delimiter)
        // any of \n, \r or \r\n ends a record, whatever the output terminator
        .terminator(Terminator::CRLF)
        .from_reader(file);

    let mut table = Table::new();
    for result in reader.records() {
        let record = result.map_err(|e| RaterError::unavailable(path, e))?;
        table.push(record.iter().map(str::to_string).collect());
    }

    debug!(path = %path.display(), rows = table.len(), "Table read");
    Ok(table)
}
