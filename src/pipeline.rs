//! Single-pass orchestration: read the table, process every row, write the result.

use std::path::Path;

use tracing::{error, info, warn};

use crate::config::{RaterConfig, RowPolicy};
use crate::error::{RaterError, Result};
use crate::output::write_table;
use crate::parser::{Table, read_table};
use crate::processor::process_row;
use crate::stats::RunStats;

/// Reads `input`, rates every student and writes the augmented table to `output`.
///
/// Nothing is written if the input cannot be read, or if a row cannot be
/// averaged under [`RowPolicy::Abort`]. A sink failure is returned as is; rows
/// already flushed to `output` are not removed.
#[tracing::instrument(skip(config), fields(threshold = config.threshold))]
pub fn run(config: &RaterConfig, input: &Path, output: &Path) -> Result<RunStats> {
    let (table, mut stats) = rate(config, input)?;

    write_table(output, &table, &config.dialect)?;
    stats.rows_written = table.len();

    info!(
        output = %output.display(),
        rows_written = stats.rows_written,
        passed = stats.passed,
        failed = stats.failed,
        skipped = stats.skipped,
        "Run complete"
    );
    Ok(stats)
}

/// Same as [`run`] without writing anything: reports what a run would produce.
#[tracing::instrument(skip(config), fields(threshold = config.threshold))]
pub fn check(config: &RaterConfig, input: &Path) -> Result<RunStats> {
    let (table, stats) = rate(config, input)?;
    info!(
        rows = table.len(),
        passed = stats.passed,
        failed = stats.failed,
        skipped = stats.skipped,
        diagnostics = stats.diagnostics(),
        "Check complete"
    );
    Ok(stats)
}

fn rate(config: &RaterConfig, input: &Path) -> Result<(Table, RunStats)> {
    let table = read_table(input, &config.dialect)?;
    let mut stats = RunStats::new(config.threshold);
    stats.rows_read = table.len();

    if table.is_empty() {
        warn!(input = %input.display(), "Input table has no rows");
    }

    let expected_width = table.first().map(Vec::len);
    let mut rated = Table::with_capacity(table.len());

    for (line, row) in table.into_iter().enumerate() {
        if Some(row.len()) != expected_width {
            stats.irregular_width += 1;
            warn!(
                row = line + 1,
                width = row.len(),
                expected = expected_width.unwrap_or_default(),
                "Row width differs from the first row"
            );
        }

        match process_row(row, config.threshold) {
            Ok(processed) => {
                stats.record(&processed);
                rated.push(processed.row);
            }
            Err(e @ RaterError::DivisionByZero { .. }) => match config.row_policy {
                RowPolicy::Skip => {
                    error!(row = line + 1, error = %e, "Skipping row");
                    stats.skipped += 1;
                }
                RowPolicy::Abort => {
                    error!(row = line + 1, error = %e, "Aborting run");
                    return Err(e);
                }
            },
            Err(e) => return Err(e),
        }
    }

    Ok((rated, stats))
}
