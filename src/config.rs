//! Run configuration: passing threshold, table dialect and row policy.

use clap::ValueEnum;
use std::env::VarError;

use crate::error::{RaterError, Result};

/// Environment variable consulted when no threshold is given on the command line.
pub const THRESHOLD_ENV: &str = "PASSING_THRESHOLD";

pub const DEFAULT_THRESHOLD: f64 = 7.0;
pub const DEFAULT_DELIMITER: u8 = b';';

/// Line terminator shared by the source and the sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LineTerminator {
    #[default]
    Lf,
    Crlf,
}

impl LineTerminator {
    pub(crate) fn to_csv(self) -> csv::Terminator {
        match self {
            LineTerminator::Lf => csv::Terminator::Any(b'\n'),
            LineTerminator::Crlf => csv::Terminator::CRLF,
        }
    }
}

/// Field delimiter and line terminator of the delimited table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: u8,
    pub terminator: LineTerminator,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            terminator: LineTerminator::default(),
        }
    }
}

impl Dialect {
    /// Builds a dialect from a textual delimiter such as `";"` or `","`.
    ///
    /// # Errors
    ///
    /// Returns [`RaterError::ConfigInvalid`] unless the delimiter is exactly one
    /// ASCII byte other than a quote or a line break.
    pub fn new(delimiter: &str, terminator: LineTerminator) -> Result<Self> {
        let bytes = delimiter.as_bytes();
        if bytes.len() != 1 || !bytes[0].is_ascii() {
            return Err(RaterError::config(format!(
                "delimiter must be a single ASCII character, got {delimiter:?}"
            )));
        }
        let delimiter = bytes[0];
        if matches!(delimiter, b'"' | b'\n' | b'\r') {
            return Err(RaterError::config(format!(
                "delimiter {:?} clashes with quoting or line breaks",
                delimiter as char
            )));
        }
        Ok(Self {
            delimiter,
            terminator,
        })
    }
}

/// What the pipeline does with a row that has no score columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RowPolicy {
    /// Report the row, leave it out of the output and keep going.
    #[default]
    Skip,
    /// Stop the run before anything is written.
    Abort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RaterConfig {
    pub threshold: f64,
    pub dialect: Dialect,
    pub row_policy: RowPolicy,
}

impl Default for RaterConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            dialect: Dialect::default(),
            row_policy: RowPolicy::default(),
        }
    }
}

impl RaterConfig {
    /// Creates a config, checking that the threshold is a finite number.
    pub fn new(threshold: f64, dialect: Dialect, row_policy: RowPolicy) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(RaterError::config(format!(
                "passing threshold must be a finite number, got {threshold}"
            )));
        }
        Ok(Self {
            threshold,
            dialect,
            row_policy,
        })
    }

    /// Resolves the threshold: explicit value, then [`THRESHOLD_ENV`], then the default.
    pub fn resolve_threshold(explicit: Option<f64>) -> Result<f64> {
        if let Some(t) = explicit {
            return Ok(t);
        }
        threshold_from_var(std::env::var(THRESHOLD_ENV))
    }
}

fn threshold_from_var(var: std::result::Result<String, VarError>) -> Result<f64> {
    match var {
        Ok(raw) => parse_threshold(&raw),
        Err(VarError::NotPresent) => Ok(DEFAULT_THRESHOLD),
        Err(VarError::NotUnicode(raw)) => Err(RaterError::config(format!(
            "{THRESHOLD_ENV} is not valid unicode: {raw:?}"
        ))),
    }
}

fn parse_threshold(raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        RaterError::config(format!("{THRESHOLD_ENV} is not a number: {raw:?}"))
    })
}
