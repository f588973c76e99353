use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::processor::{DefectKind, ProcessedRow};

#[derive(Debug, Default, Serialize)]
pub struct RunStats {
    pub timestamp: DateTime<Utc>,
    pub threshold: f64,

    // rows
    pub rows_read: usize,
    pub rows_written: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub irregular_width: usize,

    // corrected fields
    pub unparsable_scores: usize,
    pub out_of_range_scores: usize,
}

impl RunStats {
    pub fn new(threshold: f64) -> Self {
        RunStats {
            timestamp: Utc::now(),
            threshold,
            ..Default::default()
        }
    }

    /// Counts one successfully processed row.
    pub fn record(&mut self, processed: &ProcessedRow) {
        if processed.classification.is_pass() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }

        for d in &processed.diagnostics {
            match d.kind {
                DefectKind::Unparsable => self.unparsable_scores += 1,
                DefectKind::OutOfRange => self.out_of_range_scores += 1,
            }
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    /// Share of classified students that passed, in percent.
    pub fn pass_pct(&self) -> f64 {
        Self::pct(self.passed, self.passed + self.failed)
    }

    pub fn diagnostics(&self) -> usize {
        self.unparsable_scores + self.out_of_range_scores
    }
}
