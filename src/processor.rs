//! Per-row score validation, averaging and classification.

use std::fmt;
use tracing::warn;

use crate::error::{RaterError, Result};
use crate::grade::{Classification, classify};
use crate::parser::Row;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// The kind of correction applied to a raw score field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefectKind {
    Unparsable,
    OutOfRange,
}

/// A score field that was replaced by `0` before averaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub student: String,
    /// Index of the field in the row; the identifier is column 0.
    pub column: usize,
    pub kind: DefectKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DefectKind::Unparsable => write!(
                f,
                "score {} for student {} could not be parsed as a number",
                self.column, self.student
            ),
            DefectKind::OutOfRange => write!(
                f,
                "score {} for student {} is outside the valid range 0-10",
                self.column, self.student
            ),
        }
    }
}

/// A row after processing, with the corrections that were made to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRow {
    /// Input fields followed by the formatted average and the label.
    pub row: Row,
    pub average: f64,
    pub classification: Classification,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses a raw score and forces it into `[0, 10]`.
///
/// Parsing and the range check are independent: a value that fails to parse
/// becomes `0`, which is then range checked like any other score.
pub fn sanitize_score(raw: &str) -> (f64, Vec<DefectKind>) {
    let mut defects = Vec::new();

    let mut score = match raw.trim().parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            defects.push(DefectKind::Unparsable);
            0.0
        }
    };

    // NaN fails this comparison too
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        defects.push(DefectKind::OutOfRange);
        score = 0.0;
    }

    // `-0` is in range; fold it to `+0` so it never reaches the average
    (score + 0.0, defects)
}

/// Arithmetic mean. Returns `None` for empty input instead of dividing by zero.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Formats an average the way the output table expects: shortest round-trip
/// decimal, with a trailing `.0` on integral values (`7.0`, `2.5`).
pub fn format_average(average: f64) -> String {
    let s = average.to_string();
    if average.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}

/// Validates every score of `row`, averages them and appends the average and
/// the classification label.
///
/// Each corrected field is logged at `warn` and returned in
/// [`ProcessedRow::diagnostics`].
///
/// # Errors
///
/// Returns [`RaterError::DivisionByZero`] when the row has no score columns.
pub fn process_row(mut row: Row, threshold: f64) -> Result<ProcessedRow> {
    let student = row.first().cloned().unwrap_or_default();

    let mut scores = Vec::with_capacity(row.len().saturating_sub(1));
    let mut diagnostics = Vec::new();

    for (column, raw) in row.iter().enumerate().skip(1) {
        let (score, defects) = sanitize_score(raw);
        for kind in defects {
            let diagnostic = Diagnostic {
                student: student.clone(),
                column,
                kind,
            };
            warn!(student = %student, column, kind = ?kind, "{}", diagnostic);
            diagnostics.push(diagnostic);
        }
        scores.push(score);
    }

    let average = mean(&scores).ok_or_else(|| RaterError::DivisionByZero {
        student: student.clone(),
    })?;
    let classification = classify(average, threshold);

    row.push(format_average(average));
    row.push(classification.as_str().to_string());

    Ok(ProcessedRow {
        row,
        average,
        classification,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_sanitize_valid_scores() {
        assert_eq!(sanitize_score("8"), (8.0, vec![]));
        assert_eq!(sanitize_score("0"), (0.0, vec![]));
        assert_eq!(sanitize_score("10"), (10.0, vec![]));
        assert_eq!(sanitize_score("7.5"), (7.5, vec![]));
        assert_eq!(sanitize_score(" 6 "), (6.0, vec![]));
    }

    #[test]
    fn test_sanitize_unparsable() {
        assert_eq!(sanitize_score("abc"), (0.0, vec![DefectKind::Unparsable]));
        assert_eq!(sanitize_score(""), (0.0, vec![DefectKind::Unparsable]));
        // comma decimals belong to another locale
        assert_eq!(sanitize_score("7,5"), (0.0, vec![DefectKind::Unparsable]));
    }

    #[test]
    fn test_sanitize_out_of_range() {
        assert_eq!(sanitize_score("11"), (0.0, vec![DefectKind::OutOfRange]));
        assert_eq!(sanitize_score("-0.5"), (0.0, vec![DefectKind::OutOfRange]));
        assert_eq!(sanitize_score("10.01"), (0.0, vec![DefectKind::OutOfRange]));
        assert_eq!(sanitize_score("NaN"), (0.0, vec![DefectKind::OutOfRange]));
        assert_eq!(sanitize_score("inf"), (0.0, vec![DefectKind::OutOfRange]));
    }

    #[test]
    fn test_sanitize_negative_zero() {
        let (score, defects) = sanitize_score("-0");
        assert!(defects.is_empty());
        assert!(score.is_sign_positive());
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[8.0, 6.0]), Some(7.0));
        assert_eq!(mean(&[0.0, 5.0]), Some(2.5));
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(7.0), "7.0");
        assert_eq!(format_average(2.5), "2.5");
        assert_eq!(format_average(0.0), "0.0");
        assert_eq!(format_average(10.0), "10.0");
        assert_eq!(format_average(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn test_format_average_small_values_stay_positional() {
        assert_eq!(format_average(0.00001), "0.00001");
        assert_eq!(format_average(mean(&[0.0002, 0.0]).unwrap()), "0.0001");
    }

    #[test]
    fn test_process_average_at_threshold() {
        let out = process_row(row(&["Ana", "8", "6"]), 7.0).unwrap();
        assert_eq!(out.row, row(&["Ana", "8", "6", "7.0", "APR"]));
        assert_eq!(out.average, 7.0);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_process_negative_zero_scores() {
        let out = process_row(row(&["Ana", "-0", "-0.0"]), 7.0).unwrap();
        assert_eq!(out.row, row(&["Ana", "-0", "-0.0", "0.0", "REP"]));
        assert!(out.average.is_sign_positive());
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_process_passing_student() {
        let out = process_row(row(&["Bea", "9", "9"]), 7.0).unwrap();
        assert_eq!(out.row, row(&["Bea", "9", "9", "9.0", "APR"]));
        assert_eq!(out.classification, Classification::Pass);
    }

    #[test]
    fn test_process_unparsable_score() {
        let out = process_row(row(&["Caio", "x", "5"]), 7.0).unwrap();
        assert_eq!(out.row, row(&["Caio", "x", "5", "2.5", "REP"]));
        assert_eq!(
            out.diagnostics,
            vec![Diagnostic {
                student: "Caio".to_string(),
                column: 1,
                kind: DefectKind::Unparsable,
            }]
        );
        assert_eq!(
            out.diagnostics[0].to_string(),
            "score 1 for student Caio could not be parsed as a number"
        );
    }

    #[test]
    fn test_process_one_diagnostic_per_bad_field() {
        let out = process_row(row(&["Hugo", "7", "abc"]), 7.0).unwrap();
        assert_eq!(out.average, 3.5);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].column, 2);
        assert_eq!(out.diagnostics[0].kind, DefectKind::Unparsable);
    }

    #[test]
    fn test_process_out_of_range_score() {
        let out = process_row(row(&["Edu", "9", "11"]), 7.0).unwrap();
        assert_eq!(out.average, 4.5);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].column, 2);
        assert_eq!(out.diagnostics[0].kind, DefectKind::OutOfRange);
        assert_eq!(
            out.diagnostics[0].to_string(),
            "score 2 for student Edu is outside the valid range 0-10"
        );
    }

    #[test]
    fn test_process_threshold_boundary_passes() {
        let out = process_row(row(&["Fabi", "7", "7"]), 7.0).unwrap();
        assert_eq!(out.classification, Classification::Pass);
        assert_eq!(out.row.last().unwrap(), "APR");
    }

    #[test]
    fn test_process_custom_threshold() {
        let out = process_row(row(&["Ana", "8", "6"]), 6.0).unwrap();
        assert_eq!(out.row.last().unwrap(), "APR");
    }

    #[test]
    fn test_process_without_scores_is_division_by_zero() {
        let err = process_row(row(&["Duda"]), 7.0).unwrap_err();
        match err {
            RaterError::DivisionByZero { student } => assert_eq!(student, "Duda"),
            other => panic!("Expected DivisionByZero, got {other:?}"),
        }
    }

    #[test]
    fn test_process_empty_row_is_division_by_zero() {
        let err = process_row(Vec::new(), 7.0).unwrap_err();
        assert!(matches!(err, RaterError::DivisionByZero { .. }));
    }

    #[test]
    fn test_process_appends_two_fields() {
        let input = row(&["Gabi", "1", "2", "3", "4"]);
        let out = process_row(input.clone(), 7.0).unwrap();
        assert_eq!(out.row.len(), input.len() + 2);
        assert_eq!(&out.row[..input.len()], &input[..]);
    }
}
