use std::fmt;

/// Pass/fail outcome for one student.
///
/// | Average          | Label |
/// |------------------|-------|
/// | >= threshold     | APR   |
/// | < threshold      | REP   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Pass,
    Fail,
}

impl Classification {
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Pass => "APR",
            Classification::Fail => "REP",
        }
    }

    pub fn is_pass(self) -> bool {
        self == Classification::Pass
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an average against the passing threshold.
pub fn classify(average: f64, threshold: f64) -> Classification {
    match average {
        a if a >= threshold => Classification::Pass,
        _ => Classification::Fail,
    }
}
