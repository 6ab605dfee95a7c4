//! Prediction extraction and validation errors.

/// Failures turning a vendor reply into a usable yield.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum PredictionErrorKind {
    /// No number could be extracted from the reply
    #[display("Could not parse a yield prediction from response: {}", _0)]
    Unparseable(String),
    /// Extracted number fell outside the provider's plausible range
    #[display(
        "Predicted yield {} t/ha is outside the plausible range {}-{} t/ha",
        value,
        min,
        max
    )]
    OutOfRange {
        /// Extracted value
        value: f64,
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (inclusive)
        max: f64,
    },
}

/// Prediction error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Prediction Error: {} at line {} in {}", kind, line, file)]
pub struct PredictionError {
    /// The kind of error that occurred
    pub kind: PredictionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PredictionError {
    /// Create a new prediction error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PredictionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
