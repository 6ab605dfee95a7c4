//! Client input error types.
//!
//! Everything in this module is the caller's fault and maps to a 4xx
//! response.

/// Specific client input failures.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum RequestErrorKind {
    /// A required body field was absent
    #[display("Missing required field: {}", _0)]
    MissingField(String),
    /// Rainfall was NaN or infinite
    #[display("Rainfall must be a finite number")]
    RainfallNotFinite,
    /// Rainfall outside the accepted band
    #[display("Rainfall must be between {} and {} mm, got {}", min, max, value)]
    RainfallOutOfRange {
        /// Submitted value
        value: f64,
        /// Lower bound (inclusive)
        min: f64,
        /// Upper bound (inclusive)
        max: f64,
    },
    /// Provider name not on the allow-list
    #[display("Invalid provider '{}'. Expected one of: {}", name, allowed)]
    InvalidProvider {
        /// Submitted provider name
        name: String,
        /// Comma-separated allow-list
        allowed: String,
    },
    /// Request body could not be decoded
    #[display("Invalid request body: {}", _0)]
    InvalidBody(String),
    /// Multipart upload had no `file` field
    #[display("No file uploaded")]
    MissingFile,
    /// CSV lacked a usable header row
    #[display("CSV must have a header row with 'rainfall' and 'yield' columns")]
    MissingCsvHeader,
    /// CSV was structurally malformed
    #[display("Malformed CSV: {}", _0)]
    MalformedCsv(String),
    /// A numeric CSV field failed to parse under the reject-file policy
    #[display("Invalid number '{}' in column '{}' on line {}", value, column, row)]
    InvalidCsvNumber {
        /// Column name
        column: String,
        /// Offending raw text
        value: String,
        /// 1-based line number in the file
        row: u64,
    },
}

/// Client input error with location tracking.
///
/// # Examples
///
/// ```
/// use rainyield_error::{RequestError, RequestErrorKind};
///
/// let err = RequestError::new(RequestErrorKind::MissingField("rainfall".into()));
/// assert!(format!("{}", err).contains("rainfall"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Request Error: {} at line {} in {}", kind, line, file)]
pub struct RequestError {
    /// The kind of error that occurred
    pub kind: RequestErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RequestError {
    /// Create a new request error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RequestErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
