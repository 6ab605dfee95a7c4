//! Upstream provider error types.

/// Failures talking to an LLM vendor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// No API key configured for the provider
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Provider is on the allow-list but has no client registered
    #[display("Provider '{}' is not configured", _0)]
    NotConfigured(String),
    /// Transport-level failure
    #[display("HTTP error: {}", _0)]
    Http(String),
    /// Vendor returned a non-success status
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Vendor reply did not have the expected shape
    #[display("Response parsing failed: {}", _0)]
    ResponseParsing(String),
}

/// Provider error with location tracking.
///
/// # Examples
///
/// ```
/// use rainyield_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::MissingApiKey("OPENAI_API_KEY".into()));
/// assert!(format!("{}", err).contains("OPENAI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new provider error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;
