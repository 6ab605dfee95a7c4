//! Error types for the Rainyield prediction service.
//!
//! Each concern gets its own location-tracking error struct; they all fold
//! into [`RainyieldError`] for code that crosses crate boundaries.

mod prediction;
mod provider;
mod request;
mod system;

pub use prediction::{PredictionError, PredictionErrorKind};
pub use provider::{ProviderError, ProviderErrorKind, ProviderResult};
pub use request::{RequestError, RequestErrorKind};
pub use system::{SystemError, SystemErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum RainyieldErrorKind {
    /// Client input error
    Request(RequestError),
    /// Upstream provider error
    Provider(ProviderError),
    /// Reply extraction or validation error
    Prediction(PredictionError),
    /// Configuration, I/O or client transport error
    System(SystemError),
}

impl std::fmt::Display for RainyieldErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RainyieldErrorKind::Request(e) => write!(f, "{}", e),
            RainyieldErrorKind::Provider(e) => write!(f, "{}", e),
            RainyieldErrorKind::Prediction(e) => write!(f, "{}", e),
            RainyieldErrorKind::System(e) => write!(f, "{}", e),
        }
    }
}

/// Rainyield error with kind discrimination.
#[derive(Debug)]
pub struct RainyieldError(Box<RainyieldErrorKind>);

impl RainyieldError {
    /// Create a new error from a kind.
    pub fn new(kind: RainyieldErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RainyieldErrorKind {
        &self.0
    }

    /// Message suitable for an end user, without the source location.
    ///
    /// # Examples
    ///
    /// ```
    /// use rainyield_error::{RainyieldError, RequestError, RequestErrorKind};
    ///
    /// let err: RainyieldError = RequestError::new(RequestErrorKind::MissingFile).into();
    /// assert_eq!(err.user_message(), "No file uploaded");
    /// ```
    pub fn user_message(&self) -> String {
        match self.kind() {
            RainyieldErrorKind::Request(e) => e.kind.to_string(),
            RainyieldErrorKind::Provider(e) => e.kind.to_string(),
            RainyieldErrorKind::Prediction(e) => e.kind.to_string(),
            RainyieldErrorKind::System(e) => e.message().to_string(),
        }
    }

    /// Whether the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind(), RainyieldErrorKind::Request(_))
    }
}

impl std::fmt::Display for RainyieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rainyield Error: {}", self.0)
    }
}

impl std::error::Error for RainyieldError {}

// Generic From implementation for any type that converts to RainyieldErrorKind
impl<T> From<T> for RainyieldError
where
    T: Into<RainyieldErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Rainyield operations.
pub type RainyieldResult<T> = std::result::Result<T, RainyieldError>;
