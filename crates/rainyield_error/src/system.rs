//! Failures outside the prediction path: settings, the local terminal and
//! the client's connection to the server.

/// Where a system failure came from, with its message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SystemErrorKind {
    /// Settings could not be loaded or failed validation
    #[display("Configuration: {}", _0)]
    Config(String),
    /// The terminal client could not reach or understand the server
    #[display("HTTP: {}", _0)]
    Http(String),
    /// Local file or terminal I/O failed
    #[display("I/O: {}", _0)]
    Io(String),
}

impl SystemErrorKind {
    /// The message without its category prefix.
    pub fn message(&self) -> &str {
        match self {
            SystemErrorKind::Config(m) | SystemErrorKind::Http(m) | SystemErrorKind::Io(m) => m,
        }
    }
}

/// System error with location tracking.
///
/// # Examples
///
/// ```
/// use rainyield_error::{SystemError, SystemErrorKind};
///
/// let err = SystemError::config("invalid bind address");
/// assert!(matches!(err.kind, SystemErrorKind::Config(_)));
/// assert_eq!(err.message(), "invalid bind address");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("System Error: {} at line {} in {}", kind, line, file)]
pub struct SystemError {
    /// The kind of error that occurred
    pub kind: SystemErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SystemError {
    /// Create a new system error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SystemErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Configuration failure.
    #[track_caller]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(SystemErrorKind::Config(message.into()))
    }

    /// Failure talking to the Rainyield server.
    #[track_caller]
    pub fn http(message: impl Into<String>) -> Self {
        Self::new(SystemErrorKind::Http(message.into()))
    }

    /// Local I/O failure.
    #[track_caller]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(SystemErrorKind::Io(message.into()))
    }

    /// The message without category or location.
    pub fn message(&self) -> &str {
        self.kind.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RainyieldError;

    #[test]
    fn test_user_message_drops_category_and_location() {
        let err: RainyieldError = SystemError::io("Cannot read data.csv").into();
        assert_eq!(err.user_message(), "Cannot read data.csv");
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("I/O: Cannot read data.csv"));
    }
}
