//! Error types for NeuroLint core.

use std::{error::Error, fmt, io};

/// Error type for NeuroLint core operations.
#[derive(Debug)]
pub enum NeuroLintError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A request was rejected before reaching the engine.
    Validation(Vec<String>),
    /// The transport could not complete a request.
    Transport(String),
    /// A response could not be decoded.
    InvalidResponse(String),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for NeuroLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Validation(errors) => write!(f, "invalid request: {}", errors.join("; ")),
            Self::Transport(message) => write!(f, "{message}"),
            Self::InvalidResponse(message) => write!(f, "invalid response: {message}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for NeuroLintError {}

impl From<io::Error> for NeuroLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for NeuroLintError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidResponse(value.to_string())
    }
}

/// Convenience result type for NeuroLint core.
pub type Result<T> = std::result::Result<T, NeuroLintError>;

#[cfg(test)]
mod tests {
    use super::NeuroLintError;
    use std::io;

    #[test]
    fn io_error_formats_message() {
        let error = NeuroLintError::Io(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(format!("{error}"), "io error: boom");
    }

    #[test]
    fn validation_error_joins_messages() {
        let error = NeuroLintError::Validation(vec![
            "Code is required".to_string(),
            "Filename is required".to_string(),
        ]);
        assert_eq!(
            format!("{error}"),
            "invalid request: Code is required; Filename is required"
        );
    }

    #[test]
    fn transport_error_formats_message() {
        let error = NeuroLintError::Transport("HTTP 502: Bad Gateway".to_string());
        assert_eq!(format!("{error}"), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn from_json_error_maps_to_invalid_response() {
        let parse = serde_json::from_str::<serde_json::Value>("{").expect_err("parse error");
        let error: NeuroLintError = parse.into();
        match error {
            NeuroLintError::InvalidResponse(message) => assert!(!message.is_empty()),
            other => panic!("expected InvalidResponse, got {other:?}"),
        }
    }

    #[test]
    fn from_io_error_maps_variant() {
        let error: NeuroLintError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        match error {
            NeuroLintError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected Io variant, got {other:?}"),
        }
    }
}
