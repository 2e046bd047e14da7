//! Error types
//!
//! Nothing in the buffer controller returns these; they surface from setup
//! (URL/request building, connecting) and from the transport seam, where
//! the player logs them and keeps going.

use std::fmt;

use tokio_tungstenite::tungstenite;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// WebSocket protocol or handshake error
    WebSocket(tungstenite::Error),
    /// Transport-level failure (not open, timed out, task gone)
    Transport(TransportError),
    /// Invalid configuration
    Config(String),
}

/// Errors raised by a transport adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// A send was attempted while the connection was not open
    NotOpen,
    /// Connecting did not complete in time
    ConnectTimeout,
    /// The background connection task has stopped
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::NotOpen => write!(f, "connection is not open"),
            TransportError::ConnectTimeout => write!(f, "connect timed out"),
            TransportError::Closed => write!(f, "connection task closed"),
        }
    }
}

impl std::error::Error for TransportError {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WebSocket(e) => write!(f, "WebSocket error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
            Error::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::WebSocket(e) => Some(e),
            Error::Transport(e) => Some(e),
            Error::Config(_) => None,
        }
    }
}

impl From<tungstenite::Error> for Error {
    fn from(e: tungstenite::Error) -> Self {
        Error::WebSocket(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::from(TransportError::NotOpen);
        assert_eq!(err.to_string(), "Transport error: connection is not open");

        let err = Error::Config("missing host".into());
        assert_eq!(err.to_string(), "Invalid configuration: missing host");
    }

    #[test]
    fn test_source_chain() {
        let err = Error::from(TransportError::ConnectTimeout);
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connect timed out");
        assert!(std::error::Error::source(&Error::Config(String::new())).is_none());
    }
}
