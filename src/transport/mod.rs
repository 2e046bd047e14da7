//! Transport adapters
//!
//! A transport delivers complete binary frames to the player as
//! [`Event::FragmentArrived`](crate::event::Event::FragmentArrived) and lets
//! the player send short text commands back. Partial frames are never
//! surfaced: a fragment event always carries a fully materialized payload.

pub mod config;
pub mod ws;

pub use config::{Credentials, TransportConfig};
pub use ws::WsTransport;

use crate::error::Result;

/// Connection state, mirroring the WebSocket `readyState` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReadyState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ReadyState {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => ReadyState::Connecting,
            1 => ReadyState::Open,
            2 => ReadyState::Closing,
            _ => ReadyState::Closed,
        }
    }
}

impl std::fmt::Display for ReadyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadyState::Connecting => write!(f, "connecting"),
            ReadyState::Open => write!(f, "open"),
            ReadyState::Closing => write!(f, "closing"),
            ReadyState::Closed => write!(f, "closed"),
        }
    }
}

/// Bidirectional message socket as seen by the player
pub trait Transport {
    /// Current connection state
    fn ready_state(&self) -> ReadyState;

    /// Whether sends are currently possible
    fn is_open(&self) -> bool {
        self.ready_state() == ReadyState::Open
    }

    /// Send a text message
    ///
    /// Fails with [`TransportError::NotOpen`](crate::error::TransportError::NotOpen)
    /// when the connection is not open.
    fn send_text(&self, message: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_roundtrip() {
        for state in [
            ReadyState::Connecting,
            ReadyState::Open,
            ReadyState::Closing,
            ReadyState::Closed,
        ] {
            assert_eq!(ReadyState::from_u8(state as u8), state);
        }
        assert_eq!(ReadyState::from_u8(42), ReadyState::Closed);
    }
}
