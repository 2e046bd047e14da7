//! Session lifecycle management
//!
//! Issues the start/stop commands and fires the readiness callback when
//! the transport opens.

pub mod lifecycle;

pub use lifecycle::{start_command, ReadyCallback, Session, DEFAULT_SUBSTREAM, STOP_COMMAND};
