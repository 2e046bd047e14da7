//! Decoder sinks
//!
//! A decoder sink accepts one fragment at a time. After an append it stays
//! busy until the fragment has been consumed, then posts exactly one
//! [`Event::DecoderIdle`](crate::event::Event::DecoderIdle).
//!
//! Appends that the sink rejects come back as a [`SinkError`]; the sink does
//! not become busy for them and no idle notification follows.

pub mod writer;

pub use writer::WriterSink;

use crate::media::MediaFragment;

/// Incremental decoder buffer
pub trait DecoderSink {
    /// Hand a fragment to the decoder
    fn append(&mut self, fragment: MediaFragment) -> Result<(), SinkError>;

    /// Whether a previous append is still being processed
    fn is_busy(&self) -> bool;
}

/// Reasons a sink rejects an append
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Fragment carried no data
    EmptyFragment,
    /// The decoder refused the data (malformed or codec mismatch)
    Rejected(String),
    /// A previous append has not completed
    Busy,
    /// The sink has failed or been shut down
    Closed,
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::EmptyFragment => write!(f, "Empty fragment"),
            SinkError::Rejected(reason) => write!(f, "Fragment rejected: {}", reason),
            SinkError::Busy => write!(f, "Sink is busy"),
            SinkError::Closed => write!(f, "Sink is closed"),
        }
    }
}

impl std::error::Error for SinkError {}
