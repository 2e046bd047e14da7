//! Player events
//!
//! Every collaborator talks to the player by posting an [`Event`] into one
//! queue. The player task handles them one at a time, so controller state is
//! never touched from two places at once.
//!
//! ```text
//!  WsTransport ──FragmentArrived/TransportOpen/...──┐
//!  WriterSink  ──DecoderIdle/DecoderError───────────┼──► mpsc ──► Player::run
//!  PlayerHandle ──Start/Stop/SourceClosed/Shutdown──┘
//! ```

use tokio::sync::mpsc;

use crate::media::MediaFragment;

/// A typed event for the player task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A complete binary frame arrived from the transport
    FragmentArrived(MediaFragment),
    /// A text frame arrived from the transport (currently unused)
    TextReceived(String),
    /// The decoder sink finished its current append
    DecoderIdle,
    /// The decoder sink hit an unrecoverable failure
    DecoderError(String),
    /// The transport connection is open
    TransportOpen,
    /// The transport connection closed
    TransportClosed,
    /// The transport reported an error
    TransportError(String),
    /// The media target was torn down
    SourceClosed,
    /// Request the live stream from the server
    Start,
    /// Ask the server to stop streaming
    Stop,
    /// Stop the player task
    Shutdown,
}

/// Sending half of the player's event queue
pub type EventSender = mpsc::UnboundedSender<Event>;

/// Receiving half of the player's event queue
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Create a player event queue
///
/// Unbounded: posting an event never blocks the transport or sink tasks.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
