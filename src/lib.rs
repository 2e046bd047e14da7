//! # ws-player-rs
//!
//! Live camera playback over a WebSocket. The camera pushes one fragmented
//! MP4 fragment per binary message; this crate serializes those fragments
//! into a decoder that accepts one append at a time, queues them while the
//! decoder is busy, and keeps the idle-sensitive connection alive.
//!
//! ```text
//!   WsTransport ──► Event queue ──► Player ──► BufferController ──► DecoderSink
//!        ▲                                        │
//!        └────── keep-alive / start / stop ───────┘
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use ws_player_rs::{Player, PlayerConfig};
//!
//! # async fn example() -> ws_player_rs::error::Result<()> {
//! let config = PlayerConfig::new("192.168.1.20")
//!     .credentials("admin", "instar")
//!     .insecure(true);
//!
//! let (mut player, _handle) = Player::connect(config, tokio::io::stdout())?;
//! player.run().await;
//! player.close().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod controller;
pub mod error;
pub mod event;
pub mod media;
pub mod session;
pub mod sink;
pub mod stats;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::{Player, PlayerConfig, PlayerHandle};
pub use controller::{BufferController, ControllerConfig, SessionState};
pub use error::{Error, Result};
pub use event::Event;
pub use media::{CodecNegotiator, MediaFragment, MimeType, VideoCodec};
pub use session::Session;
pub use sink::{DecoderSink, SinkError, WriterSink};
pub use transport::{ReadyState, Transport, TransportConfig, WsTransport};
