//! Streaming buffer controller
//!
//! Serializes fragment delivery into a sink that accepts one append at a
//! time:
//!
//! ```text
//!   fragment ──► state Idle?  ──yes──► sink.append()   (fast path, → Started)
//!                     │
//!                     no
//!                     ▼
//!               queue.push_back()
//!
//!   DecoderIdle ──► sink busy? ──yes──► ignore
//!                     │
//!                     no
//!                     ▼
//!               queue.pop_front() ──► sink.append()
//!               (empty queue → Idle)
//! ```
//!
//! Every received fragment also advances the keep-alive counter.

pub mod buffer;
pub mod config;
pub mod state;

pub use buffer::BufferController;
pub use config::{ControllerConfig, DEFAULT_KEEP_ALIVE_THRESHOLD, KEEP_ALIVE_MESSAGE};
pub use state::SessionState;
