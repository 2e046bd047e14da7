//! Player client
//!
//! Connects to the camera's WebSocket endpoint and drives the buffer
//! controller from a single event loop.

pub mod config;
pub mod player;

pub use config::PlayerConfig;
pub use player::{Player, PlayerHandle};
