//! Statistics and metrics

pub mod metrics;

pub use metrics::{bitrate, ControllerStats, SessionStats};
