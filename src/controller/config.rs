//! Buffer controller configuration

/// Message the streaming server expects as a keep-alive
pub const KEEP_ALIVE_MESSAGE: &str = "keep-alive";

/// Fragments between two keep-alive messages
///
/// The server drops connections after ~60 s without client traffic; at
/// typical fragment rates ten fragments is a few seconds.
pub const DEFAULT_KEEP_ALIVE_THRESHOLD: u32 = 10;

/// Buffer controller options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Send a keep-alive after this many received fragments (0 = never)
    pub keep_alive_threshold: u32,

    /// Keep-alive text message
    pub keep_alive_message: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            keep_alive_threshold: DEFAULT_KEEP_ALIVE_THRESHOLD,
            keep_alive_message: KEEP_ALIVE_MESSAGE.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Set keep-alive threshold
    pub fn keep_alive_threshold(mut self, fragments: u32) -> Self {
        self.keep_alive_threshold = fragments;
        self
    }

    /// Set keep-alive message
    pub fn keep_alive_message(mut self, message: impl Into<String>) -> Self {
        self.keep_alive_message = message.into();
        self
    }

    /// Disable keep-alive messages
    pub fn disable_keep_alive(self) -> Self {
        self.keep_alive_threshold(0)
    }
}
