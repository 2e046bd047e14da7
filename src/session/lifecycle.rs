//! Session lifecycle
//!
//! The streaming server starts pushing fragments after a
//! `livestream/<substream>` command and stops after `stop/livestream`.
//! Both commands only make sense on an open connection.

use crate::transport::Transport;

/// Command that stops the live stream
pub const STOP_COMMAND: &str = "stop/livestream";

/// Substream requested when none is configured
pub const DEFAULT_SUBSTREAM: &str = "12";

/// Command that starts the live stream for `substream`
pub fn start_command(substream: &str) -> String {
    format!("livestream/{}", substream)
}

/// Callback fired when the transport reports open
pub type ReadyCallback = Box<dyn FnMut(&Session, &dyn Transport) + Send>;

/// Start/stop protocol for one player
pub struct Session {
    substream: String,
    on_ready: Option<ReadyCallback>,
}

impl Session {
    /// Create a session for the given substream
    pub fn new(substream: impl Into<String>) -> Self {
        Self {
            substream: substream.into(),
            on_ready: None,
        }
    }

    /// Set the readiness callback
    ///
    /// Replaces any previous callback.
    pub fn on_ready<F>(&mut self, callback: F)
    where
        F: FnMut(&Session, &dyn Transport) + Send + 'static,
    {
        self.on_ready = Some(Box::new(callback));
    }

    /// Substream requested by `start`
    pub fn substream(&self) -> &str {
        &self.substream
    }

    /// Request the live stream
    ///
    /// Returns false, after logging, if the transport is not open.
    pub fn start<T: Transport + ?Sized>(&self, transport: &T) -> bool {
        self.send_command(transport, &start_command(&self.substream))
    }

    /// Stop the live stream
    ///
    /// Returns false, after logging, if the transport is not open.
    pub fn stop<T: Transport + ?Sized>(&self, transport: &T) -> bool {
        self.send_command(transport, STOP_COMMAND)
    }

    /// Transport reported open: fire the readiness callback
    pub fn handle_open(&mut self, transport: &dyn Transport) {
        tracing::info!(substream = %self.substream, "Session ready");

        if let Some(mut callback) = self.on_ready.take() {
            callback(self, transport);
            // Keep the callback unless it installed a replacement
            if self.on_ready.is_none() {
                self.on_ready = Some(callback);
            }
        }
    }

    fn send_command<T: Transport + ?Sized>(&self, transport: &T, command: &str) -> bool {
        let state = transport.ready_state();
        if !transport.is_open() {
            tracing::error!(state = %state, command = command, "WebSocket is not open");
            return false;
        }

        match transport.send_text(command) {
            Ok(()) => {
                tracing::debug!(command = command, "Command sent");
                true
            }
            Err(e) => {
                tracing::error!(command = command, error = %e, "Failed to send command");
                false
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSTREAM)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("substream", &self.substream)
            .field("on_ready", &self.on_ready.is_some())
            .finish()
    }
}
