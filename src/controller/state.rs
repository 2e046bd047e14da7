//! Delivery state of the buffer controller

/// Whether the decoder is presumed ready for a direct append
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Queue ran empty; the next fragment goes straight to the sink
    #[default]
    Idle,
    /// A fragment is with the sink; new fragments wait in the queue
    Started,
}

impl SessionState {
    pub fn is_started(&self) -> bool {
        *self == SessionState::Started
    }
}
