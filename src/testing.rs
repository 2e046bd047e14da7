//! Test doubles for the transport and sink seams

use std::cell::{Cell, RefCell};

use bytes::Bytes;

use crate::error::{Result, TransportError};
use crate::media::MediaFragment;
use crate::sink::{DecoderSink, SinkError};
use crate::transport::{ReadyState, Transport};

/// Transport that records sent text
#[derive(Debug, Default)]
pub struct MockTransport {
    open: Cell<bool>,
    sent: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn open() -> Self {
        let transport = Self::default();
        transport.set_open(true);
        transport
    }

    pub fn closed() -> Self {
        Self::default()
    }

    pub fn set_open(&self, open: bool) {
        self.open.set(open);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    pub fn count(&self, message: &str) -> usize {
        self.sent.borrow().iter().filter(|m| *m == message).count()
    }
}

impl Transport for MockTransport {
    fn ready_state(&self) -> ReadyState {
        if self.open.get() {
            ReadyState::Open
        } else {
            ReadyState::Closed
        }
    }

    fn send_text(&self, message: &str) -> Result<()> {
        if !self.open.get() {
            return Err(TransportError::NotOpen.into());
        }
        self.sent.borrow_mut().push(message.to_owned());
        Ok(())
    }
}

/// Sink that records appends
///
/// With `hold` set, every accepted append leaves the sink busy until
/// [`MockSink::finish`] is called. Payloads starting with `bad` are rejected.
#[derive(Debug, Default)]
pub struct MockSink {
    pub appended: Vec<Bytes>,
    pub hold: bool,
    busy: bool,
}

impl MockSink {
    /// Sink that completes every append instantly
    pub fn instant() -> Self {
        Self::default()
    }

    /// Sink that stays busy after each append
    pub fn holding() -> Self {
        Self {
            hold: true,
            ..Self::default()
        }
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Complete the in-flight append
    pub fn finish(&mut self) {
        self.busy = false;
    }
}

impl DecoderSink for MockSink {
    fn append(&mut self, fragment: MediaFragment) -> std::result::Result<(), SinkError> {
        if self.busy {
            return Err(SinkError::Busy);
        }
        if fragment.data().starts_with(b"bad") {
            return Err(SinkError::Rejected("malformed".into()));
        }
        self.appended.push(fragment.into_bytes());
        self.busy = self.hold;
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy
    }
}

/// Build a fragment from a static payload
pub fn frag(data: &'static [u8]) -> MediaFragment {
    MediaFragment::new(Bytes::from_static(data))
}
