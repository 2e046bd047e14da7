//! Buffer controller implementation

use std::collections::VecDeque;

use super::config::ControllerConfig;
use super::state::SessionState;
use crate::media::MediaFragment;
use crate::sink::DecoderSink;
use crate::stats::ControllerStats;
use crate::transport::Transport;

/// Feeds fragments from the transport into the decoder sink
///
/// All methods are synchronous and never block. They are meant to be called
/// from a single task, one event at a time.
pub struct BufferController<T: Transport, S: DecoderSink> {
    config: ControllerConfig,
    transport: T,
    /// Present only while the media target is open for appends
    sink: Option<S>,
    /// Fragments waiting for the sink, in arrival order
    queue: VecDeque<MediaFragment>,
    state: SessionState,
    /// Fragments received since the last keep-alive
    keep_alive_count: u32,
    stats: ControllerStats,
}

impl<T: Transport, S: DecoderSink> BufferController<T, S> {
    /// Create a controller with default configuration and no sink
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ControllerConfig::default())
    }

    /// Create a controller with custom configuration and no sink
    pub fn with_config(transport: T, config: ControllerConfig) -> Self {
        Self {
            config,
            transport,
            sink: None,
            queue: VecDeque::new(),
            state: SessionState::Idle,
            keep_alive_count: 0,
            stats: ControllerStats::new(),
        }
    }

    /// Attach the sink once the media target is open for appends
    ///
    /// Returns false (and keeps the current sink) if one is already attached.
    pub fn attach_sink(&mut self, sink: S) -> bool {
        if self.sink.is_some() {
            tracing::debug!("Sink already attached, ignoring");
            return false;
        }
        self.sink = Some(sink);
        true
    }

    /// Detach the sink when the media target goes away
    ///
    /// Also resets the controller so a later attach starts clean.
    pub fn detach_sink(&mut self) -> Option<S> {
        let sink = self.sink.take();
        self.reset();
        sink
    }

    /// Handle one inbound binary frame
    pub fn on_fragment_received(&mut self, payload: MediaFragment) {
        self.stats.fragments_received += 1;
        self.stats.bytes_received += payload.len() as u64;

        if self.sink.is_none() {
            self.stats.dropped += 1;
            tracing::trace!(bytes = payload.len(), "No sink attached, dropping fragment");
        } else if self.state.is_started() {
            self.queue.push_back(payload);
            self.stats.queued += 1;
            self.stats.observe_queue_depth(self.queue.len());
        } else {
            self.state = SessionState::Started;
            self.stats.direct_appends += 1;
            self.deliver(payload);
        }

        self.tick_keep_alive();
    }

    /// Handle an idle notification from the sink
    ///
    /// The notification may be stale, so the sink's busy flag is checked
    /// again before anything is dequeued.
    pub fn on_decoder_idle(&mut self) {
        let busy = match self.sink.as_ref() {
            Some(sink) => sink.is_busy(),
            None => return,
        };
        if busy {
            tracing::trace!("Idle notification while sink busy, ignoring");
            return;
        }

        match self.queue.pop_front() {
            Some(next) => {
                self.stats.dequeued += 1;
                self.deliver(next);
            }
            None => {
                // Queue ran empty: the next fragment must take the fast path
                self.state = SessionState::Idle;
            }
        }
    }

    /// Drop queued fragments and return to the initial state
    pub fn reset(&mut self) {
        if !self.queue.is_empty() {
            tracing::debug!(discarded = self.queue.len(), "Discarding queued fragments");
        }
        self.queue.clear();
        self.state = SessionState::Idle;
        self.keep_alive_count = 0;
        self.stats.resets += 1;
    }

    /// Append to the sink, moving past fragments the sink rejects
    ///
    /// A rejected append never makes the sink busy, so no idle notification
    /// will follow it. Treat the rejection as one instead.
    fn deliver(&mut self, mut fragment: MediaFragment) {
        loop {
            let sink = match self.sink.as_mut() {
                Some(sink) => sink,
                None => return,
            };

            if sink.is_busy() {
                // Put it back at the head; the sink's idle notification resumes delivery
                self.queue.push_front(fragment);
                self.state = SessionState::Started;
                return;
            }

            match sink.append(fragment) {
                Ok(()) => return,
                Err(e) => {
                    self.stats.append_failures += 1;
                    tracing::warn!(error = %e, "Failed to append fragment, discarding");
                }
            }

            match self.queue.pop_front() {
                Some(next) => {
                    self.stats.dequeued += 1;
                    fragment = next;
                }
                None => {
                    self.state = SessionState::Idle;
                    return;
                }
            }
        }
    }

    fn tick_keep_alive(&mut self) {
        if self.config.keep_alive_threshold == 0 {
            return;
        }

        // Keeps counting while closed, however long the outage
        self.keep_alive_count = self.keep_alive_count.saturating_add(1);
        if self.keep_alive_count >= self.config.keep_alive_threshold && self.transport.is_open() {
            self.keep_alive_count = 0;
            match self.transport.send_text(&self.config.keep_alive_message) {
                Ok(()) => {
                    self.stats.keep_alives_sent += 1;
                    tracing::trace!("Keep-alive sent");
                }
                Err(e) => tracing::warn!(error = %e, "Failed to send keep-alive"),
            }
        }
    }

    /// Current delivery state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of fragments waiting for the sink
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Fragments received since the last keep-alive
    pub fn keep_alive_count(&self) -> u32 {
        self.keep_alive_count
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn stats(&self) -> &ControllerStats {
        &self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    pub fn sink_mut(&mut self) -> Option<&mut S> {
        self.sink.as_mut()
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }
}
