//! Statistics for the buffer controller and player session

use std::time::{Duration, Instant};

/// Buffer controller counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerStats {
    /// Fragments handed to the controller
    pub fragments_received: u64,
    /// Bytes handed to the controller
    pub bytes_received: u64,
    /// Fragments appended on the fast path
    pub direct_appends: u64,
    /// Fragments pushed onto the queue
    pub queued: u64,
    /// Fragments appended from the queue
    pub dequeued: u64,
    /// Appends the sink rejected
    pub append_failures: u64,
    /// Fragments dropped because no sink was attached
    pub dropped: u64,
    /// Keep-alive messages sent
    pub keep_alives_sent: u64,
    /// Deepest the queue has been
    pub max_queue_depth: usize,
    /// Number of resets
    pub resets: u64,
}

impl ControllerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the queue depth after an enqueue
    pub fn observe_queue_depth(&mut self, depth: usize) {
        if depth > self.max_queue_depth {
            self.max_queue_depth = depth;
        }
    }
}

/// Player session statistics
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// When the player started
    pub started_at: Instant,
    /// Number of transport-open transitions
    pub connects: u64,
    /// Number of transport-closed transitions
    pub disconnects: u64,
    /// Transport errors observed
    pub transport_errors: u64,
    /// Decoder fatal errors observed
    pub decoder_errors: u64,
    /// Text frames received (ignored)
    pub text_messages: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            connects: 0,
            disconnects: 0,
            transport_errors: 0,
            decoder_errors: 0,
            text_messages: 0,
        }
    }

    /// Get duration since the player started
    pub fn duration(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Average bitrate in bits per second over `duration`
pub fn bitrate(bytes: u64, duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if secs > 0 {
        (bytes * 8) / secs
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_stats_new() {
        let stats = ControllerStats::new();
        assert_eq!(stats.fragments_received, 0);
        assert_eq!(stats.direct_appends, 0);
        assert_eq!(stats.queued, 0);
        assert_eq!(stats.max_queue_depth, 0);
    }

    #[test]
    fn test_observe_queue_depth_keeps_maximum() {
        let mut stats = ControllerStats::new();
        stats.observe_queue_depth(3);
        stats.observe_queue_depth(1);
        stats.observe_queue_depth(5);
        stats.observe_queue_depth(2);

        assert_eq!(stats.max_queue_depth, 5);
    }

    #[test]
    fn test_bitrate() {
        // 1,000,000 bytes * 8 bits / 10 seconds = 800,000 bps
        assert_eq!(bitrate(1_000_000, Duration::from_secs(10)), 800_000);
        assert_eq!(bitrate(1_000_000, Duration::ZERO), 0);
    }

    #[test]
    fn test_session_stats_new() {
        let stats = SessionStats::new();
        assert_eq!(stats.connects, 0);
        assert_eq!(stats.decoder_errors, 0);
        assert!(stats.duration() < Duration::from_secs(60));
    }
}
