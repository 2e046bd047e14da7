//! Decoder sink backed by an async writer
//!
//! Fragments are written to any `AsyncWrite`: a pipe into an external
//! decoder process, a file, or stdout. The write happens on a background
//! task; the sink is busy from `append` until the fragment has been written
//! and flushed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::{DecoderSink, SinkError};
use crate::event::{Event, EventSender};
use crate::media::MediaFragment;

/// State shared with the writer task
#[derive(Debug, Default)]
struct Shared {
    busy: AtomicBool,
    closed: AtomicBool,
}

/// Sink that streams fragments into an `AsyncWrite`
pub struct WriterSink {
    tx: mpsc::UnboundedSender<Bytes>,
    shared: Arc<Shared>,
}

impl WriterSink {
    /// Spawn the writer task
    ///
    /// Idle and error notifications are posted to `events`. The task exits
    /// once the sink is dropped and any in-flight write has finished.
    pub fn spawn<W>(writer: W, events: EventSender) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared::default());
        tokio::spawn(write_loop(writer, rx, Arc::clone(&shared), events));

        Self { tx, shared }
    }

    /// Whether the writer has failed or stopped
    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }
}

impl DecoderSink for WriterSink {
    fn append(&mut self, fragment: MediaFragment) -> Result<(), SinkError> {
        if self.is_closed() {
            return Err(SinkError::Closed);
        }
        if fragment.is_empty() {
            return Err(SinkError::EmptyFragment);
        }
        if self.shared.busy.swap(true, Ordering::AcqRel) {
            return Err(SinkError::Busy);
        }

        if self.tx.send(fragment.into_bytes()).is_err() {
            self.shared.busy.store(false, Ordering::Release);
            self.shared.closed.store(true, Ordering::Release);
            return Err(SinkError::Closed);
        }
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::Acquire)
    }
}

async fn write_loop<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<Bytes>,
    shared: Arc<Shared>,
    events: EventSender,
) where
    W: AsyncWrite + Unpin,
{
    while let Some(data) = rx.recv().await {
        let len = data.len();
        let result = async {
            writer.write_all(&data).await?;
            writer.flush().await
        }
        .await;

        match result {
            Ok(()) => {
                tracing::trace!(bytes = len, "Fragment written");
                shared.busy.store(false, Ordering::Release);
                let _ = events.send(Event::DecoderIdle);
            }
            Err(e) => {
                tracing::error!(error = %e, "Decoder sink write failed");
                shared.closed.store(true, Ordering::Release);
                shared.busy.store(false, Ordering::Release);
                let _ = events.send(Event::DecoderError(e.to_string()));
                break;
            }
        }
    }

    tracing::debug!("Decoder sink writer stopped");
}
