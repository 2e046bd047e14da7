//! Live stream player
//!
//! The player is a single task that owns the buffer controller, the session
//! and (through the controller) the transport and sink. Collaborators post
//! [`Event`]s; the player handles them strictly one at a time.

use std::ops::ControlFlow;

use tokio::io::AsyncWrite;

use super::config::PlayerConfig;
use crate::controller::BufferController;
use crate::error::Result;
use crate::event::{self, Event, EventReceiver, EventSender};
use crate::media::{CodecNegotiator, MimeType};
use crate::session::Session;
use crate::sink::{DecoderSink, WriterSink};
use crate::stats::{bitrate, ControllerStats, SessionStats};
use crate::transport::{Transport, WsTransport};

/// Handle for the owning application
///
/// Cheap to clone; every method posts an event and returns whether the
/// player task was still there to receive it.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    tx: EventSender,
}

impl PlayerHandle {
    pub fn new(tx: EventSender) -> Self {
        Self { tx }
    }

    /// Request the live stream
    pub fn start(&self) -> bool {
        self.post(Event::Start)
    }

    /// Stop the live stream
    pub fn stop(&self) -> bool {
        self.post(Event::Stop)
    }

    /// Tear down the media target
    pub fn close_source(&self) -> bool {
        self.post(Event::SourceClosed)
    }

    /// Stop the player task
    pub fn shutdown(&self) -> bool {
        self.post(Event::Shutdown)
    }

    /// Sender for custom transports or sinks
    pub fn events(&self) -> EventSender {
        self.tx.clone()
    }

    fn post(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Live stream player
///
/// # Example
/// ```no_run
/// use ws_player_rs::client::{Player, PlayerConfig};
///
/// # async fn example() -> ws_player_rs::error::Result<()> {
/// let config = PlayerConfig::new("192.168.1.20")
///     .credentials("admin", "instar")
///     .venc("h264hp");
///
/// let (mut player, handle) = Player::connect(config, tokio::io::stdout())?;
///
/// tokio::spawn(async move {
///     tokio::signal::ctrl_c().await.ok();
///     handle.stop();
///     handle.shutdown();
/// });
///
/// player.run().await;
/// player.close().await;
/// # Ok(())
/// # }
/// ```
pub struct Player<T: Transport, S: DecoderSink> {
    controller: BufferController<T, S>,
    session: Session,
    events: EventReceiver,
    mime: Option<MimeType>,
    stats: SessionStats,
}

impl<T: Transport, S: DecoderSink> Player<T, S> {
    /// Create a player around an existing transport
    ///
    /// No sink is attached yet; fragments are dropped until
    /// [`attach_sink`](Self::attach_sink) is called.
    pub fn new(config: &PlayerConfig, transport: T, events: EventReceiver) -> Self {
        let mut session = Session::new(config.substream.clone());
        if config.autostart {
            session.on_ready(|session, transport| {
                session.start(transport);
            });
        }

        Self {
            controller: BufferController::with_config(transport, config.controller.clone()),
            session,
            events,
            mime: None,
            stats: SessionStats::new(),
        }
    }

    /// The media target is open for appends
    pub fn attach_sink(&mut self, sink: S) -> bool {
        self.controller.attach_sink(sink)
    }

    /// Record the MIME negotiated for the sink
    pub fn set_mime(&mut self, mime: MimeType) {
        self.mime = Some(mime);
    }

    /// Process events until shutdown or until every sender is gone
    pub async fn run(&mut self) {
        tracing::info!("Player started");

        while let Some(event) = self.events.recv().await {
            if self.handle_event(event).is_break() {
                break;
            }
        }

        let stats = self.controller.stats();
        let duration = self.stats.duration();
        tracing::info!(
            fragments = stats.fragments_received,
            bytes = stats.bytes_received,
            duration_secs = duration.as_secs(),
            bitrate_bps = bitrate(stats.bytes_received, duration),
            queued = stats.queued,
            max_queue_depth = stats.max_queue_depth,
            append_failures = stats.append_failures,
            keep_alives = stats.keep_alives_sent,
            "Player stopped"
        );
    }

    /// Handle a single event
    pub fn handle_event(&mut self, event: Event) -> ControlFlow<()> {
        match event {
            Event::FragmentArrived(fragment) => {
                self.controller.on_fragment_received(fragment);
            }
            Event::TextReceived(text) => {
                self.stats.text_messages += 1;
                tracing::trace!(len = text.len(), "Ignoring text message");
            }
            Event::DecoderIdle => {
                self.controller.on_decoder_idle();
            }
            Event::DecoderError(message) => {
                self.stats.decoder_errors += 1;
                tracing::error!(
                    error = %message,
                    mime = ?self.mime.as_ref().map(|m| m.to_string()),
                    "Media source error: probably a decoding error. Has the correct video codec been selected?"
                );
            }
            Event::TransportOpen => {
                self.stats.connects += 1;
                self.session.handle_open(self.controller.transport());
            }
            Event::TransportClosed => {
                self.stats.disconnects += 1;
                tracing::info!(queued = self.controller.queue_len(), "Connection closed");
            }
            Event::TransportError(message) => {
                self.stats.transport_errors += 1;
                tracing::error!(error = %message, "WebSocket connection error");
            }
            Event::SourceClosed => {
                if self.controller.detach_sink().is_some() {
                    tracing::info!("Media source closed");
                }
            }
            Event::Start => {
                self.session.start(self.controller.transport());
            }
            Event::Stop => {
                self.session.stop(self.controller.transport());
            }
            Event::Shutdown => {
                tracing::debug!("Shutdown requested");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    pub fn controller(&self) -> &BufferController<T, S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut BufferController<T, S> {
        &mut self.controller
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn mime(&self) -> Option<&MimeType> {
        self.mime.as_ref()
    }

    pub fn controller_stats(&self) -> &ControllerStats {
        self.controller.stats()
    }

    pub fn session_stats(&self) -> &SessionStats {
        &self.stats
    }
}

impl Player<WsTransport, WriterSink> {
    /// Connect to the camera and stream fragments into `writer`
    ///
    /// Negotiates the MIME, starts the WebSocket transport and attaches a
    /// [`WriterSink`]. Call [`run`](Self::run) to start processing.
    pub fn connect<W>(config: PlayerConfig, writer: W) -> Result<(Self, PlayerHandle)>
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mime = config.negotiate(&CodecNegotiator::default());
        tracing::info!(url = %config.endpoint_url(), mime = %mime, "Creating player");

        let (tx, rx) = event::channel();
        let transport = WsTransport::connect(config.transport_config(), tx.clone())?;

        let mut player = Player::new(&config, transport, rx);
        player.set_mime(mime);
        player.attach_sink(WriterSink::spawn(writer, tx.clone()));

        Ok((player, PlayerHandle::new(tx)))
    }

    /// Close the connection once [`run`](Self::run) has returned
    ///
    /// Commands the transport already accepted (such as a final
    /// `stop/livestream`) are sent before the Close frame.
    pub async fn close(&mut self) {
        self.controller.transport_mut().close().await;
    }
}
