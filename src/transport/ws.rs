//! WebSocket transport
//!
//! A background task owns the socket. Inbound frames become player events;
//! outbound text commands reach the task through a channel. When
//! reconnecting is enabled the task dials again after a drop, and each
//! successful connect posts a fresh `TransportOpen`.
//!
//! Closing (or dropping) the handle closes the command channel. The task
//! sends every command already accepted by `send_text`, then a Close frame,
//! and stops.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::config::TransportConfig;
use super::{ReadyState, Transport};
use crate::error::{Error, Result, TransportError};
use crate::event::{Event, EventSender};
use crate::media::MediaFragment;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Why a connection ended
enum Exit {
    /// Remote closed or the socket failed
    Disconnected,
    /// The transport handle was dropped or closed
    Shutdown,
}

/// WebSocket transport handle
pub struct WsTransport {
    outbound: Option<mpsc::UnboundedSender<String>>,
    state: Arc<AtomicU8>,
    task: JoinHandle<()>,
    close_timeout: Duration,
}

impl WsTransport {
    /// Start connecting in the background
    ///
    /// Returns immediately; `Event::TransportOpen` is posted to `events` once
    /// the handshake completes. Fails only if the request cannot be built.
    pub fn connect(config: TransportConfig, events: EventSender) -> Result<Self> {
        // Validate the URL up front so misconfiguration surfaces at setup
        build_request(&config)?;

        let close_timeout = config.close_timeout;
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let state = Arc::new(AtomicU8::new(ReadyState::Connecting as u8));
        let task = tokio::spawn(run(config, outbound_rx, Arc::clone(&state), events));

        Ok(Self {
            outbound: Some(outbound),
            state,
            task,
            close_timeout,
        })
    }

    /// Flush pending commands, send a Close frame and stop reconnecting
    ///
    /// Waits up to `close_timeout` for the background task, then aborts it.
    /// Calling this again is a no-op.
    pub async fn close(&mut self) {
        if self.outbound.take().is_none() {
            return;
        }
        self.state.store(ReadyState::Closing as u8, Ordering::Release);

        if tokio::time::timeout(self.close_timeout, &mut self.task)
            .await
            .is_err()
        {
            tracing::warn!(timeout = ?self.close_timeout, "WebSocket close timed out, aborting");
            self.task.abort();
            self.state.store(ReadyState::Closed as u8, Ordering::Release);
        }
    }
}

impl Transport for WsTransport {
    fn ready_state(&self) -> ReadyState {
        ReadyState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn send_text(&self, message: &str) -> Result<()> {
        if !self.is_open() {
            return Err(TransportError::NotOpen.into());
        }
        let outbound = self
            .outbound
            .as_ref()
            .ok_or(Error::Transport(TransportError::Closed))?;
        outbound
            .send(message.to_owned())
            .map_err(|_| Error::Transport(TransportError::Closed))
    }
}

fn build_request(config: &TransportConfig) -> Result<Request> {
    let mut request = config.url.as_str().into_client_request()?;

    if let Some(creds) = &config.credentials {
        let token = BASE64_STANDARD.encode(format!("{}:{}", creds.user, creds.pass));
        let value = HeaderValue::from_str(&format!("Basic {}", token))
            .map_err(|e| Error::Config(format!("invalid credentials: {}", e)))?;
        request.headers_mut().insert(AUTHORIZATION, value);
    }

    Ok(request)
}

async fn connect_once(config: &TransportConfig) -> Result<Socket> {
    let request = build_request(config)?;
    let (socket, response) =
        tokio::time::timeout(config.connect_timeout, tokio_tungstenite::connect_async(request))
            .await
            .map_err(|_| Error::Transport(TransportError::ConnectTimeout))??;

    tracing::debug!(status = %response.status(), "WebSocket handshake complete");
    Ok(socket)
}

async fn run(
    config: TransportConfig,
    mut outbound: mpsc::UnboundedReceiver<String>,
    state: Arc<AtomicU8>,
    events: EventSender,
) {
    loop {
        state.store(ReadyState::Connecting as u8, Ordering::Release);
        tracing::debug!(url = %config.url, "Connecting");

        let exit = match connect_once(&config).await {
            Ok(socket) => {
                state.store(ReadyState::Open as u8, Ordering::Release);
                tracing::info!(url = %config.url, "WebSocket connection open");
                let _ = events.send(Event::TransportOpen);

                let exit = pump(socket, &mut outbound, &state, &events).await;

                state.store(ReadyState::Closed as u8, Ordering::Release);
                let _ = events.send(Event::TransportClosed);
                exit
            }
            Err(e) => {
                state.store(ReadyState::Closed as u8, Ordering::Release);
                tracing::error!(url = %config.url, error = %e, "WebSocket connection error");
                let _ = events.send(Event::TransportError(e.to_string()));
                Exit::Disconnected
            }
        };

        if matches!(exit, Exit::Shutdown)
            || !config.reconnect
            || events.is_closed()
            || discard_stale(&mut outbound)
        {
            break;
        }

        tokio::time::sleep(config.reconnect_delay).await;
    }

    tracing::debug!(url = %config.url, "WebSocket transport stopped");
}

/// Drop commands left over from the lost connection
///
/// Returns true once the handle is gone and nothing is left to send.
fn discard_stale(outbound: &mut mpsc::UnboundedReceiver<String>) -> bool {
    loop {
        match outbound.try_recv() {
            Ok(text) => tracing::debug!(command = %text, "Discarding command for lost connection"),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => return true,
        }
    }
}

async fn pump(
    socket: Socket,
    outbound: &mut mpsc::UnboundedReceiver<String>,
    state: &AtomicU8,
    events: &EventSender,
) -> Exit {
    let (mut write, mut read) = socket.split();

    loop {
        tokio::select! {
            inbound = read.next() => match inbound {
                Some(Ok(Message::Binary(data))) => {
                    let _ = events.send(Event::FragmentArrived(MediaFragment::new(data)));
                }
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(Event::TextReceived(text));
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(frame = ?frame, "WebSocket closed by peer");
                    return Exit::Disconnected;
                }
                // Ping/Pong are answered by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(error = %e, "WebSocket read error");
                    let _ = events.send(Event::TransportError(e.to_string()));
                    return Exit::Disconnected;
                }
                None => return Exit::Disconnected,
            },
            command = outbound.recv() => match command {
                Some(text) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        tracing::error!(error = %e, "WebSocket send error");
                        let _ = events.send(Event::TransportError(e.to_string()));
                        return Exit::Disconnected;
                    }
                }
                None => {
                    state.store(ReadyState::Closing as u8, Ordering::Release);
                    let _ = write.send(Message::Close(None)).await;
                    return Exit::Shutdown;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event;
    use crate::transport::Credentials;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::handshake::server::{Request as ServerRequest, Response};

    #[test]
    fn test_build_request_sets_basic_auth() {
        let config = TransportConfig::new("ws://127.0.0.1:8080/ws")
            .credentials(Credentials::new("admin", "instar"));
        let request = build_request(&config).unwrap();

        // base64("admin:instar")
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Basic YWRtaW46aW5zdGFy"
        );
        assert_eq!(request.uri().path(), "/ws");
    }

    #[test]
    fn test_build_request_rejects_bad_url() {
        let config = TransportConfig::new("not a url");
        assert!(build_request(&config).is_err());
    }

    #[tokio::test]
    async fn test_send_before_open_fails() {
        // Nothing listens on this port; the connect attempt just fails
        let config = TransportConfig::new("ws://127.0.0.1:9/ws");
        let (tx, _rx) = event::channel();
        let transport = WsTransport::connect(config, tx).unwrap();

        let result = transport.send_text("keep-alive");
        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::NotOpen))
        ));
    }

    /// Accept one client and collect its messages up to the Close frame
    async fn collect_until_close(listener: TcpListener) -> Vec<Message> {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        let mut received = Vec::new();
        while let Some(Ok(message)) = ws.next().await {
            let is_close = message.is_close();
            received.push(message);
            if is_close {
                break;
            }
        }
        received
    }

    #[tokio::test]
    async fn test_pending_command_flushed_on_drop() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(collect_until_close(listener));

        let (tx, mut rx) = event::channel();
        let transport =
            WsTransport::connect(TransportConfig::new(format!("ws://{}/ws", addr)), tx).unwrap();
        assert_eq!(rx.recv().await, Some(Event::TransportOpen));

        transport.send_text("stop/livestream").unwrap();
        drop(transport);

        assert_eq!(
            server.await.unwrap(),
            vec![Message::Text("stop/livestream".into()), Message::Close(None)]
        );
        assert_eq!(rx.recv().await, Some(Event::TransportClosed));
    }

    #[tokio::test]
    async fn test_close_flushes_then_stops() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(collect_until_close(listener));

        let config = TransportConfig::new(format!("ws://{}/ws", addr))
            .reconnect(Duration::from_millis(10));
        let (tx, mut rx) = event::channel();
        let mut transport = WsTransport::connect(config, tx).unwrap();
        assert_eq!(rx.recv().await, Some(Event::TransportOpen));

        transport.send_text("keep-alive").unwrap();
        transport.send_text("stop/livestream").unwrap();
        transport.close().await;

        assert_eq!(transport.ready_state(), ReadyState::Closed);
        assert!(matches!(
            transport.send_text("livestream/12"),
            Err(Error::Transport(_))
        ));
        // Closing twice does nothing
        transport.close().await;

        assert_eq!(
            server.await.unwrap(),
            vec![
                Message::Text("keep-alive".into()),
                Message::Text("stop/livestream".into()),
                Message::Close(None),
            ]
        );
        // Reconnect is enabled but a closed handle ends the task
        assert_eq!(rx.recv().await, Some(Event::TransportClosed));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_exchange_with_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut auth = None;
            let mut ws = tokio_tungstenite::accept_hdr_async(
                stream,
                |req: &ServerRequest, resp: Response| {
                    auth = req.headers().get(AUTHORIZATION).cloned();
                    Ok(resp)
                },
            )
            .await
            .unwrap();

            ws.send(Message::Binary(vec![1, 2, 3])).await.unwrap();
            ws.send(Message::Text("hello".into())).await.unwrap();

            let command = ws.next().await.unwrap().unwrap();
            (auth, command)
        });

        let config = TransportConfig::new(format!("ws://{}/ws", addr))
            .credentials(Credentials::new("admin", "instar"));
        let (tx, mut rx) = event::channel();
        let transport = WsTransport::connect(config, tx).unwrap();

        assert_eq!(rx.recv().await, Some(Event::TransportOpen));
        assert!(transport.is_open());
        assert_eq!(
            rx.recv().await,
            Some(Event::FragmentArrived(MediaFragment::new(vec![1, 2, 3])))
        );
        assert_eq!(rx.recv().await, Some(Event::TextReceived("hello".into())));

        transport.send_text("livestream/12").unwrap();

        let (auth, command) = server.await.unwrap();
        assert_eq!(auth.unwrap(), "Basic YWRtaW46aW5zdGFy");
        assert_eq!(command, Message::Text("livestream/12".into()));
    }
}
