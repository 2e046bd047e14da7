//! Transport configuration

use std::time::Duration;

/// Basic-auth credentials for the WebSocket handshake
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("pass", &"***")
            .finish()
    }
}

/// WebSocket transport options
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Endpoint URL without userinfo, e.g. `wss://camera.local/ws`
    pub url: String,

    /// Credentials sent as an `Authorization: Basic` header
    pub credentials: Option<Credentials>,

    /// Handshake must complete within this time
    pub connect_timeout: Duration,

    /// Reconnect after the connection drops
    pub reconnect: bool,

    /// Delay between a disconnect and the next attempt
    pub reconnect_delay: Duration,

    /// How long `close` waits for queued commands and the Close frame
    pub close_timeout: Duration,
}

impl TransportConfig {
    /// Create a config for the given endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
            connect_timeout: Duration::from_secs(3),
            reconnect: false,
            reconnect_delay: Duration::from_secs(1),
            close_timeout: Duration::from_secs(2),
        }
    }

    /// Set credentials
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Reconnect after disconnects, waiting `delay` between attempts
    pub fn reconnect(mut self, delay: Duration) -> Self {
        self.reconnect = true;
        self.reconnect_delay = delay;
        self
    }

    /// Set close timeout
    pub fn close_timeout(mut self, timeout: Duration) -> Self {
        self.close_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransportConfig::new("ws://127.0.0.1/ws");

        assert_eq!(config.url, "ws://127.0.0.1/ws");
        assert!(config.credentials.is_none());
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(!config.reconnect);
        assert_eq!(config.close_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_builder_chaining() {
        let config = TransportConfig::new("wss://cam/ws")
            .credentials(Credentials::new("admin", "secret"))
            .connect_timeout(Duration::from_secs(10))
            .reconnect(Duration::from_millis(500))
            .close_timeout(Duration::from_secs(5));

        assert_eq!(config.credentials, Some(Credentials::new("admin", "secret")));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.reconnect);
        assert_eq!(config.reconnect_delay, Duration::from_millis(500));
        assert_eq!(config.close_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("admin", "secret"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("secret"));
    }
}
