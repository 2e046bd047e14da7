//! Player configuration
//!
//! Mirrors the attributes of the hosting player element: `host`, `user`,
//! `pass`, `insecure`, `venc`, `noaudio` and `substream`.

use std::time::Duration;

use crate::controller::ControllerConfig;
use crate::error::{Error, Result};
use crate::media::{CodecNegotiator, CodecSupport, MimeType};
use crate::session::DEFAULT_SUBSTREAM;
use crate::transport::{Credentials, TransportConfig};

/// Player configuration options
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Camera host, optionally with port (`192.168.1.20:8080`)
    pub host: String,

    /// Login user
    pub user: Option<String>,

    /// Login password
    pub pass: Option<String>,

    /// Use `ws://` instead of `wss://`
    pub insecure: bool,

    /// Video codec id (`h264hp`, `h264mp`, `h264bp`, `h265a`)
    pub venc: Option<String>,

    /// Leave the AAC codec out of the MIME
    pub noaudio: bool,

    /// Substream requested on start
    pub substream: String,

    /// Send the start command as soon as the connection opens
    pub autostart: bool,

    /// Reconnect after the connection drops
    pub reconnect: bool,

    /// WebSocket handshake timeout
    pub connect_timeout: Duration,

    /// Buffer controller options
    pub controller: ControllerConfig,
}

impl PlayerConfig {
    /// Create a config for the given camera host
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: None,
            pass: None,
            insecure: false,
            venc: None,
            noaudio: false,
            substream: DEFAULT_SUBSTREAM.to_string(),
            autostart: true,
            reconnect: false,
            connect_timeout: Duration::from_secs(3),
            controller: ControllerConfig::default(),
        }
    }

    /// Build a config from element-style attributes
    ///
    /// `insecure` and `noaudio` are presence flags. Unknown attributes are
    /// ignored. Fails if `host` is missing or empty.
    pub fn from_attributes<I, K, V>(attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::new(String::new());

        for (name, value) in attributes {
            match name.as_ref() {
                "host" => config.host = value.into(),
                "user" => config.user = Some(value.into()),
                "pass" => config.pass = Some(value.into()),
                "insecure" => config.insecure = true,
                "venc" => config.venc = Some(value.into()),
                "noaudio" => config.noaudio = true,
                "substream" => config.substream = value.into(),
                other => tracing::trace!(attribute = other, "Ignoring unknown attribute"),
            }
        }

        if config.host.is_empty() {
            return Err(Error::Config("missing host".into()));
        }
        Ok(config)
    }

    /// Set login credentials
    pub fn credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.pass = Some(pass.into());
        self
    }

    /// Use plain `ws://`
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Set video codec id
    pub fn venc(mut self, codec_id: impl Into<String>) -> Self {
        self.venc = Some(codec_id.into());
        self
    }

    /// Leave audio out of the negotiated MIME
    pub fn no_audio(mut self) -> Self {
        self.noaudio = true;
        self
    }

    /// Set substream
    pub fn substream(mut self, substream: impl Into<String>) -> Self {
        self.substream = substream.into();
        self
    }

    /// Enable or disable sending the start command on open
    pub fn autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    /// Enable or disable reconnecting
    pub fn reconnect(mut self, reconnect: bool) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Set buffer controller options
    pub fn controller(mut self, controller: ControllerConfig) -> Self {
        self.controller = controller;
        self
    }

    /// URL scheme, chosen by the `insecure` flag
    pub fn scheme(&self) -> &'static str {
        if self.insecure {
            "ws"
        } else {
            "wss"
        }
    }

    /// Full URL in `<scheme>://<user>:<pass>@<host>/ws` form
    pub fn ws_url(&self) -> String {
        match &self.user {
            Some(user) => format!(
                "{}://{}:{}@{}/ws",
                self.scheme(),
                user,
                self.pass.as_deref().unwrap_or_default(),
                self.host
            ),
            None => self.endpoint_url(),
        }
    }

    /// URL without credentials, safe to log
    pub fn endpoint_url(&self) -> String {
        format!("{}://{}/ws", self.scheme(), self.host)
    }

    /// Transport options derived from this config
    pub fn transport_config(&self) -> TransportConfig {
        let mut config =
            TransportConfig::new(self.endpoint_url()).connect_timeout(self.connect_timeout);
        if let Some(user) = &self.user {
            config = config.credentials(Credentials::new(
                user.clone(),
                self.pass.clone().unwrap_or_default(),
            ));
        }
        if self.reconnect {
            let delay = config.reconnect_delay;
            config = config.reconnect(delay);
        }
        config
    }

    /// Negotiate the decoder MIME for the configured codec
    pub fn negotiate<C: CodecSupport>(&self, negotiator: &CodecNegotiator<C>) -> MimeType {
        negotiator.negotiate(self.venc.as_deref(), !self.noaudio)
    }
}
