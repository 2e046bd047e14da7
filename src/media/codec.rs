//! Codec selection and MIME negotiation
//!
//! The camera advertises its encoder profile through a short id (`venc`).
//! The decoder, on the other hand, wants a container MIME string:
//!
//! ```text
//! video/mp4; codecs="<video-codec>[, <audio-codec>]"
//! ```
//!
//! Whether the decoder can actually handle that MIME is a property of the
//! runtime, so it is injected through [`CodecSupport`] instead of being looked
//! up globally. An unsupported MIME is logged and negotiation carries on,
//! since some runtimes under-report what they can play.

use std::collections::HashSet;
use std::fmt;

/// AAC-LC, the only audio codec the camera streams
pub const AUDIO_CODEC: &str = "mp4a.40.2";

/// Container type for every negotiated MIME
pub const CONTAINER: &str = "video/mp4";

/// Video encoder profiles the camera can be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VideoCodec {
    /// H.264 High profile (`h264hp`)
    H264High,
    /// H.264 Main profile (`h264mp`)
    H264Main,
    /// H.264 Baseline profile (`h264bp`), also the fallback
    #[default]
    H264Baseline,
    /// H.265 / HEVC (`h265a`)
    H265,
}

impl VideoCodec {
    /// Every known codec, in table order
    pub const ALL: [VideoCodec; 4] = [
        VideoCodec::H264High,
        VideoCodec::H264Main,
        VideoCodec::H264Baseline,
        VideoCodec::H265,
    ];

    /// Look up a codec by its configuration id
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "h264hp" => Some(VideoCodec::H264High),
            "h264mp" => Some(VideoCodec::H264Main),
            "h264bp" => Some(VideoCodec::H264Baseline),
            "h265a" => Some(VideoCodec::H265),
            _ => None,
        }
    }

    /// Configuration id
    pub fn id(&self) -> &'static str {
        match self {
            VideoCodec::H264High => "h264hp",
            VideoCodec::H264Main => "h264mp",
            VideoCodec::H264Baseline => "h264bp",
            VideoCodec::H265 => "h265a",
        }
    }

    /// RFC 6381 codec string
    pub fn codec_string(&self) -> &'static str {
        match self {
            VideoCodec::H264High => "avc1.64001E",
            VideoCodec::H264Main => "avc1.4d002a",
            VideoCodec::H264Baseline => "avc1.4D001E",
            VideoCodec::H265 => "hev1.2.4.L120.B0",
        }
    }
}

/// A negotiated container MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType {
    video: VideoCodec,
    audio: bool,
}

impl MimeType {
    pub fn new(video: VideoCodec, audio: bool) -> Self {
        Self { video, audio }
    }

    pub fn video_codec(&self) -> VideoCodec {
        self.video
    }

    pub fn has_audio(&self) -> bool {
        self.audio
    }

    /// Codec strings in the order they appear in the `codecs` parameter
    pub fn codecs(&self) -> Vec<&'static str> {
        let mut codecs = vec![self.video.codec_string()];
        if self.audio {
            codecs.push(AUDIO_CODEC);
        }
        codecs
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; codecs=\"{}\"", CONTAINER, self.codecs().join(", "))
    }
}

/// Decoder capability check
pub trait CodecSupport: Send + Sync {
    /// Whether the decoder can play the given MIME
    fn is_type_supported(&self, mime: &MimeType) -> bool;
}

/// Support check for sinks that pass bytes through without decoding
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl CodecSupport for AcceptAll {
    fn is_type_supported(&self, _mime: &MimeType) -> bool {
        true
    }
}

/// Support check against an explicit set of codec strings
#[derive(Debug, Clone, Default)]
pub struct SupportedCodecs {
    codecs: HashSet<String>,
}

impl SupportedCodecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a supported codec string
    pub fn with(mut self, codec: impl Into<String>) -> Self {
        self.codecs.insert(codec.into());
        self
    }

    /// Every codec in the static table plus AAC
    pub fn all_known() -> Self {
        VideoCodec::ALL
            .iter()
            .fold(Self::new(), |set, codec| set.with(codec.codec_string()))
            .with(AUDIO_CODEC)
    }
}

impl CodecSupport for SupportedCodecs {
    fn is_type_supported(&self, mime: &MimeType) -> bool {
        mime.codecs().iter().all(|c| self.codecs.contains(*c))
    }
}

/// Picks the container MIME for the configured codec
pub struct CodecNegotiator<C: CodecSupport = AcceptAll> {
    support: C,
}

impl<C: CodecSupport> CodecNegotiator<C> {
    pub fn new(support: C) -> Self {
        Self { support }
    }

    /// Derive the MIME for `codec_id`, falling back to H.264 Baseline
    ///
    /// Never fails: an unknown id or unsupported result is logged.
    pub fn negotiate(&self, codec_id: Option<&str>, audio_enabled: bool) -> MimeType {
        let video = match codec_id {
            Some(id) => VideoCodec::from_id(id).unwrap_or_else(|| {
                tracing::warn!(venc = id, "Unknown video codec id, using default");
                VideoCodec::default()
            }),
            None => VideoCodec::default(),
        };

        let mime = MimeType::new(video, audio_enabled);
        if !self.support.is_type_supported(&mime) {
            tracing::error!(mime = %mime, "MIME type not supported");
        } else {
            tracing::debug!(mime = %mime, "Negotiated MIME type");
        }
        mime
    }
}

impl Default for CodecNegotiator<AcceptAll> {
    fn default() -> Self {
        Self::new(AcceptAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_table() {
        for codec in VideoCodec::ALL {
            assert_eq!(VideoCodec::from_id(codec.id()), Some(codec));
        }
        assert_eq!(VideoCodec::from_id("mjpeg"), None);
        assert_eq!(VideoCodec::H265.codec_string(), "hev1.2.4.L120.B0");
    }

    #[test]
    fn test_mime_with_audio() {
        let negotiator = CodecNegotiator::default();
        let mime = negotiator.negotiate(Some("h264hp"), true);

        assert_eq!(
            mime.to_string(),
            "video/mp4; codecs=\"avc1.64001E, mp4a.40.2\""
        );
    }

    #[test]
    fn test_mime_without_audio() {
        let negotiator = CodecNegotiator::default();
        let mime = negotiator.negotiate(Some("h265a"), false);

        assert_eq!(mime.to_string(), "video/mp4; codecs=\"hev1.2.4.L120.B0\"");
        assert!(!mime.has_audio());
    }

    #[test]
    fn test_unknown_codec_falls_back_to_baseline() {
        let negotiator = CodecNegotiator::default();

        let unknown = negotiator.negotiate(Some("vp9"), false);
        assert_eq!(unknown.video_codec(), VideoCodec::H264Baseline);

        let missing = negotiator.negotiate(None, true);
        assert_eq!(
            missing.to_string(),
            "video/mp4; codecs=\"avc1.4D001E, mp4a.40.2\""
        );
    }

    #[test]
    fn test_unsupported_mime_still_negotiated() {
        // Decoder without HEVC or audio support
        let support = SupportedCodecs::new().with("avc1.4D001E");
        let negotiator = CodecNegotiator::new(support);

        let mime = negotiator.negotiate(Some("h265a"), true);
        assert_eq!(mime.video_codec(), VideoCodec::H265);
        assert!(mime.has_audio());
    }

    #[test]
    fn test_supported_codecs() {
        let support = SupportedCodecs::all_known();
        assert!(support.is_type_supported(&MimeType::new(VideoCodec::H265, true)));

        let video_only = SupportedCodecs::new().with("avc1.64001E");
        assert!(video_only.is_type_supported(&MimeType::new(VideoCodec::H264High, false)));
        assert!(!video_only.is_type_supported(&MimeType::new(VideoCodec::H264High, true)));
    }
}
