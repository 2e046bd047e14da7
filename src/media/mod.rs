//! Media handling
//!
//! This module provides:
//! - The fragment type carried from the transport to the decoder
//! - Codec selection and container MIME negotiation

pub mod codec;
pub mod fragment;

pub use codec::{
    AcceptAll, CodecNegotiator, CodecSupport, MimeType, SupportedCodecs, VideoCodec, AUDIO_CODEC,
};
pub use fragment::MediaFragment;
