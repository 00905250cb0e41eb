//! Container and codec abstractions.
//!
//! This crate is the seam between clipforge and the media backend that owns
//! the actual demuxing, muxing, decoding, encoding, scaling, and resampling.
//! Clipforge never parses containers or implements codecs; it drives a
//! [`MediaBackend`] through the object-safe traits defined here.

pub mod backend;
pub mod codec;
pub mod format;
pub mod traits;

pub use backend::{MediaBackend, MuxerOptions};
pub use codec::{
    AudioDecoder, AudioEncoder, AudioEncoderConfig, Preset, Quality, Resampler, ResamplerSpec,
    Scaler, ScalerSpec, VideoDecoder, VideoEncoder, VideoEncoderConfig,
};
pub use format::{AudioCodec, ContainerFormat, SubtitleCodec, VideoCodec};
pub use traits::{
    find_stream, probe, AudioStreamInfo, Demuxer, Muxer, StreamInfo, SubtitleStreamInfo,
    TrackType, VideoStreamInfo,
};
