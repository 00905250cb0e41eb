//! The media backend factory.

use crate::codec::{
    AudioDecoder, AudioEncoder, AudioEncoderConfig, Resampler, ResamplerSpec, Scaler, ScalerSpec,
    VideoDecoder, VideoEncoder, VideoEncoderConfig,
};
use crate::format::ContainerFormat;
use crate::traits::{Demuxer, Muxer, StreamInfo};
use clipforge_core::error::Result;
use clipforge_core::memio::MemoryReader;

/// Options for creating a muxer.
#[derive(Debug, Clone, Copy)]
pub struct MuxerOptions {
    /// Target container format.
    pub format: ContainerFormat,
    /// Produce a fragmented container suitable for streaming (MP4 only;
    /// ignored by formats without a fragmented profile).
    pub fragmented: bool,
}

impl MuxerOptions {
    /// Plain (non-fragmented) options for a format.
    pub fn new(format: ContainerFormat) -> Self {
        Self {
            format,
            fragmented: false,
        }
    }

    /// Request fragmented output.
    pub fn fragmented(format: ContainerFormat) -> Self {
        Self {
            format,
            fragmented: true,
        }
    }
}

/// Factory bundle for everything the media library collaborator provides:
/// demuxing, muxing, codecs, scaling, and resampling.
///
/// Implementations wrap a real media library; the test suite ships a
/// synthetic backend. Every factory call is independent; the returned
/// objects are single-use session state.
pub trait MediaBackend {
    /// Open a demuxer over an in-memory input buffer.
    fn open_input<'a>(&self, reader: MemoryReader<'a>) -> Result<Box<dyn Demuxer + 'a>>;

    /// Create a muxer that accumulates output in memory.
    fn create_muxer(&self, options: MuxerOptions) -> Result<Box<dyn Muxer>>;

    /// Create a decoder for a video stream.
    fn video_decoder(&self, stream: &StreamInfo) -> Result<Box<dyn VideoDecoder>>;

    /// Create a video encoder.
    fn video_encoder(&self, config: &VideoEncoderConfig) -> Result<Box<dyn VideoEncoder>>;

    /// Create a decoder for an audio stream.
    fn audio_decoder(&self, stream: &StreamInfo) -> Result<Box<dyn AudioDecoder>>;

    /// Create an audio encoder.
    fn audio_encoder(&self, config: &AudioEncoderConfig) -> Result<Box<dyn AudioEncoder>>;

    /// Create a pixel-format/size converter.
    fn scaler(&self, src: ScalerSpec, dst: ScalerSpec) -> Result<Box<dyn Scaler>>;

    /// Create a sample-rate/channel-layout converter.
    fn resampler(&self, src: ResamplerSpec, dst: ResamplerSpec) -> Result<Box<dyn Resampler>>;
}
