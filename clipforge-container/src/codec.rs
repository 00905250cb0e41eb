//! Codec, scaling, and resampling traits.
//!
//! The send/receive split mirrors the backend's contract: decoders may
//! buffer packets and emit frames out of order relative to the packets that
//! were sent; encoders buffer frames and must be flushed. Sending `None`
//! signals end of input and drains whatever the codec still holds.

use crate::format::{AudioCodec, VideoCodec};
use clipforge_core::error::Result;
use clipforge_core::frame::{PixelFormat, VideoFrame};
use clipforge_core::packet::{OwnedPacket, Packet};
use clipforge_core::rational::Rational;
use clipforge_core::sample::AudioFrame;
use clipforge_core::timestamp::TimeBase;
use std::fmt;

/// Encoder speed/quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Fastest encode, largest output.
    Ultrafast,
    /// Fast encode.
    Fast,
    /// Balanced default.
    #[default]
    Medium,
    /// Slow encode, smallest output.
    Slow,
}

impl Preset {
    /// Canonical preset name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ultrafast => "ultrafast",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
        }
    }

    /// Parse a preset name; unknown names fall back to the default.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ultrafast" => Self::Ultrafast,
            "fast" => Self::Fast,
            "slow" => Self::Slow,
            _ => Self::Medium,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rate-control settings for video encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality {
    /// Constant rate factor, clamped to 0..=51.
    pub crf: u8,
    /// Speed/quality preset.
    pub preset: Preset,
}

impl Quality {
    /// Create a quality setting, clamping `crf` into 0..=51.
    pub fn new(crf: i32, preset: Preset) -> Self {
        Self {
            crf: crf.clamp(0, 51) as u8,
            preset,
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self {
            crf: 23,
            preset: Preset::Medium,
        }
    }
}

/// Configuration for a video encoder instance.
#[derive(Debug, Clone)]
pub struct VideoEncoderConfig {
    /// Target codec.
    pub codec: VideoCodec,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Time base frames will be stamped in.
    pub time_base: TimeBase,
    /// Declared frame rate, if constant.
    pub frame_rate: Option<Rational>,
    /// Rate-control settings.
    pub quality: Quality,
}

/// Configuration for an audio encoder instance.
#[derive(Debug, Clone)]
pub struct AudioEncoderConfig {
    /// Target codec.
    pub codec: AudioCodec,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Target bit rate, if the codec uses one.
    pub bit_rate: Option<u64>,
}

/// One side of a scaling/pixel-format conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalerSpec {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel format.
    pub format: PixelFormat,
}

/// One side of a resampling conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResamplerSpec {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Video decoder.
pub trait VideoDecoder {
    /// Feed a packet, or `None` to start draining buffered frames.
    fn send_packet(&mut self, packet: Option<&Packet>) -> Result<()>;

    /// Receive the next decoded frame, or `None` if the decoder needs more
    /// input (or is fully drained after a `None` send).
    fn receive_frame(&mut self) -> Result<Option<VideoFrame>>;
}

/// Video encoder.
pub trait VideoEncoder {
    /// The time base encoded packets are stamped in.
    fn time_base(&self) -> TimeBase;

    /// Feed a frame, or `None` to flush.
    fn send_frame(&mut self, frame: Option<&VideoFrame>) -> Result<()>;

    /// Receive the next encoded packet, or `None` if the encoder needs more
    /// input (or is fully drained after a flush).
    fn receive_packet(&mut self) -> Result<Option<OwnedPacket>>;
}

/// Audio decoder.
pub trait AudioDecoder {
    /// Feed a packet, or `None` to start draining buffered frames.
    fn send_packet(&mut self, packet: Option<&Packet>) -> Result<()>;

    /// Receive the next decoded frame of planar f32 samples.
    fn receive_frame(&mut self) -> Result<Option<AudioFrame>>;
}

/// Audio encoder.
pub trait AudioEncoder {
    /// The time base encoded packets are stamped in.
    fn time_base(&self) -> TimeBase;

    /// The fixed number of samples per frame this encoder consumes, if any.
    fn frame_size(&self) -> Option<usize>;

    /// Feed a frame, or `None` to flush.
    fn send_frame(&mut self, frame: Option<&AudioFrame>) -> Result<()>;

    /// Receive the next encoded packet.
    fn receive_packet(&mut self) -> Result<Option<OwnedPacket>>;
}

/// Pixel-format and size conversion.
pub trait Scaler {
    /// Convert a frame from the source spec to the destination spec.
    fn convert(&mut self, frame: &VideoFrame) -> Result<VideoFrame>;
}

/// Sample-rate and channel-layout conversion.
pub trait Resampler {
    /// Convert a frame from the source spec to the destination spec.
    fn convert(&mut self, frame: &AudioFrame) -> Result<AudioFrame>;

    /// Drain any samples buffered by the conversion filter.
    fn flush(&mut self) -> Result<Option<AudioFrame>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_clamps_crf() {
        assert_eq!(Quality::new(-3, Preset::Medium).crf, 0);
        assert_eq!(Quality::new(99, Preset::Medium).crf, 51);
        assert_eq!(Quality::new(18, Preset::Medium).crf, 18);
    }

    #[test]
    fn test_preset_fallback() {
        assert_eq!(Preset::from_name("veryslow"), Preset::Medium);
        assert_eq!(Preset::from_name("ultrafast"), Preset::Ultrafast);
    }
}
