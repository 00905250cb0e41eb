//! Demuxer and muxer traits plus stream descriptions.

use crate::format::{AudioCodec, ContainerFormat, SubtitleCodec, VideoCodec};
use clipforge_core::error::Result;
use clipforge_core::meta::Metadata;
use clipforge_core::packet::{OwnedPacket, Packet};
use clipforge_core::rational::Rational;
use clipforge_core::timestamp::{Duration, TimeBase, Timestamp};

/// Track type in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackType {
    /// Video track.
    Video,
    /// Audio track.
    Audio,
    /// Subtitle track.
    Subtitle,
    /// Data/other track.
    Data,
}

impl TrackType {
    /// Lowercase name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
            Self::Data => "data",
        }
    }
}

/// Video stream parameters.
#[derive(Debug, Clone)]
pub struct VideoStreamInfo {
    /// Codec.
    pub codec: VideoCodec,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frame rate, if the container declares one.
    pub frame_rate: Option<Rational>,
}

/// Audio stream parameters.
#[derive(Debug, Clone)]
pub struct AudioStreamInfo {
    /// Codec.
    pub codec: AudioCodec,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels.
    pub channels: u16,
    /// Bit rate, if known.
    pub bit_rate: Option<u64>,
}

/// Subtitle stream parameters.
#[derive(Debug, Clone)]
pub struct SubtitleStreamInfo {
    /// Codec.
    pub codec: SubtitleCodec,
    /// Language tag (ISO 639), if declared.
    pub language: Option<String>,
}

/// Description of one elementary stream.
#[derive(Debug, Clone)]
pub struct StreamInfo {
    /// Stream index within the container.
    pub index: usize,
    /// Track type.
    pub track_type: TrackType,
    /// Time base for this stream's timestamps.
    pub time_base: TimeBase,
    /// Duration in time base units, if known.
    pub duration: Option<i64>,
    /// Stream-level metadata.
    pub metadata: Metadata,
    /// Video parameters, when `track_type` is video.
    pub video: Option<VideoStreamInfo>,
    /// Audio parameters, when `track_type` is audio.
    pub audio: Option<AudioStreamInfo>,
    /// Subtitle parameters, when `track_type` is subtitle.
    pub subtitle: Option<SubtitleStreamInfo>,
}

impl StreamInfo {
    /// Describe a video stream.
    pub fn video(index: usize, time_base: TimeBase, info: VideoStreamInfo) -> Self {
        Self {
            index,
            track_type: TrackType::Video,
            time_base,
            duration: None,
            metadata: Metadata::new(),
            video: Some(info),
            audio: None,
            subtitle: None,
        }
    }

    /// Describe an audio stream.
    pub fn audio(index: usize, time_base: TimeBase, info: AudioStreamInfo) -> Self {
        Self {
            index,
            track_type: TrackType::Audio,
            time_base,
            duration: None,
            metadata: Metadata::new(),
            video: None,
            audio: Some(info),
            subtitle: None,
        }
    }

    /// Describe a subtitle stream.
    pub fn subtitle(index: usize, time_base: TimeBase, info: SubtitleStreamInfo) -> Self {
        Self {
            index,
            track_type: TrackType::Subtitle,
            time_base,
            duration: None,
            metadata: Metadata::new(),
            video: None,
            audio: None,
            subtitle: Some(info),
        }
    }

    /// Whether this is a video stream.
    pub fn is_video(&self) -> bool {
        self.track_type == TrackType::Video
    }

    /// Whether this is an audio stream.
    pub fn is_audio(&self) -> bool {
        self.track_type == TrackType::Audio
    }

    /// Whether this is a subtitle stream.
    pub fn is_subtitle(&self) -> bool {
        self.track_type == TrackType::Subtitle
    }

    /// The declared language tag, if any.
    pub fn language(&self) -> Option<&str> {
        self.subtitle
            .as_ref()
            .and_then(|s| s.language.as_deref())
            .or_else(|| self.metadata.get("language"))
    }
}

/// Find the first stream of a given type.
pub fn find_stream(streams: &[StreamInfo], track_type: TrackType) -> Option<usize> {
    streams.iter().position(|s| s.track_type == track_type)
}

/// Demuxer for reading a container from an in-memory buffer.
///
/// Implementations are single-use: one open session, read to exhaustion (or
/// abandon), then drop.
pub trait Demuxer {
    /// Container format of the open input.
    fn format(&self) -> ContainerFormat;

    /// Total duration, if the container declares one.
    fn duration(&self) -> Option<Duration>;

    /// Overall bit rate, if known.
    fn bit_rate(&self) -> Option<u64>;

    /// Container-level metadata.
    fn metadata(&self) -> &Metadata;

    /// Stream descriptions, in container index order.
    fn streams(&self) -> &[StreamInfo];

    /// Read the next packet in interleaved order, or `None` at end of input.
    fn read_packet(&mut self) -> Result<Option<OwnedPacket>>;

    /// Seek so that subsequent reads start at or before `target` (the
    /// backend lands on the nearest preceding keyframe).
    fn seek(&mut self, target: Timestamp) -> Result<()>;
}

/// Muxer writing a container into an in-memory buffer.
///
/// The lifecycle is: `add_stream` for every output stream, optionally
/// `set_metadata`, `write_header`, `write_packet` per packet, then `finish`
/// to write the trailer and take the output buffer. Dropping a muxer without
/// `finish` discards everything written so far.
pub trait Muxer {
    /// Add an output stream; returns its output index. Indices are assigned
    /// densely in call order.
    fn add_stream(&mut self, info: StreamInfo) -> Result<usize>;

    /// The time base packets for stream `index` must be expressed in. The
    /// backend may have adjusted the time base requested via `add_stream`,
    /// so rescaling must use this value.
    fn stream_time_base(&self, index: usize) -> Option<TimeBase>;

    /// Replace the container-level metadata.
    fn set_metadata(&mut self, metadata: Metadata);

    /// Write the container header. Must be called after all streams are
    /// added and before the first packet.
    fn write_header(&mut self) -> Result<()>;

    /// Write one packet. The packet's `stream_index` addresses the output
    /// stream and its timestamps must already be in that stream's time base.
    fn write_packet(&mut self, packet: &Packet) -> Result<()>;

    /// Write the trailer and hand the finished buffer to the caller.
    fn finish(self: Box<Self>) -> Result<Vec<u8>>;
}

/// Sniff the container format from the first bytes of a buffer.
pub fn probe(data: &[u8]) -> Option<ContainerFormat> {
    if data.len() >= 8 {
        if &data[4..8] == b"ftyp" {
            return Some(ContainerFormat::Mp4);
        }
        if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
            let is_webm = data[..data.len().min(4096)]
                .windows(4)
                .any(|w| w == b"webm");
            return Some(if is_webm {
                ContainerFormat::WebM
            } else {
                ContainerFormat::Matroska
            });
        }
        if data[0] == 0x47 && (data.len() < 189 || data[188] == 0x47) {
            return Some(ContainerFormat::MpegTs);
        }
    }
    if data.len() >= 3 && &data[..3] == b"GIF" {
        return Some(ContainerFormat::Gif);
    }
    if data.len() >= 2 && data[0] == 0xFF && (data[1] & 0xE0) == 0xE0 {
        return Some(ContainerFormat::Mp3);
    }
    None
}
