//! Media inspection: container/stream summary and subtitle dumps.

use clipforge_container::{MediaBackend, TrackType};
use clipforge_core::error::Result;
use clipforge_core::memio::MemoryReader;
use serde::{Deserialize, Serialize};

// Caps matching the excerpt behavior of the subtitle dump: a little context
// per stream, not a full extraction.
const EXCERPT_PER_PACKET: usize = 512;
const EXCERPT_TOTAL: usize = 2048;

/// Summary of a media buffer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Total duration in seconds, zero when unknown.
    pub duration: f64,
    /// Overall bit rate, if declared.
    pub bitrate: Option<u64>,
    /// Number of streams in the container.
    pub num_streams: usize,
    /// Whether a video stream exists.
    pub has_video: bool,
    /// Whether an audio stream exists.
    pub has_audio: bool,
    /// Video width, if a video stream exists.
    pub width: Option<u32>,
    /// Video height.
    pub height: Option<u32>,
    /// Video codec name.
    pub video_codec: Option<String>,
    /// Declared frame rate.
    pub fps: Option<f64>,
    /// Audio codec name.
    pub audio_codec: Option<String>,
    /// Audio sample rate.
    pub sample_rate: Option<u32>,
    /// Audio channel count.
    pub channels: Option<u16>,
}

impl MediaInfo {
    /// Serialize as a JSON object string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("MediaInfo serialization cannot fail")
    }
}

/// Inspect a media buffer without decoding anything.
pub fn media_info(backend: &dyn MediaBackend, input: &[u8]) -> Result<MediaInfo> {
    let demuxer = backend.open_input(MemoryReader::new(input))?;
    let streams = demuxer.streams();

    let mut info = MediaInfo {
        duration: demuxer.duration().map(|d| d.to_seconds()).unwrap_or(0.0),
        bitrate: demuxer.bit_rate(),
        num_streams: streams.len(),
        ..MediaInfo::default()
    };

    if let Some(video) = streams
        .iter()
        .find(|s| s.track_type == TrackType::Video)
        .and_then(|s| s.video.as_ref())
    {
        info.has_video = true;
        info.width = Some(video.width);
        info.height = Some(video.height);
        info.video_codec = Some(video.codec.to_string());
        info.fps = video.frame_rate.map(|r| r.to_f64());
    }
    if let Some(audio) = streams
        .iter()
        .find(|s| s.track_type == TrackType::Audio)
        .and_then(|s| s.audio.as_ref())
    {
        info.has_audio = true;
        info.audio_codec = Some(audio.codec.to_string());
        info.sample_rate = Some(audio.sample_rate);
        info.channels = Some(audio.channels);
    }

    Ok(info)
}

/// Read the container-level metadata tags.
pub fn get_metadata(
    backend: &dyn MediaBackend,
    input: &[u8],
) -> Result<clipforge_core::Metadata> {
    let demuxer = backend.open_input(MemoryReader::new(input))?;
    Ok(demuxer.metadata().clone())
}

/// A subtitle stream with a text excerpt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleTrackDump {
    /// Input stream index.
    pub stream_index: usize,
    /// Language tag, `und` when undeclared.
    pub language: String,
    /// Codec name.
    pub codec: String,
    /// Concatenated packet text, capped to an excerpt.
    pub text: String,
}

/// List the subtitle streams with a short excerpt of each one's text.
pub fn extract_subtitles(
    backend: &dyn MediaBackend,
    input: &[u8],
) -> Result<Vec<SubtitleTrackDump>> {
    let mut demuxer = backend.open_input(MemoryReader::new(input))?;

    let mut dumps: Vec<(usize, SubtitleTrackDump)> = demuxer
        .streams()
        .iter()
        .filter(|s| s.track_type == TrackType::Subtitle)
        .map(|s| {
            let subtitle = s.subtitle.as_ref();
            (
                s.index,
                SubtitleTrackDump {
                    stream_index: s.index,
                    language: s.language().unwrap_or("und").to_string(),
                    codec: subtitle
                        .map(|i| i.codec.to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    text: String::new(),
                },
            )
        })
        .collect();
    if dumps.is_empty() {
        return Ok(Vec::new());
    }

    while let Some(packet) = demuxer.read_packet()? {
        let Some((_, dump)) = dumps
            .iter_mut()
            .find(|(index, _)| *index == packet.stream_index as usize)
        else {
            continue;
        };
        if packet.is_empty() || dump.text.len() >= EXCERPT_TOTAL {
            continue;
        }
        let take = packet.data().len().min(EXCERPT_PER_PACKET);
        let excerpt = String::from_utf8_lossy(&packet.data()[..take]);
        dump.text.push_str(&excerpt);
        dump.text.push('\n');
    }

    Ok(dumps.into_iter().map(|(_, dump)| dump).collect())
}
