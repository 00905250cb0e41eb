//! Container format and codec identifiers.

use std::fmt;

/// Container format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ContainerFormat {
    /// MP4 / QuickTime family.
    Mp4,
    /// Matroska.
    Matroska,
    /// WebM (Matroska profile).
    WebM,
    /// MPEG transport stream.
    MpegTs,
    /// Raw MP3 stream.
    Mp3,
    /// Raw AAC stream in ADTS framing.
    Adts,
    /// Ogg.
    Ogg,
    /// RIFF/WAVE.
    Wav,
    /// Animated GIF.
    Gif,
}

impl ContainerFormat {
    /// Canonical format name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Matroska => "matroska",
            Self::WebM => "webm",
            Self::MpegTs => "mpegts",
            Self::Mp3 => "mp3",
            Self::Adts => "adts",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
            Self::Gif => "gif",
        }
    }

    /// Parse a caller-supplied format name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mp4" | "m4a" | "mov" => Some(Self::Mp4),
            "matroska" | "mkv" => Some(Self::Matroska),
            "webm" => Some(Self::WebM),
            "mpegts" | "ts" => Some(Self::MpegTs),
            "mp3" => Some(Self::Mp3),
            "adts" | "aac" => Some(Self::Adts),
            "ogg" => Some(Self::Ogg),
            "wav" => Some(Self::Wav),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// The output format to use when rewriting a container of this input
    /// format without an explicit target. The QuickTime family normalizes to
    /// MP4; Matroska-family inputs stay Matroska.
    pub fn as_output(&self) -> Self {
        match self {
            Self::WebM => Self::Matroska,
            other => *other,
        }
    }

    /// Whether this is a Matroska-family format.
    pub fn is_matroska_family(&self) -> bool {
        matches!(self, Self::Matroska | Self::WebM)
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Video codec identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum VideoCodec {
    /// H.264/AVC.
    H264,
    /// H.265/HEVC.
    Hevc,
    /// VP9.
    Vp9,
    /// AV1.
    Av1,
    /// Motion JPEG (also used for single-image JPEG export).
    Mjpeg,
    /// PNG (single-image export).
    Png,
    /// GIF frames.
    Gif,
    /// Uncompressed frames (testing backends).
    Raw,
    /// Unrecognized codec.
    Unknown,
}

impl VideoCodec {
    /// Canonical codec name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::H264 => "h264",
            Self::Hevc => "hevc",
            Self::Vp9 => "vp9",
            Self::Av1 => "av1",
            Self::Mjpeg => "mjpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Raw => "rawvideo",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Audio codec identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AudioCodec {
    /// AAC.
    Aac,
    /// MP3.
    Mp3,
    /// Vorbis.
    Vorbis,
    /// Opus.
    Opus,
    /// FLAC.
    Flac,
    /// Signed 16-bit little-endian PCM.
    PcmS16le,
    /// Uncompressed samples (testing backends).
    Raw,
    /// Unrecognized codec.
    Unknown,
}

impl AudioCodec {
    /// Canonical codec name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aac => "aac",
            Self::Mp3 => "mp3",
            Self::Vorbis => "vorbis",
            Self::Opus => "opus",
            Self::Flac => "flac",
            Self::PcmS16le => "pcm_s16le",
            Self::Raw => "pcm_f32le",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subtitle codec identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleCodec {
    /// SubRip text (Matroska-family containers).
    SubRip,
    /// MOV timed text (MP4 containers).
    MovText,
}

impl SubtitleCodec {
    /// Canonical codec name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubRip => "subrip",
            Self::MovText => "mov_text",
        }
    }

    /// The container family this subtitle codec belongs in.
    pub fn container(&self) -> ContainerFormat {
        match self {
            Self::SubRip => ContainerFormat::Matroska,
            Self::MovText => ContainerFormat::Mp4,
        }
    }
}

impl fmt::Display for SubtitleCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
