//! # Clipforge
//!
//! Buffer-in/buffer-out media transforms. Every operation takes an input
//! byte buffer (a complete container file in memory), drives the supplied
//! [`MediaBackend`] through demux/decode/encode/mux, and returns a complete
//! output buffer. Operations are stateless and independently callable; a
//! transform either fully completes or returns an error, never a partial
//! buffer. No filesystem or network IO happens anywhere.
//!
//! The heavy lifting (container parsing, codecs, scaling, resampling) lives
//! in the backend. What clipforge owns is the orchestration: stream
//! selection and timestamp rebasing (`clipforge-remux`), pixel-plane
//! compositing (`clipforge-compose`), subtitle cues (`clipforge-subtitle`),
//! and the in-memory IO bridge (`clipforge-core`).

mod engine;

pub mod audio;
pub mod info;
pub mod passthrough;
pub mod video;

pub use clipforge_compose::{CropRect, PadGeometry, VideoFilter};
pub use clipforge_container::{
    AudioCodec, ContainerFormat, MediaBackend, Preset, Quality, SubtitleCodec, VideoCodec,
};
pub use clipforge_core::{Error, Result};

pub use audio::{adjust_volume, extract_audio, replace_audio, AudioExportFormat};
pub use info::{extract_subtitles, get_metadata, media_info, MediaInfo, SubtitleTrackDump};
pub use passthrough::{
    add_subtitle_track, change_speed, convert_format, fragment_for_streaming, merge, mute,
    packet_timestamps, remove_subtitle_tracks, set_metadata, strip_metadata, trim,
};
pub use video::{
    burn_in_subtitles, change_fps, crop, extract_frame, filter, flip, pad, reencode, reverse,
    rotate, stabilize, to_gif, watermark, ImageFormat,
};
