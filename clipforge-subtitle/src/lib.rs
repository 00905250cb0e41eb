//! SRT subtitle support.
//!
//! A minimal cue model: parse SRT text into time-ordered [`SubtitleCue`]s,
//! write cues back out as SRT, strip formatting tags, and look up the active
//! cue for a frame timestamp with a monotonic cursor.

pub mod cue;
pub mod srt;
pub mod types;

pub use cue::CueCursor;
pub use srt::{parse, strip_formatting, write};
pub use types::{SrtTimestamp, SubtitleCue, SubtitleError, SubtitleResult};
