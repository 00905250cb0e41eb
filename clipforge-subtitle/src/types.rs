//! Subtitle cue types and SRT timestamp handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from subtitle parsing.
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A malformed timing or timestamp line.
    #[error("parse error: {0}")]
    ParseError(String),
}

/// Result type for subtitle operations.
pub type SubtitleResult<T> = std::result::Result<T, SubtitleError>;

/// An SRT timestamp (`HH:MM:SS,mmm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SrtTimestamp {
    millis: u64,
}

impl SrtTimestamp {
    /// Create from components.
    pub fn new(hours: u64, minutes: u64, seconds: u64, milliseconds: u64) -> Self {
        Self {
            millis: ((hours * 60 + minutes) * 60 + seconds) * 1000 + milliseconds,
        }
    }

    /// Create from a total millisecond count.
    pub fn from_millis(milliseconds: u64) -> Self {
        Self {
            millis: milliseconds,
        }
    }

    /// Total milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Seconds as a float.
    pub fn as_seconds_f64(&self) -> f64 {
        self.millis as f64 / 1000.0
    }

    /// Parse `HH:MM:SS,mmm` (a `.` separator is tolerated).
    pub fn parse(s: &str) -> SubtitleResult<Self> {
        let s = s.trim();
        let (clock, millis) = s
            .rsplit_once([',', '.'])
            .ok_or_else(|| SubtitleError::ParseError(format!("invalid timestamp: {}", s)))?;
        let millis: u64 = millis
            .parse()
            .map_err(|_| SubtitleError::ParseError(format!("invalid milliseconds: {}", s)))?;
        let mut parts = clock.split(':');
        let mut next = || -> SubtitleResult<u64> {
            parts
                .next()
                .and_then(|p| p.trim().parse().ok())
                .ok_or_else(|| SubtitleError::ParseError(format!("invalid timestamp: {}", s)))
        };
        let hours = next()?;
        let minutes = next()?;
        let seconds = next()?;
        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::ParseError(format!(
                "timestamp component out of range: {}",
                s
            )));
        }
        Ok(Self::new(hours, minutes, seconds, millis))
    }
}

impl fmt::Display for SrtTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.millis / 3_600_000;
        let minutes = (self.millis / 60_000) % 60;
        let seconds = (self.millis / 1000) % 60;
        let millis = self.millis % 1000;
        write!(f, "{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

/// One subtitle cue: a time window and its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// Cue start in seconds.
    pub start_sec: f64,
    /// Cue end in seconds; always greater than `start_sec`.
    pub end_sec: f64,
    /// Cue text; may span multiple lines.
    pub text: String,
}

impl SubtitleCue {
    /// Create a cue.
    pub fn new(start_sec: f64, end_sec: f64, text: impl Into<String>) -> Self {
        Self {
            start_sec,
            end_sec,
            text: text.into(),
        }
    }

    /// Whether the cue is showing at `sec`.
    pub fn contains(&self, sec: f64) -> bool {
        sec >= self.start_sec && sec <= self.end_sec
    }

    /// Start time in whole milliseconds, rounded.
    pub fn start_millis(&self) -> i64 {
        (self.start_sec * 1000.0 + 0.5) as i64
    }

    /// End time in whole milliseconds, rounded.
    pub fn end_millis(&self) -> i64 {
        (self.end_sec * 1000.0 + 0.5) as i64
    }
}
