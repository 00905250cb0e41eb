//! Compositor error types.

use clipforge_core::error::Error;
use clipforge_core::frame::PixelFormat;
use thiserror::Error;

/// Errors produced by plane operations.
///
/// All of these are detected before any pixel is written.
#[derive(Error, Debug)]
pub enum ComposeError {
    /// The requested rectangle or offset does not fit inside the frame.
    #[error("{op}: geometry {x},{y} {width}x{height} exceeds frame {frame_width}x{frame_height}")]
    OutOfBounds {
        /// Operation name.
        op: &'static str,
        /// Requested x offset.
        x: u32,
        /// Requested y offset.
        y: u32,
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Frame width.
        frame_width: u32,
        /// Frame height.
        frame_height: u32,
    },

    /// A rectangle collapsed to zero area (possibly after even-alignment).
    #[error("{op}: zero-area geometry")]
    ZeroArea {
        /// Operation name.
        op: &'static str,
    },

    /// Two frames that must share geometry do not.
    #[error("{op}: frame geometry mismatch ({a_width}x{a_height} vs {b_width}x{b_height})")]
    SizeMismatch {
        /// Operation name.
        op: &'static str,
        /// First frame width.
        a_width: u32,
        /// First frame height.
        a_height: u32,
        /// Second frame width.
        b_width: u32,
        /// Second frame height.
        b_height: u32,
    },

    /// The operation does not support the frame's pixel format.
    #[error("{op}: unsupported pixel format {format}")]
    UnsupportedFormat {
        /// Operation name.
        op: &'static str,
        /// Offending format.
        format: PixelFormat,
    },

    /// A rotation angle other than 90, 180, or 270 degrees.
    #[error("unsupported rotation angle {0} (expected 90, 180, or 270)")]
    InvalidAngle(i32),

    /// A parameter outside its accepted range.
    #[error("{op}: {message}")]
    InvalidParameter {
        /// Operation name.
        op: &'static str,
        /// What was wrong.
        message: String,
    },
}

impl From<ComposeError> for Error {
    fn from(e: ComposeError) -> Self {
        Error::InvalidParameter(e.to_string())
    }
}

/// Result type for compositor operations.
pub type ComposeResult<T> = std::result::Result<T, ComposeError>;
