//! Error types for the clipforge library.
//!
//! Two broad failure classes exist at the operation boundary: unsupported or
//! invalid input, which is detected before any heavy work begins, and
//! failures reported by the underlying media backend, which are fatal for the
//! running operation. Both surface through [`Error`].

use thiserror::Error;

/// Main error type for the clipforge library.
#[derive(Error, Debug)]
pub enum Error {
    /// Container-level errors (demuxing/muxing).
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// Codec-level errors (decoding/encoding/conversion).
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid parameter provided by the caller.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unsupported feature, format, or codec.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The input has no stream of the required media type.
    #[error("no {0} stream in input")]
    MissingStream(&'static str),

    /// End of stream reached.
    #[error("end of stream")]
    EndOfStream,
}

impl Error {
    /// Shorthand for an invalid-parameter error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Shorthand for an unsupported-input error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

/// Container format errors.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// Unknown or unrecognizable container format.
    #[error("unknown container format")]
    UnknownFormat,

    /// The requested output format is not supported by the backend.
    #[error("unsupported container format: {0}")]
    UnsupportedFormat(String),

    /// Invalid or corrupted container data.
    #[error("invalid container data: {0}")]
    InvalidData(String),

    /// Writing the header, a packet, or the trailer failed.
    #[error("container write failed: {0}")]
    WriteFailed(String),

    /// Seeking to the requested position failed.
    #[error("seek failed: {0}")]
    SeekFailed(String),
}

/// Codec errors.
#[derive(Error, Debug)]
pub enum CodecError {
    /// No decoder available for the stream's codec.
    #[error("decoder init failed: {0}")]
    DecoderInit(String),

    /// No encoder available for the requested codec/configuration.
    #[error("encoder init failed: {0}")]
    EncoderInit(String),

    /// Decoding a packet failed.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// Encoding a frame failed.
    #[error("encode failed: {0}")]
    EncodeFailed(String),

    /// Pixel-format/scaling or resampling conversion failed.
    #[error("conversion failed: {0}")]
    ConversionFailed(String),
}

/// Result type used throughout the clipforge crates.
pub type Result<T> = std::result::Result<T, Error>;
