//! # Clipforge Core
//!
//! Core types shared by every clipforge crate:
//! - Error handling types
//! - Rational arithmetic and timestamp/timebase management
//! - Packet abstractions for encoded media data
//! - Stride-aware video frame buffers and planar audio frames
//! - The in-memory IO bridge (buffer reader / growable output buffer)
//! - Metadata dictionaries

pub mod error;
pub mod frame;
pub mod memio;
pub mod meta;
pub mod packet;
pub mod rational;
pub mod sample;
pub mod timestamp;

pub use error::{CodecError, ContainerError, Error, Result};
pub use frame::{PixelFormat, Plane, VideoFrame};
pub use memio::{MemoryReader, OutputBuffer};
pub use meta::Metadata;
pub use packet::{OwnedPacket, Packet, PacketFlags};
pub use rational::Rational;
pub use sample::{AudioFrame, SampleFifo};
pub use timestamp::{Duration, TimeBase, Timestamp};
