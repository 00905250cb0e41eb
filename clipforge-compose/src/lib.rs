//! Pixel-plane compositing.
//!
//! Pure functions over [`VideoFrame`] planes: geometry (crop, flip, rotate,
//! pad), blending (cross-blend, slide transition, RGBA alpha overlay), basic
//! luma/chroma filters, temporal smoothing, and the block-glyph subtitle
//! stamp. Nothing here touches the codec or container layer.
//!
//! Every operation validates its geometry up front and refuses to run rather
//! than write a single pixel out of bounds; partial writes never happen.

pub mod blend;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod overlay;
pub mod smooth;
pub mod stamp;

pub use blend::{cross_blend, slide};
pub use error::{ComposeError, ComposeResult};
pub use filter::{blur, color_correct, denoise, gamma, sharpen, VideoFilter};
pub use geometry::{crop, flip, pad, rotate, CropRect, PadGeometry, Rotation, YuvColor};
pub use overlay::alpha_overlay;
pub use smooth::temporal_smooth;
pub use stamp::draw_subtitle_band;

use clipforge_core::frame::VideoFrame;

pub(crate) fn require_yuv420(frame: &VideoFrame, op: &'static str) -> ComposeResult<()> {
    if frame.format() != clipforge_core::frame::PixelFormat::Yuv420p {
        return Err(ComposeError::UnsupportedFormat {
            op,
            format: frame.format(),
        });
    }
    Ok(())
}

pub(crate) fn require_rgba(frame: &VideoFrame, op: &'static str) -> ComposeResult<()> {
    if frame.format() != clipforge_core::frame::PixelFormat::Rgba {
        return Err(ComposeError::UnsupportedFormat {
            op,
            format: frame.format(),
        });
    }
    Ok(())
}
