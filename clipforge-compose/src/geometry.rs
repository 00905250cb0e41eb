//! Geometric plane operations: crop, flip, rotate, pad.

use crate::error::{ComposeError, ComposeResult};
use crate::require_yuv420;
use clipforge_core::frame::VideoFrame;

/// A crop rectangle in source pixels.
///
/// 4:2:0 chroma subsampling ties chroma samples to 2x2 luma blocks, so all
/// four fields are rounded down to even values before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl CropRect {
    /// Create a crop rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn even_aligned(self) -> Self {
        Self {
            x: self.x & !1,
            y: self.y & !1,
            width: self.width & !1,
            height: self.height & !1,
        }
    }
}

/// Extract a rectangle from a YUV 4:2:0 frame.
///
/// Odd coordinates round down to even; the (aligned) rectangle must lie
/// fully inside the source frame. Luma rows are copied directly; chroma
/// offsets and dimensions are halved.
pub fn crop(frame: &VideoFrame, rect: CropRect) -> ComposeResult<VideoFrame> {
    require_yuv420(frame, "crop")?;
    let rect = rect.even_aligned();
    if rect.width == 0 || rect.height == 0 {
        return Err(ComposeError::ZeroArea { op: "crop" });
    }
    if rect.x + rect.width > frame.width() || rect.y + rect.height > frame.height() {
        return Err(ComposeError::OutOfBounds {
            op: "crop",
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            frame_width: frame.width(),
            frame_height: frame.height(),
        });
    }

    let mut dst = VideoFrame::new_yuv420(rect.width, rect.height);
    dst.pts = frame.pts;

    copy_region(frame, &mut dst, 0, rect.x as usize, rect.y as usize);
    for plane in 1..3 {
        copy_region(frame, &mut dst, plane, rect.x as usize / 2, rect.y as usize / 2);
    }
    Ok(dst)
}

// Copy dst-plane-sized region of `src` starting at (src_x, src_y).
fn copy_region(src: &VideoFrame, dst: &mut VideoFrame, plane: usize, src_x: usize, src_y: usize) {
    let width = dst.plane(plane).width();
    for y in 0..dst.plane(plane).height() {
        let src_row = &src.plane(plane).row(src_y + y)[src_x..src_x + width];
        dst.plane_mut(plane).row_mut(y).copy_from_slice(src_row);
    }
}

/// Mirror a YUV 4:2:0 frame horizontally and/or vertically.
///
/// At least one axis must be requested. Chroma planes are flipped with the
/// same logic at half resolution.
pub fn flip(frame: &VideoFrame, horizontal: bool, vertical: bool) -> ComposeResult<VideoFrame> {
    require_yuv420(frame, "flip")?;
    if !horizontal && !vertical {
        return Err(ComposeError::InvalidParameter {
            op: "flip",
            message: "at least one flip axis is required".into(),
        });
    }

    let mut dst = VideoFrame::new_yuv420(frame.width(), frame.height());
    dst.pts = frame.pts;

    for plane in 0..3 {
        let width = frame.plane(plane).width();
        let height = frame.plane(plane).height();
        for y in 0..height {
            let src_y = if vertical { height - 1 - y } else { y };
            let src_row = frame.plane(plane).row(src_y);
            let dst_row = dst.plane_mut(plane).row_mut(y);
            if horizontal {
                for x in 0..width {
                    dst_row[x] = src_row[width - 1 - x];
                }
            } else {
                dst_row.copy_from_slice(src_row);
            }
        }
    }
    Ok(dst)
}

/// A rotation by an exact multiple of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// 90 degrees clockwise.
    R90,
    /// 180 degrees.
    R180,
    /// 270 degrees clockwise.
    R270,
}

impl Rotation {
    /// Normalize an angle in degrees. Anything that does not land on 90,
    /// 180, or 270 after mod-360 normalization is rejected.
    pub fn from_degrees(degrees: i32) -> ComposeResult<Self> {
        match degrees.rem_euclid(360) {
            90 => Ok(Self::R90),
            180 => Ok(Self::R180),
            270 => Ok(Self::R270),
            _ => Err(ComposeError::InvalidAngle(degrees)),
        }
    }

    /// Whether the rotation swaps width and height.
    pub fn transposes(&self) -> bool {
        matches!(self, Self::R90 | Self::R270)
    }
}

/// Rotate a YUV 4:2:0 frame by a multiple of 90 degrees.
///
/// 90/270 swap the output dimensions; chroma planes are rotated
/// independently at their own (half) resolution.
pub fn rotate(frame: &VideoFrame, rotation: Rotation) -> ComposeResult<VideoFrame> {
    require_yuv420(frame, "rotate")?;

    let (out_w, out_h) = if rotation.transposes() {
        (frame.height(), frame.width())
    } else {
        (frame.width(), frame.height())
    };
    let mut dst = VideoFrame::new_yuv420(out_w, out_h);
    dst.pts = frame.pts;

    for plane in 0..3 {
        let src_plane = frame.plane(plane);
        let src_w = src_plane.width();
        let src_h = src_plane.height();
        let dst_h = dst.plane(plane).height();
        for y in 0..dst_h {
            let dst_row = dst.plane_mut(plane).row_mut(y);
            match rotation {
                // dst[r][c] = src[H-1-r][W-1-c]
                Rotation::R180 => {
                    let src_row = src_plane.row(src_h - 1 - y);
                    for (x, out) in dst_row.iter_mut().enumerate() {
                        *out = src_row[src_w - 1 - x];
                    }
                }
                // dst[r][c] = src[H-1-c][r]
                Rotation::R90 => {
                    for (x, out) in dst_row.iter_mut().enumerate() {
                        *out = src_plane.row(src_h - 1 - x)[y];
                    }
                }
                // dst[r][c] = src[c][W-1-r]
                Rotation::R270 => {
                    for (x, out) in dst_row.iter_mut().enumerate() {
                        *out = src_plane.row(x)[src_w - 1 - y];
                    }
                }
            }
        }
    }
    Ok(dst)
}

/// A padding canvas: output dimensions plus the source offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadGeometry {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Source left offset inside the canvas.
    pub x: u32,
    /// Source top offset inside the canvas.
    pub y: u32,
}

/// A solid fill color expressed in the luma/chroma domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YuvColor {
    /// Luma value.
    pub y: u8,
    /// Blue-difference chroma value.
    pub u: u8,
    /// Red-difference chroma value.
    pub v: u8,
}

impl YuvColor {
    /// Video-range black.
    pub const BLACK: Self = Self {
        y: 16,
        u: 128,
        v: 128,
    };

    /// Video-range white.
    pub const WHITE: Self = Self {
        y: 235,
        u: 128,
        v: 128,
    };

    /// Parse a named color; anything unrecognized is black.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("white") {
            Self::WHITE
        } else {
            Self::BLACK
        }
    }
}

/// Place a YUV 4:2:0 frame at an offset inside a larger solid-color canvas.
///
/// Canvas dimensions and offsets round down to even; the canvas must be
/// large enough to contain the source at the given offset.
pub fn pad(frame: &VideoFrame, geometry: PadGeometry, color: YuvColor) -> ComposeResult<VideoFrame> {
    require_yuv420(frame, "pad")?;
    let width = geometry.width & !1;
    let height = geometry.height & !1;
    let x = geometry.x & !1;
    let y = geometry.y & !1;
    if width == 0 || height == 0 {
        return Err(ComposeError::ZeroArea { op: "pad" });
    }
    if x + frame.width() > width || y + frame.height() > height {
        return Err(ComposeError::OutOfBounds {
            op: "pad",
            x,
            y,
            width: frame.width(),
            height: frame.height(),
            frame_width: width,
            frame_height: height,
        });
    }

    let mut dst = VideoFrame::new_yuv420(width, height);
    dst.pts = frame.pts;
    dst.plane_mut(0).fill(color.y);
    dst.plane_mut(1).fill(color.u);
    dst.plane_mut(2).fill(color.v);

    paste_region(frame, &mut dst, 0, x as usize, y as usize);
    for plane in 1..3 {
        paste_region(frame, &mut dst, plane, x as usize / 2, y as usize / 2);
    }
    Ok(dst)
}

// Copy the whole `src` plane into `dst` at (dst_x, dst_y).
fn paste_region(src: &VideoFrame, dst: &mut VideoFrame, plane: usize, dst_x: usize, dst_y: usize) {
    let width = src.plane(plane).width();
    for y in 0..src.plane(plane).height() {
        let dst_row = &mut dst.plane_mut(plane).row_mut(dst_y + y)[dst_x..dst_x + width];
        dst_row.copy_from_slice(src.plane(plane).row(y));
    }
}
