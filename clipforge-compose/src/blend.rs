//! Frame-to-frame transitions: cross-blend and slide.

use crate::error::{ComposeError, ComposeResult};
use crate::require_yuv420;
use clipforge_core::frame::VideoFrame;

fn check_pair(a: &VideoFrame, b: &VideoFrame, op: &'static str) -> ComposeResult<()> {
    require_yuv420(a, op)?;
    require_yuv420(b, op)?;
    if !a.same_geometry(b) {
        return Err(ComposeError::SizeMismatch {
            op,
            a_width: a.width(),
            a_height: a.height(),
            b_width: b.width(),
            b_height: b.height(),
        });
    }
    Ok(())
}

/// Linear interpolation between two frames of identical geometry:
/// `dst = a*(1-t) + b*t`, with `t` clamped to [0, 1].
///
/// The blend runs in 8.8 fixed point, so `t = 0` reproduces `a` exactly and
/// `t = 1` reproduces `b` exactly.
pub fn cross_blend(a: &VideoFrame, b: &VideoFrame, t: f32) -> ComposeResult<VideoFrame> {
    check_pair(a, b, "cross_blend")?;
    let weight = (t.clamp(0.0, 1.0) * 256.0).round() as u32;

    let mut dst = VideoFrame::new_yuv420(a.width(), a.height());
    dst.pts = a.pts;
    for plane in 0..3 {
        for y in 0..a.plane(plane).height() {
            let row_a = a.plane(plane).row(y);
            let row_b = b.plane(plane).row(y);
            let out = dst.plane_mut(plane).row_mut(y);
            for x in 0..row_a.len() {
                let va = row_a[x] as u32;
                let vb = row_b[x] as u32;
                out[x] = ((va * (256 - weight) + vb * weight + 128) >> 8) as u8;
            }
        }
    }
    Ok(dst)
}

/// Horizontal slide transition between two frames of identical geometry.
///
/// The shift grows with `t` from zero to the full width; each destination
/// column sources from `a` shifted left if still in range, otherwise from
/// `b` entering from the trailing edge. If both are out of range (possible
/// only at the rounding edge) the last column of `a` is used.
pub fn slide(a: &VideoFrame, b: &VideoFrame, t: f32) -> ComposeResult<VideoFrame> {
    check_pair(a, b, "slide")?;
    let t = t.clamp(0.0, 1.0);

    let mut dst = VideoFrame::new_yuv420(a.width(), a.height());
    dst.pts = a.pts;
    for plane in 0..3 {
        let width = a.plane(plane).width();
        let shift = (t * width as f32) as usize;
        for y in 0..a.plane(plane).height() {
            let row_a = a.plane(plane).row(y);
            let row_b = b.plane(plane).row(y);
            let out = dst.plane_mut(plane).row_mut(y);
            for x in 0..width {
                let from_a = x + shift;
                out[x] = if from_a < width {
                    row_a[from_a]
                } else if from_a - width < width {
                    row_b[from_a - width]
                } else {
                    row_a[width - 1]
                };
            }
        }
    }
    Ok(dst)
}
