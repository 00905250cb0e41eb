//! Temporal smoothing between consecutive frames.

use crate::error::{ComposeError, ComposeResult};
use crate::require_yuv420;
use clipforge_core::frame::VideoFrame;

/// Blend the current frame toward the previous one:
/// `dst = (curr*(32-strength) + prev*strength) / 32`, per plane.
///
/// `strength` is clamped to 1..=32. This is the jitter-damping pass used by
/// stabilization: camera shake averages out while static content is barely
/// touched.
pub fn temporal_smooth(
    current: &mut VideoFrame,
    previous: &VideoFrame,
    strength: u8,
) -> ComposeResult<()> {
    require_yuv420(current, "temporal_smooth")?;
    require_yuv420(previous, "temporal_smooth")?;
    if !current.same_geometry(previous) {
        return Err(ComposeError::SizeMismatch {
            op: "temporal_smooth",
            a_width: current.width(),
            a_height: current.height(),
            b_width: previous.width(),
            b_height: previous.height(),
        });
    }
    let strength = strength.clamp(1, 32) as u32;
    let keep = 32 - strength;

    for plane in 0..3 {
        for y in 0..current.plane(plane).height() {
            let prev_row = previous.plane(plane).row(y).to_vec();
            let row = current.plane_mut(plane).row_mut(y);
            for (v, p) in row.iter_mut().zip(prev_row) {
                *v = ((*v as u32 * keep + p as u32 * strength) / 32) as u8;
            }
        }
    }
    Ok(())
}
