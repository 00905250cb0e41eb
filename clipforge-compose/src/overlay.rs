//! RGBA alpha-compositing overlay.

use crate::error::ComposeResult;
use crate::require_rgba;
use clipforge_core::frame::VideoFrame;

/// Composite an RGBA overlay onto an RGBA destination frame at `(x, y)`.
///
/// Per destination pixel: `dst = dst*(1-a) + src*a` where
/// `a = src_alpha/255 * opacity`. Fully transparent source pixels are
/// skipped; regions of the overlay outside the frame are clipped silently,
/// and the anchor may be negative.
pub fn alpha_overlay(
    dst: &mut VideoFrame,
    overlay: &VideoFrame,
    x: i32,
    y: i32,
    opacity: f32,
) -> ComposeResult<()> {
    require_rgba(dst, "alpha_overlay")?;
    require_rgba(overlay, "alpha_overlay")?;
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return Ok(());
    }

    let dst_w = dst.width() as i64;
    let dst_h = dst.height() as i64;

    for oy in 0..overlay.plane(0).height() {
        let ty = y as i64 + oy as i64;
        if ty < 0 || ty >= dst_h {
            continue;
        }
        let src_row = overlay.plane(0).row(oy);
        let dst_row = dst.plane_mut(0).row_mut(ty as usize);
        for ox in 0..overlay.width() as usize {
            let tx = x as i64 + ox as i64;
            if tx < 0 || tx >= dst_w {
                continue;
            }
            let src_px = &src_row[ox * 4..ox * 4 + 4];
            if src_px[3] == 0 {
                continue;
            }
            let alpha = src_px[3] as f32 / 255.0 * opacity;
            let dst_px = &mut dst_row[tx as usize * 4..tx as usize * 4 + 4];
            for c in 0..3 {
                let blended = dst_px[c] as f32 * (1.0 - alpha) + src_px[c] as f32 * alpha;
                dst_px[c] = blended.round() as u8;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_rgba(width: u32, height: u32, rgba: [u8; 4]) -> VideoFrame {
        let mut frame = VideoFrame::new_rgba(width, height);
        for y in 0..height as usize {
            for px in frame.plane_mut(0).row_mut(y).chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
        frame
    }

    #[test]
    fn test_opaque_overlay_replaces_pixels() {
        let mut dst = solid_rgba(8, 8, [0, 0, 0, 255]);
        let overlay = solid_rgba(2, 2, [200, 100, 50, 255]);
        alpha_overlay(&mut dst, &overlay, 3, 3, 1.0).unwrap();

        let px = &dst.plane(0).row(3)[12..16];
        assert_eq!(&px[..3], &[200, 100, 50]);
        // Outside the overlay untouched.
        assert_eq!(&dst.plane(0).row(0)[..3], &[0, 0, 0]);
    }

    #[test]
    fn test_transparent_pixels_skipped() {
        let mut dst = solid_rgba(4, 4, [10, 20, 30, 255]);
        let overlay = solid_rgba(4, 4, [255, 255, 255, 0]);
        alpha_overlay(&mut dst, &overlay, 0, 0, 1.0).unwrap();
        assert_eq!(&dst.plane(0).row(2)[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_half_opacity_blend() {
        let mut dst = solid_rgba(2, 2, [0, 0, 0, 255]);
        let overlay = solid_rgba(2, 2, [200, 200, 200, 255]);
        alpha_overlay(&mut dst, &overlay, 0, 0, 0.5).unwrap();
        assert_eq!(dst.plane(0).row(0)[0], 100);
    }

    #[test]
    fn test_overlay_clips_off_frame() {
        let mut dst = solid_rgba(4, 4, [0, 0, 0, 255]);
        let overlay = solid_rgba(4, 4, [255, 0, 0, 255]);
        // Anchored so only the bottom-right quarter lands inside.
        alpha_overlay(&mut dst, &overlay, -2, -2, 1.0).unwrap();
        assert_eq!(dst.plane(0).row(0)[0], 255);
        assert_eq!(dst.plane(0).row(3)[3 * 4], 0);
    }

    #[test]
    fn test_fully_off_frame_is_noop() {
        let mut dst = solid_rgba(4, 4, [7, 7, 7, 255]);
        let overlay = solid_rgba(2, 2, [255, 255, 255, 255]);
        alpha_overlay(&mut dst, &overlay, 10, 10, 1.0).unwrap();
        assert_eq!(&dst.plane(0).row(0)[..3], &[7, 7, 7]);
    }

    #[test]
    fn test_rejects_yuv_frames() {
        let mut dst = VideoFrame::new_yuv420(8, 8);
        let overlay = solid_rgba(2, 2, [0, 0, 0, 255]);
        assert!(alpha_overlay(&mut dst, &overlay, 0, 0, 1.0).is_err());
    }
}
