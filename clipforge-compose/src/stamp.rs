//! Block-glyph subtitle rendering.
//!
//! Not a font renderer: each character becomes a deterministic pseudo-random
//! dot pattern inside a fixed cell, drawn over a translucent band near the
//! frame bottom. The pattern is keyed by the character code and the dot
//! position within the cell, so identical text always renders identically.

use crate::error::ComposeResult;
use crate::require_rgba;
use clipforge_core::frame::VideoFrame;

const BAND_PADDING: u32 = 6;
const DOT_SIZE: u32 = 2;

// Whether the dot at cell position (gx, gy) is lit for `ch`. Roughly 40%
// density, fully determined by its inputs.
fn glyph_dot(ch: u32, gx: u32, gy: u32) -> bool {
    let mut h = ch
        .wrapping_mul(2654435761)
        .wrapping_add(gx.wrapping_mul(40503))
        .wrapping_add(gy.wrapping_mul(65029));
    h ^= h >> 15;
    h = h.wrapping_mul(0x2c1b3c6d);
    h ^= h >> 12;
    h % 5 < 2
}

/// Darken a horizontal band and stamp `text` into it as block glyphs.
///
/// The band sits `margin_bottom` pixels above the frame bottom and is sized
/// from `font_size` (the glyph cell height, minimum 8). Text that does not
/// fit the frame width is truncated. Whitespace advances the pen without
/// drawing. The stamp clips itself to the frame; it never writes outside.
pub fn draw_subtitle_band(
    frame: &mut VideoFrame,
    text: &str,
    margin_bottom: u32,
    font_size: u32,
) -> ComposeResult<()> {
    require_rgba(frame, "draw_subtitle_band")?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }

    let cell_h = font_size.max(8);
    let cell_w = (cell_h * 3 / 5).max(4);
    let advance = cell_w + 2;
    let band_h = cell_h + 2 * BAND_PADDING;

    let frame_w = frame.width();
    let frame_h = frame.height();
    if band_h + margin_bottom >= frame_h {
        return Ok(()); // frame too short for the band; nothing legible to draw
    }
    let band_top = frame_h - margin_bottom - band_h;

    // Truncate to the glyphs that fit, leaving a padding margin each side.
    let max_chars = ((frame_w.saturating_sub(2 * BAND_PADDING)) / advance) as usize;
    if max_chars == 0 {
        return Ok(());
    }
    let chars: Vec<char> = text.chars().take(max_chars).collect();
    let text_w = chars.len() as u32 * advance;
    let text_left = (frame_w - text_w) / 2;

    // Translucent dark band.
    for y in band_top..band_top + band_h {
        let row = frame.plane_mut(0).row_mut(y as usize);
        for px in row.chunks_exact_mut(4) {
            for c in &mut px[..3] {
                *c = (*c as u32 * 2 / 5) as u8;
            }
        }
    }

    // Glyph dots.
    let glyph_top = band_top + BAND_PADDING;
    for (i, ch) in chars.iter().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let cell_left = text_left + i as u32 * advance;
        let code = *ch as u32;
        for gy in (0..cell_h).step_by(DOT_SIZE as usize) {
            for gx in (0..cell_w).step_by(DOT_SIZE as usize) {
                if !glyph_dot(code, gx / DOT_SIZE, gy / DOT_SIZE) {
                    continue;
                }
                for dy in 0..DOT_SIZE.min(cell_h - gy) {
                    let y = glyph_top + gy + dy;
                    let row = frame.plane_mut(0).row_mut(y as usize);
                    for dx in 0..DOT_SIZE.min(cell_w - gx) {
                        let x = cell_left + gx + dx;
                        if x >= frame_w {
                            continue;
                        }
                        let px = &mut row[x as usize * 4..x as usize * 4 + 4];
                        px[0] = 235;
                        px[1] = 235;
                        px[2] = 235;
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame(width: u32, height: u32) -> VideoFrame {
        let mut frame = VideoFrame::new_rgba(width, height);
        for y in 0..height as usize {
            for px in frame.plane_mut(0).row_mut(y).chunks_exact_mut(4) {
                px.copy_from_slice(&[100, 100, 100, 255]);
            }
        }
        frame
    }

    fn frame_bytes(frame: &VideoFrame) -> Vec<u8> {
        (0..frame.plane(0).height())
            .flat_map(|y| frame.plane(0).row(y).to_vec())
            .collect()
    }

    #[test]
    fn test_stamp_is_deterministic() {
        let mut a = gray_frame(320, 240);
        let mut b = gray_frame(320, 240);
        draw_subtitle_band(&mut a, "hello world", 24, 16).unwrap();
        draw_subtitle_band(&mut b, "hello world", 24, 16).unwrap();
        assert_eq!(frame_bytes(&a), frame_bytes(&b));
    }

    #[test]
    fn test_different_text_renders_differently() {
        let mut a = gray_frame(320, 240);
        let mut b = gray_frame(320, 240);
        draw_subtitle_band(&mut a, "hello", 24, 16).unwrap();
        draw_subtitle_band(&mut b, "world", 24, 16).unwrap();
        assert_ne!(frame_bytes(&a), frame_bytes(&b));
    }

    #[test]
    fn test_band_darkens_only_band_rows() {
        let mut frame = gray_frame(320, 240);
        draw_subtitle_band(&mut frame, "hi", 24, 16).unwrap();
        // Top of the frame untouched.
        assert_eq!(frame.plane(0).row(0)[0], 100);
        // A band row is darkened (band covers rows 188..216 here).
        assert_eq!(frame.plane(0).row(200)[0], 40);
        // Below the band (margin area) untouched.
        assert_eq!(frame.plane(0).row(230)[0], 100);
    }

    #[test]
    fn test_empty_text_is_noop() {
        let mut frame = gray_frame(64, 64);
        let before = frame_bytes(&frame);
        draw_subtitle_band(&mut frame, "   ", 10, 16).unwrap();
        assert_eq!(frame_bytes(&frame), before);
    }

    #[test]
    fn test_tiny_frame_is_noop() {
        let mut frame = gray_frame(16, 16);
        let before = frame_bytes(&frame);
        draw_subtitle_band(&mut frame, "subtitle", 24, 16).unwrap();
        assert_eq!(frame_bytes(&frame), before);
    }

    #[test]
    fn test_long_text_truncates_instead_of_overflowing() {
        let mut frame = gray_frame(64, 120);
        let long = "x".repeat(500);
        // Must not panic or write outside the frame.
        draw_subtitle_band(&mut frame, &long, 10, 16).unwrap();
    }
}
