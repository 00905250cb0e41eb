//! Basic luma/chroma filters: blur, denoise, sharpen, color correction,
//! gamma.

use crate::error::{ComposeError, ComposeResult};
use crate::require_yuv420;
use clipforge_core::frame::{Plane, VideoFrame};

fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

// Separable box blur over the luma plane. Radius is clamped to at least 1.
fn blur_plane(src: &Plane, radius: usize) -> Vec<Vec<u8>> {
    let radius = radius.max(1) as i64;
    let w = src.width() as i64;
    let h = src.height() as i64;
    let mut out = vec![vec![0u8; w as usize]; h as usize];

    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            let mut count = 0u32;
            for dy in -radius..=radius {
                let sy = y + dy;
                if sy < 0 || sy >= h {
                    continue;
                }
                let row = src.row(sy as usize);
                for dx in -radius..=radius {
                    let sx = x + dx;
                    if sx < 0 || sx >= w {
                        continue;
                    }
                    sum += row[sx as usize] as u32;
                    count += 1;
                }
            }
            out[y as usize][x as usize] = (sum / count) as u8;
        }
    }
    out
}

/// Box-blur the luma plane in place.
pub fn blur(frame: &mut VideoFrame, radius: usize) -> ComposeResult<()> {
    require_yuv420(frame, "blur")?;
    let blurred = blur_plane(frame.plane(0), radius);
    let luma = frame.plane_mut(0);
    for (y, row) in blurred.iter().enumerate() {
        luma.row_mut(y).copy_from_slice(row);
    }
    Ok(())
}

/// Suppress luma noise while keeping detail: a 3:2 weighted blend of the
/// original and a small-radius blur.
pub fn denoise(frame: &mut VideoFrame, radius: usize) -> ComposeResult<()> {
    require_yuv420(frame, "denoise")?;
    let blurred = blur_plane(frame.plane(0), radius.max(1));
    let luma = frame.plane_mut(0);
    for (y, brow) in blurred.iter().enumerate() {
        let row = luma.row_mut(y);
        for (v, b) in row.iter_mut().zip(brow) {
            *v = ((3 * *v as u32 + 2 * *b as u32) / 5) as u8;
        }
    }
    Ok(())
}

/// Unsharp-mask the luma plane. `amount` is clamped to [0, 3].
pub fn sharpen(frame: &mut VideoFrame, amount: f64) -> ComposeResult<()> {
    require_yuv420(frame, "sharpen")?;
    let amount = amount.clamp(0.0, 3.0);
    let blurred = blur_plane(frame.plane(0), 1);
    let luma = frame.plane_mut(0);
    for (y, brow) in blurred.iter().enumerate() {
        let row = luma.row_mut(y);
        for (v, b) in row.iter_mut().zip(brow) {
            let orig = *v as f64;
            *v = clamp_u8((orig + amount * (orig - *b as f64)).round() as i32);
        }
    }
    Ok(())
}

/// Brightness/contrast on luma and saturation on chroma.
///
/// `brightness` is -1..1 (mapped to -255..255 luma delta), `contrast` and
/// `saturation` scale around their neutral values and reject negatives by
/// clamping to zero.
pub fn color_correct(
    frame: &mut VideoFrame,
    brightness: f64,
    contrast: f64,
    saturation: f64,
) -> ComposeResult<()> {
    require_yuv420(frame, "color_correct")?;
    let contrast = contrast.max(0.0);
    let saturation = saturation.max(0.0);
    let delta = (brightness * 255.0).round() as i32;

    let luma = frame.plane_mut(0);
    for y in 0..luma.height() {
        for v in luma.row_mut(y) {
            let out = ((*v as i32 - 128) as f64 * contrast).round() as i32 + 128 + delta;
            *v = clamp_u8(out);
        }
    }
    for plane in 1..3 {
        let chroma = frame.plane_mut(plane);
        for y in 0..chroma.height() {
            for v in chroma.row_mut(y) {
                let out = ((*v as i32 - 128) as f64 * saturation).round() as i32 + 128;
                *v = clamp_u8(out);
            }
        }
    }
    Ok(())
}

/// Gamma curve on luma. `g` is clamped to [0.1, 5.0].
pub fn gamma(frame: &mut VideoFrame, g: f64) -> ComposeResult<()> {
    require_yuv420(frame, "gamma")?;
    let g = g.clamp(0.1, 5.0);
    // 256-entry LUT; the per-pixel pow would dominate otherwise.
    let mut lut = [0u8; 256];
    for (i, out) in lut.iter_mut().enumerate() {
        *out = clamp_u8(((i as f64 / 255.0).powf(g) * 255.0).round() as i32);
    }
    let luma = frame.plane_mut(0);
    for y in 0..luma.height() {
        for v in luma.row_mut(y) {
            *v = lut[*v as usize];
        }
    }
    Ok(())
}

/// Filter selector for the public filter operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VideoFilter {
    /// Box blur with the given radius.
    Blur(usize),
    /// Weighted denoise with the given blur radius.
    Denoise(usize),
    /// Unsharp mask with the given amount.
    Sharpen(f64),
    /// Brightness / contrast / saturation.
    ColorCorrect {
        /// Luma delta in -1..1.
        brightness: f64,
        /// Contrast scale around 1.0.
        contrast: f64,
        /// Chroma saturation scale around 1.0.
        saturation: f64,
    },
    /// Gamma curve on luma.
    Gamma(f64),
}

impl VideoFilter {
    /// Apply this filter to a frame in place.
    pub fn apply(&self, frame: &mut VideoFrame) -> ComposeResult<()> {
        match *self {
            Self::Blur(radius) => blur(frame, radius),
            Self::Denoise(radius) => denoise(frame, radius),
            Self::Sharpen(amount) => sharpen(frame, amount),
            Self::ColorCorrect {
                brightness,
                contrast,
                saturation,
            } => color_correct(frame, brightness, contrast, saturation),
            Self::Gamma(g) => gamma(frame, g),
        }
    }

    /// Validate parameters without touching pixels.
    pub fn validate(&self) -> ComposeResult<()> {
        match *self {
            Self::Blur(radius) | Self::Denoise(radius) if radius > 64 => {
                Err(ComposeError::InvalidParameter {
                    op: "filter",
                    message: format!("blur radius {} too large", radius),
                })
            }
            _ => Ok(()),
        }
    }
}
