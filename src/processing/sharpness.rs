use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;

use super::is_neutral;

const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];
const SMOOTH_SCALE: f32 = 13.0;

/// Blends between a smoothed copy and the image.
///
/// 0 gives the smoothed copy, 1 the unchanged image, and larger factors
/// extrapolate past the image, which sharpens edges.
pub fn apply(img: DynamicImage, sharpness: f32) -> DynamicImage {
    if is_neutral(sharpness) {
        return img;
    }

    let rgba = img.to_rgba8();
    let smooth = smooth3x3(&rgba);

    let mut out = rgba.clone();
    for (o, (s, b)) in out.pixels_mut().zip(rgba.pixels().zip(smooth.pixels())) {
        for c in 0..3 {
            let v = b[c] as f32 + sharpness * (s[c] as f32 - b[c] as f32);
            o[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }

    DynamicImage::ImageRgba8(out)
}

/// 3x3 smoothing filter; the one-pixel border is copied unfiltered.
fn smooth3x3(src: &RgbaImage) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut out = src.clone();
    if w < 3 || h < 3 {
        return out;
    }

    let stride = w as usize * 4;
    let raw = src.as_raw();
    out.par_chunks_exact_mut(stride)
        .enumerate()
        .skip(1)
        .take(h as usize - 2)
        .for_each(|(y, row)| {
            for x in 1..w as usize - 1 {
                let mut acc = [0.0f32; 3];
                for (k, weight) in SMOOTH_KERNEL.iter().enumerate() {
                    let sx = x + k % 3 - 1;
                    let sy = y + k / 3 - 1;
                    let base = sy * stride + sx * 4;
                    for c in 0..3 {
                        acc[c] += raw[base + c] as f32 * weight;
                    }
                }
                for c in 0..3 {
                    row[x * 4 + c] = (acc[c] / SMOOTH_SCALE).round().clamp(0.0, 255.0) as u8;
                }
            }
        });
    out
}
