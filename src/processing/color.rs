use image::DynamicImage;
use rayon::prelude::*;

use super::is_neutral;

/// Scales each RGB channel by its own gain, saturating at 255.
pub fn apply_gain(img: DynamicImage, red: f32, green: f32, blue: f32) -> DynamicImage {
    if is_neutral(red) && is_neutral(green) && is_neutral(blue) {
        return img;
    }

    let luts = [gain_lut(red), gain_lut(green), gain_lut(blue)];
    let mut rgba = img.to_rgba8();
    rgba.par_chunks_exact_mut(4).for_each(|px| {
        for (c, lut) in luts.iter().enumerate() {
            px[c] = lut[px[c] as usize];
        }
    });
    DynamicImage::ImageRgba8(rgba)
}

fn gain_lut(gain: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = (i as f32 * gain).min(255.0) as u8;
    }
    lut
}

/// ITU-R 601 luma in 16.16 fixed point, rounded.
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Blends every pixel between its luma and its color.
///
/// `factor` 0 gives true grayscale, 1 leaves the image alone, above 1
/// pushes colors away from gray.
pub fn apply_saturation(img: DynamicImage, factor: f32) -> DynamicImage {
    if is_neutral(factor) {
        return img;
    }

    let mut rgba = img.to_rgba8();
    rgba.par_chunks_exact_mut(4).for_each(|px| {
        let gray = luma(px[0], px[1], px[2]) as f32;
        for c in 0..3 {
            let v = gray + factor * (px[c] as f32 - gray);
            px[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    });
    DynamicImage::ImageRgba8(rgba)
}
