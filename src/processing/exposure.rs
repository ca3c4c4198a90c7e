use image::DynamicImage;
use rayon::prelude::*;

use super::is_neutral;

/// Scales overall brightness: 0 gives black, 1 is unchanged.
pub fn apply(img: DynamicImage, brightness: f32) -> DynamicImage {
    if is_neutral(brightness) {
        return img;
    }

    let mut rgba = img.to_rgba8();
    rgba.par_chunks_exact_mut(4).for_each(|px| {
        for c in 0..3 {
            px[c] = (px[c] as f32 * brightness).round().clamp(0.0, 255.0) as u8;
        }
    });
    DynamicImage::ImageRgba8(rgba)
}
