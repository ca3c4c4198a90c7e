//! The adjustment pipeline.
//!
//! Every call starts from the untouched source and runs the stages in a fixed
//! order: channel gain, brightness, sharpness, saturation, blur, stretch, flip.
//! Blurring before the stretch keeps the blur radius in source pixels.

pub mod color;
pub mod exposure;
pub mod filters;
pub mod sharpness;
pub mod transform;

use std::time::Instant;

use image::DynamicImage;
use tracing::debug;

use crate::error::EditError;
use crate::state::AdjustmentParameters;

/// Factors closer to 1.0 than this are treated as neutral and skipped.
pub(crate) const NEUTRAL_EPSILON: f32 = 1e-4;

pub(crate) fn is_neutral(factor: f32) -> bool {
    (factor - 1.0).abs() < NEUTRAL_EPSILON
}

/// Applies `params` to `source` and returns the derived image.
///
/// The source is never modified. Invalid parameters are rejected before any
/// stage runs.
pub fn apply(
    source: &DynamicImage,
    params: &AdjustmentParameters,
) -> Result<DynamicImage, EditError> {
    let params = params.sanitized()?;
    let started = Instant::now();

    let mut out = DynamicImage::ImageRgba8(source.to_rgba8());
    out = color::apply_gain(out, params.red, params.green, params.blue);
    out = exposure::apply(out, params.brightness);
    out = sharpness::apply(out, params.sharpness);
    out = color::apply_saturation(out, params.saturation);
    out = filters::gaussian_blur(out, params.blur_radius);
    out = transform::stretch(out, params.stretch_horizontal, params.stretch_vertical)?;
    out = transform::flip(out, params.flips());

    debug!(
        width = out.width(),
        height = out.height(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "pipeline recomputed"
    );
    Ok(out)
}

#[cfg(test)]
pub(crate) mod test_images {
    use image::{DynamicImage, ImageBuffer, Rgba};

    /// A colorful gradient with an edge so every stage has something to do.
    pub fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_fn(width, height, |x, y| {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            let b = if x < width / 2 { 40 } else { 220 };
            Rgba([r, g, b, 255])
        }))
    }

    pub fn one_pixel(rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(
            1,
            1,
            Rgba([rgb[0], rgb[1], rgb[2], 255]),
        ))
    }

    pub fn pixel_rgb(img: &DynamicImage, x: u32, y: u32) -> [u8; 3] {
        let p = img.to_rgba8().get_pixel(x, y).0;
        [p[0], p[1], p[2]]
    }
}
