use image::DynamicImage;
use image::imageops::FilterType;

use crate::error::EditError;
use crate::state::FlipState;

/// Target size for a non-uniform stretch, rounded, at least one pixel.
pub fn stretched_dimensions(
    width: u32,
    height: u32,
    horizontal: f32,
    vertical: f32,
) -> Result<(u32, u32), EditError> {
    if !horizontal.is_finite() || horizontal <= 0.0 {
        return Err(EditError::invalid(
            "stretch_horizontal",
            format!("{horizontal} must be greater than zero"),
        ));
    }
    if !vertical.is_finite() || vertical <= 0.0 {
        return Err(EditError::invalid(
            "stretch_vertical",
            format!("{vertical} must be greater than zero"),
        ));
    }
    let w = ((width as f64 * horizontal as f64).round() as u32).max(1);
    let h = ((height as f64 * vertical as f64).round() as u32).max(1);
    Ok((w, h))
}

/// Resizes width and height independently with a Lanczos3 filter.
pub fn stretch(
    img: DynamicImage,
    horizontal: f32,
    vertical: f32,
) -> Result<DynamicImage, EditError> {
    let (w, h) = stretched_dimensions(img.width(), img.height(), horizontal, vertical)?;
    if (w, h) == (img.width(), img.height()) {
        return Ok(img);
    }
    Ok(img.resize_exact(w, h, FilterType::Lanczos3))
}

pub fn flip(img: DynamicImage, flips: FlipState) -> DynamicImage {
    let mut out = img;
    if flips.horizontal {
        out = out.fliph();
    }
    if flips.vertical {
        out = out.flipv();
    }
    out
}
