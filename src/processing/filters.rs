use image::DynamicImage;
use imageproc::filter::gaussian_blur_f32;

/// Gaussian blur with `radius` as the kernel sigma. A zero radius skips
/// the stage and returns the input untouched.
pub fn gaussian_blur(img: DynamicImage, radius: f32) -> DynamicImage {
    if radius <= 0.0 {
        return img;
    }

    let rgba = img.to_rgba8();
    DynamicImage::ImageRgba8(gaussian_blur_f32(&rgba, radius))
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, ImageBuffer, Rgba};

    use super::super::test_images::gradient;
    use super::gaussian_blur;

    #[test]
    fn zero_radius_is_bit_identical() {
        let img = gradient(13, 11);
        let out = gaussian_blur(img.clone(), 0.0);
        assert_eq!(img.to_rgba8(), out.to_rgba8());
    }

    #[test]
    fn blur_softens_a_hard_edge() {
        let buf = ImageBuffer::from_fn(16, 4, |x, _| {
            if x < 8 {
                Rgba([0u8, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let out = gaussian_blur(DynamicImage::ImageRgba8(buf), 2.0).to_rgba8();
        let left = out.get_pixel(7, 2)[0];
        let right = out.get_pixel(8, 2)[0];
        assert!(left > 0);
        assert!(right < 255);
        assert_eq!(out.dimensions(), (16, 4));
    }
}
