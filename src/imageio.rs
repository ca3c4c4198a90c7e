use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageError, ImageFormat};

use crate::error::EditError;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveFormat {
    Jpg,
    Png,
    Webp,
    Bmp,
    Tiff,
}

impl SaveFormat {
    /// Picks the output format from a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(SaveFormat::Jpg),
            "png" => Some(SaveFormat::Png),
            "webp" => Some(SaveFormat::Webp),
            "bmp" => Some(SaveFormat::Bmp),
            "tif" | "tiff" => Some(SaveFormat::Tiff),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            SaveFormat::Jpg => "jpg",
            SaveFormat::Png => "png",
            SaveFormat::Webp => "webp",
            SaveFormat::Bmp => "bmp",
            SaveFormat::Tiff => "tiff",
        }
    }
}

/// Resolves the path and format a save will use. Paths without a known
/// image extension get `.jpg` appended.
pub fn resolve_save_target(path: &Path) -> (PathBuf, SaveFormat) {
    let known = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SaveFormat::from_extension);
    match known {
        Some(format) => (path.to_path_buf(), format),
        None => {
            let mut with_ext = path.as_os_str().to_owned();
            with_ext.push(".");
            with_ext.push(SaveFormat::Jpg.extension());
            (PathBuf::from(with_ext), SaveFormat::Jpg)
        }
    }
}

/// Opens an image file and normalizes it to RGBA8.
pub fn open_image(path: &Path) -> Result<DynamicImage, EditError> {
    let img = image::open(path).map_err(|source| EditError::UnreadableImage {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DynamicImage::ImageRgba8(img.to_rgba8()))
}

/// Writes `img` to `path`, returning the path actually written.
pub fn save_image(
    img: &DynamicImage,
    path: &Path,
    jpeg_quality: u8,
) -> Result<PathBuf, EditError> {
    let (target, format) = resolve_save_target(path);
    write_image(img, &target, format, jpeg_quality).map_err(|source| {
        EditError::UnwritableDestination {
            path: target.clone(),
            source,
        }
    })?;
    Ok(target)
}

fn write_image(
    img: &DynamicImage,
    path: &Path,
    format: SaveFormat,
    jpeg_quality: u8,
) -> Result<(), ImageError> {
    let encoded = encode(img, format, jpeg_quality)?;
    std::fs::write(path, encoded).map_err(ImageError::IoError)
}

/// Encodes in memory so a failing encoder never truncates an existing file.
fn encode(
    img: &DynamicImage,
    format: SaveFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, ImageError> {
    let mut writer = Cursor::new(Vec::new());
    match format {
        SaveFormat::Jpg => {
            // JPEG has no alpha channel.
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder = JpegEncoder::new_with_quality(&mut writer, jpeg_quality.clamp(1, 100));
            rgb.write_with_encoder(encoder)?;
        }
        SaveFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut writer,
                CompressionType::Default,
                PngFilterType::Adaptive,
            );
            img.write_with_encoder(encoder)?;
        }
        SaveFormat::Webp => {
            let encoder = WebPEncoder::new_lossless(&mut writer);
            img.write_with_encoder(encoder)?;
        }
        SaveFormat::Bmp => img.write_to(&mut writer, ImageFormat::Bmp)?,
        SaveFormat::Tiff => img.write_to(&mut writer, ImageFormat::Tiff)?,
    }
    Ok(writer.into_inner())
}
