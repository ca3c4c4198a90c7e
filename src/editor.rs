use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{info, warn};

use crate::crop::{self, CropTool, DisplayTransform, Point, ScreenRect, SourceRect};
use crate::error::EditError;
use crate::imageio;
use crate::processing;
use crate::state::AdjustmentParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterTurn {
    Clockwise,
    CounterClockwise,
}

/// The editing session: source image, parameters, and the derived image
/// rebuilt from them.
///
/// Every mutation is all-or-nothing. A rejected edit leaves the source,
/// parameters, and derived image exactly as they were.
pub struct Editor {
    /// Bitmap as last opened, before any committed crop or rotation.
    opened: Option<DynamicImage>,
    source: Option<DynamicImage>,
    params: AdjustmentParameters,
    derived: Option<DynamicImage>,
    path: Option<PathBuf>,
    crop: CropTool,
    /// Bumped whenever `derived` changes so views know to refresh.
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            opened: None,
            source: None,
            params: AdjustmentParameters::default(),
            derived: None,
            path: None,
            crop: CropTool::Idle,
            revision: 0,
        }
    }

    pub fn open(&mut self, path: &Path) -> Result<(), EditError> {
        let img = imageio::open_image(path)?;
        info!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "opened image"
        );
        self.install(img)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Starts a session on an in-memory bitmap.
    pub fn load(&mut self, img: DynamicImage) -> Result<(), EditError> {
        self.install(DynamicImage::ImageRgba8(img.to_rgba8()))?;
        self.path = None;
        Ok(())
    }

    fn install(&mut self, img: DynamicImage) -> Result<(), EditError> {
        let params = AdjustmentParameters::default();
        let derived = processing::apply(&img, &params)?;
        self.opened = Some(img.clone());
        self.source = Some(img);
        self.params = params;
        self.crop.cancel();
        self.replace_derived(derived);
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn params(&self) -> &AdjustmentParameters {
        &self.params
    }

    pub fn source(&self) -> Option<&DynamicImage> {
        self.source.as_ref()
    }

    pub fn derived(&self) -> Option<&DynamicImage> {
        self.derived.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn crop_tool(&self) -> &CropTool {
        &self.crop
    }

    fn replace_derived(&mut self, derived: DynamicImage) {
        self.derived = Some(derived);
        self.revision += 1;
    }

    /// Edits a copy of the parameters and commits it only if the pipeline
    /// accepts it.
    pub fn update<F>(&mut self, edit: F) -> Result<(), EditError>
    where
        F: FnOnce(&mut AdjustmentParameters),
    {
        let mut next = self.params;
        edit(&mut next);
        self.set_params(next)
    }

    pub fn set_params(&mut self, next: AdjustmentParameters) -> Result<(), EditError> {
        if let Err(err) = next.validate() {
            warn!(%err, "rejected parameter change");
            return Err(err);
        }
        if let Some(source) = self.source.as_ref() {
            let derived = processing::apply(source, &next).inspect_err(|err| {
                warn!(%err, "rejected parameter change");
            })?;
            self.replace_derived(derived);
        }
        self.params = next;
        Ok(())
    }

    /// Restores default parameters. Committed crops and rotations stay.
    pub fn reset(&mut self) -> Result<(), EditError> {
        self.set_params(AdjustmentParameters::default())
    }

    /// Goes back to the bitmap as it was opened, dropping crops, rotations,
    /// and parameters.
    pub fn revert(&mut self) -> Result<(), EditError> {
        let opened = self.opened.clone().ok_or(EditError::NoImage)?;
        self.install(opened)
    }

    /// Rotates the source image by a quarter turn; the canvas grows to fit.
    pub fn rotate(&mut self, turn: QuarterTurn) -> Result<(), EditError> {
        let source = self.source.as_ref().ok_or(EditError::NoImage)?;
        let rotated = match turn {
            QuarterTurn::Clockwise => source.rotate90(),
            QuarterTurn::CounterClockwise => source.rotate270(),
        };
        let derived = processing::apply(&rotated, &self.params)?;
        self.source = Some(rotated);
        self.replace_derived(derived);
        Ok(())
    }

    /// How the derived image fits a viewport of the given size.
    pub fn display_transform(&self, viewport: (f32, f32)) -> Option<DisplayTransform> {
        let derived = self.derived.as_ref()?;
        DisplayTransform::fit((derived.width(), derived.height()), viewport)
    }

    pub fn begin_crop(&mut self) -> Result<(), EditError> {
        if self.source.is_none() {
            return Err(EditError::NoImage);
        }
        self.crop.enable();
        Ok(())
    }

    pub fn cancel_crop(&mut self) {
        self.crop.cancel();
    }

    pub fn pointer_pressed(&mut self, at: Point) {
        self.crop.pointer_down(at);
    }

    pub fn pointer_moved(&mut self, at: Point) {
        self.crop.pointer_moved(at);
    }

    /// Finishes a crop drag. Returns the committed source rectangle, or
    /// `None` if no drag was in progress.
    pub fn pointer_released(
        &mut self,
        at: Point,
        viewport: (f32, f32),
    ) -> Result<Option<SourceRect>, EditError> {
        let Some(screen) = self.crop.pointer_up(at) else {
            return Ok(None);
        };
        let display = self.display_transform(viewport).ok_or(EditError::NoImage)?;
        self.crop_to_screen_rect(&screen, &display)
            .inspect_err(|err| warn!(%err, "discarded crop selection"))
            .map(Some)
    }

    /// Maps a rectangle drawn over the derived image back to source pixels
    /// and commits it as a crop.
    pub fn crop_to_screen_rect(
        &mut self,
        screen: &ScreenRect,
        display: &DisplayTransform,
    ) -> Result<SourceRect, EditError> {
        let (source, derived) = match (self.source.as_ref(), self.derived.as_ref()) {
            (Some(s), Some(d)) => (s, d),
            _ => return Err(EditError::NoImage),
        };
        // Actual resampled ratio rather than the raw factor, so rounding in
        // the stretch stage does not skew the mapping.
        let ratio_x = derived.width() as f32 / source.width() as f32;
        let ratio_y = derived.height() as f32 / source.height() as f32;
        let rect = crop::to_source_rect(
            screen,
            &display.unstretched(ratio_x, ratio_y),
            self.params.flips(),
            (source.width(), source.height()),
        )?;
        self.commit_crop(rect)?;
        Ok(rect)
    }

    /// Replaces the source with `rect` of itself. Parameters carry over.
    pub fn commit_crop(&mut self, rect: SourceRect) -> Result<(), EditError> {
        let source = self.source.as_ref().ok_or(EditError::NoImage)?;
        let cropped = crop::commit_crop(source, rect)?;
        let derived = processing::apply(&cropped, &self.params)?;
        info!(
            left = rect.left,
            top = rect.top,
            width = rect.width(),
            height = rect.height(),
            "committed crop"
        );
        self.source = Some(cropped);
        self.replace_derived(derived);
        Ok(())
    }

    /// Writes the derived image; the format follows the extension.
    pub fn save_as(&self, path: &Path, jpeg_quality: u8) -> Result<PathBuf, EditError> {
        let derived = self.derived.as_ref().ok_or(EditError::NoImage)?;
        let written = imageio::save_image(derived, path, jpeg_quality)?;
        info!(path = %written.display(), "saved image");
        Ok(written)
    }
}
