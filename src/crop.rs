//! Crop gesture handling and screen-to-source coordinate mapping.
//!
//! The viewer shows the derived image scaled to fit and centered in the
//! viewport. A rectangle dragged on screen is mapped back through that display
//! transform, un-flipped against the source dimensions, and validated before
//! it is allowed to replace the source image.

use image::DynamicImage;

use crate::error::EditError;
use crate::state::FlipState;

/// Tolerance, in source pixels, for edges that land just outside the image.
const EDGE_TOLERANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Rectangle in viewport-local coordinates, as dragged (any direction).
pub struct ScreenRect {
    pub start: Point,
    pub end: Point,
}

impl ScreenRect {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Half-open pixel rectangle in source image coordinates.
pub struct SourceRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl SourceRect {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Maps image pixels to viewport pixels: `screen = image * scale + offset`.
pub struct DisplayTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl DisplayTransform {
    pub fn uniform(scale: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            offset_x,
            offset_y,
        }
    }

    /// Fits an image into a viewport, preserving aspect ratio and centering
    /// it on the axis with spare room. `None` for empty sizes.
    pub fn fit(image_size: (u32, u32), viewport: (f32, f32)) -> Option<Self> {
        let (iw, ih) = (image_size.0 as f32, image_size.1 as f32);
        let (vw, vh) = viewport;
        if iw <= 0.0 || ih <= 0.0 || vw <= 0.0 || vh <= 0.0 {
            return None;
        }
        let scale = (vw / iw).min(vh / ih);
        Some(Self::uniform(
            scale,
            (vw - iw * scale) * 0.5,
            (vh - ih * scale) * 0.5,
        ))
    }

    /// Folds stretch factors into the scale so the transform maps unstretched
    /// source pixels to the screen.
    pub fn unstretched(&self, horizontal: f32, vertical: f32) -> Self {
        Self {
            scale_x: self.scale_x * horizontal,
            scale_y: self.scale_y * vertical,
            ..*self
        }
    }

    pub fn to_screen(&self, x: f32, y: f32) -> Point {
        Point::new(
            x * self.scale_x + self.offset_x,
            y * self.scale_y + self.offset_y,
        )
    }

    pub fn to_image(&self, p: Point) -> (f32, f32) {
        (
            (p.x - self.offset_x) / self.scale_x,
            (p.y - self.offset_y) / self.scale_y,
        )
    }

    /// On-screen size of an image drawn with this transform.
    pub fn displayed_size(&self, width: u32, height: u32) -> (f32, f32) {
        (width as f32 * self.scale_x, height as f32 * self.scale_y)
    }
}

/// Maps a dragged screen rectangle to a rectangle of source pixels.
///
/// Flips mirror the mapped edges about the source's full width or height,
/// since the flipped display's left edge is the source's right edge.
pub fn to_source_rect(
    screen: &ScreenRect,
    display: &DisplayTransform,
    flips: FlipState,
    source_size: (u32, u32),
) -> Result<SourceRect, EditError> {
    if !(display.scale_x > 0.0 && display.scale_y > 0.0) {
        return Err(EditError::InvalidCropRegion(
            "display scale must be positive".to_string(),
        ));
    }

    let (x0, y0) = display.to_image(screen.start);
    let (x1, y1) = display.to_image(screen.end);
    let (mut left, mut right) = (x0.min(x1), x0.max(x1));
    let (mut top, mut bottom) = (y0.min(y1), y0.max(y1));

    let (w, h) = (source_size.0 as f32, source_size.1 as f32);
    if flips.horizontal {
        (left, right) = (w - right, w - left);
    }
    if flips.vertical {
        (top, bottom) = (h - bottom, h - top);
    }

    if left < -EDGE_TOLERANCE
        || top < -EDGE_TOLERANCE
        || right > w + EDGE_TOLERANCE
        || bottom > h + EDGE_TOLERANCE
    {
        return Err(EditError::InvalidCropRegion(format!(
            "({left:.1}, {top:.1})-({right:.1}, {bottom:.1}) lies outside the {}x{} image",
            source_size.0, source_size.1
        )));
    }

    let snap = |v: f32, max: u32| (v.round().max(0.0) as u32).min(max);
    let rect = SourceRect {
        left: snap(left, source_size.0),
        top: snap(top, source_size.1),
        right: snap(right, source_size.0),
        bottom: snap(bottom, source_size.1),
    };
    if rect.width() == 0 || rect.height() == 0 {
        return Err(EditError::InvalidCropRegion(format!(
            "{}x{} selection is empty",
            rect.width(),
            rect.height()
        )));
    }
    Ok(rect)
}

/// Crops `source` to `rect`, which must lie inside the image.
pub fn commit_crop(source: &DynamicImage, rect: SourceRect) -> Result<DynamicImage, EditError> {
    if rect.width() == 0 || rect.height() == 0 {
        return Err(EditError::InvalidCropRegion(
            "selection is empty".to_string(),
        ));
    }
    if rect.right > source.width() || rect.bottom > source.height() {
        return Err(EditError::InvalidCropRegion(format!(
            "{rect:?} exceeds the {}x{} image",
            source.width(),
            source.height()
        )));
    }
    Ok(source.crop_imm(rect.left, rect.top, rect.width(), rect.height()))
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Crop gesture state: `Idle -> Armed -> Dragging -> Idle`.
pub enum CropTool {
    #[default]
    Idle,
    Armed,
    Dragging {
        start: Point,
        current: Point,
    },
}

impl CropTool {
    pub fn enable(&mut self) {
        *self = CropTool::Armed;
    }

    pub fn cancel(&mut self) {
        *self = CropTool::Idle;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, CropTool::Idle)
    }

    /// Starts a new rectangle, discarding any rectangle still being dragged.
    pub fn pointer_down(&mut self, at: Point) {
        if self.is_active() {
            *self = CropTool::Dragging {
                start: at,
                current: at,
            };
        }
    }

    pub fn pointer_moved(&mut self, at: Point) {
        if let CropTool::Dragging { current, .. } = self {
            *current = at;
        }
    }

    /// Ends the gesture. Returns the dragged rectangle if one was live.
    pub fn pointer_up(&mut self, at: Point) -> Option<ScreenRect> {
        match *self {
            CropTool::Dragging { start, .. } => {
                *self = CropTool::Idle;
                Some(ScreenRect::new(start, at))
            }
            _ => None,
        }
    }

    pub fn live_rect(&self) -> Option<ScreenRect> {
        match *self {
            CropTool::Dragging { start, current } => Some(ScreenRect::new(start, current)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, ImageBuffer, Rgba};
    use proptest::prelude::*;

    use super::*;

    const NO_FLIP: FlipState = FlipState {
        horizontal: false,
        vertical: false,
    };

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> ScreenRect {
        ScreenRect::new(Point::new(x0, y0), Point::new(x1, y1))
    }

    #[test]
    fn maps_through_scale_and_offset() {
        let display = DisplayTransform::uniform(0.5, 20.0, 10.0);
        let mapped =
            to_source_rect(&rect(120.0, 110.0, 220.0, 210.0), &display, NO_FLIP, (500, 500))
                .unwrap();
        assert_eq!(
            mapped,
            SourceRect {
                left: 200,
                top: 200,
                right: 400,
                bottom: 400
            }
        );
    }

    #[test]
    fn drag_direction_does_not_matter() {
        let display = DisplayTransform::uniform(0.5, 20.0, 10.0);
        let forward =
            to_source_rect(&rect(120.0, 110.0, 220.0, 210.0), &display, NO_FLIP, (500, 500));
        let backward =
            to_source_rect(&rect(220.0, 210.0, 120.0, 110.0), &display, NO_FLIP, (500, 500));
        assert_eq!(forward.unwrap(), backward.unwrap());
    }

    #[test]
    fn horizontal_flip_mirrors_about_source_width() {
        let display = DisplayTransform::uniform(1.0, 0.0, 0.0);
        let flips = FlipState {
            horizontal: true,
            vertical: false,
        };
        let mapped =
            to_source_rect(&rect(100.0, 0.0, 200.0, 50.0), &display, flips, (500, 300)).unwrap();
        assert_eq!((mapped.left, mapped.right), (300, 400));
        assert_eq!((mapped.top, mapped.bottom), (0, 50));
    }

    #[test]
    fn vertical_flip_mirrors_about_source_height() {
        let display = DisplayTransform::uniform(1.0, 0.0, 0.0);
        let flips = FlipState {
            horizontal: false,
            vertical: true,
        };
        let mapped =
            to_source_rect(&rect(0.0, 10.0, 40.0, 60.0), &display, flips, (100, 200)).unwrap();
        assert_eq!((mapped.top, mapped.bottom), (140, 190));
    }

    #[test]
    fn out_of_bounds_selection_is_rejected() {
        let display = DisplayTransform::uniform(1.0, 0.0, 0.0);
        let err = to_source_rect(&rect(-20.0, 0.0, 50.0, 50.0), &display, NO_FLIP, (100, 100))
            .unwrap_err();
        assert!(matches!(err, EditError::InvalidCropRegion(_)));
        assert!(
            to_source_rect(&rect(10.0, 10.0, 50.0, 180.0), &display, NO_FLIP, (100, 100)).is_err()
        );
    }

    #[test]
    fn degenerate_selection_is_rejected() {
        let display = DisplayTransform::uniform(1.0, 0.0, 0.0);
        assert!(
            to_source_rect(&rect(30.0, 10.0, 30.0, 60.0), &display, NO_FLIP, (100, 100)).is_err()
        );
        assert!(
            to_source_rect(&rect(30.0, 10.0, 30.2, 60.0), &display, NO_FLIP, (100, 100)).is_err()
        );
    }

    #[test]
    fn edges_just_outside_snap_to_bounds() {
        let display = DisplayTransform::uniform(1.0, 0.0, 0.0);
        let mapped =
            to_source_rect(&rect(-0.3, -0.2, 100.4, 50.0), &display, NO_FLIP, (100, 100)).unwrap();
        assert_eq!((mapped.left, mapped.top, mapped.right), (0, 0, 100));
    }

    #[test]
    fn fit_letterboxes_wide_images() {
        let display = DisplayTransform::fit((400, 100), (200.0, 200.0)).unwrap();
        assert_eq!(display.scale_x, 0.5);
        assert_eq!(display.offset_x, 0.0);
        assert_eq!(display.offset_y, 75.0);
        assert_eq!(display.displayed_size(400, 100), (200.0, 50.0));
        assert_eq!(display.to_screen(0.0, 0.0), Point::new(0.0, 75.0));
        assert_eq!(display.to_screen(400.0, 100.0), Point::new(200.0, 125.0));
        assert!(DisplayTransform::fit((0, 10), (100.0, 100.0)).is_none());
    }

    #[test]
    fn unstretched_transform_maps_to_source_pixels() {
        // Source 100 wide shown stretched to 200 wide at scale 1.
        let display = DisplayTransform::uniform(1.0, 0.0, 0.0).unstretched(2.0, 1.0);
        let mapped =
            to_source_rect(&rect(50.0, 0.0, 150.0, 10.0), &display, NO_FLIP, (100, 10)).unwrap();
        assert_eq!((mapped.left, mapped.right), (25, 75));
    }

    #[test]
    fn commit_crop_extracts_region() {
        let src = DynamicImage::ImageRgba8(ImageBuffer::from_fn(10, 10, |x, y| {
            Rgba([(y * 10 + x) as u8, 0, 0, 255])
        }));
        let rect = SourceRect {
            left: 2,
            top: 3,
            right: 6,
            bottom: 8,
        };
        let out = commit_crop(&src, rect).unwrap();
        assert_eq!((out.width(), out.height()), (4, 5));
        assert_eq!(out.to_rgba8().get_pixel(0, 0)[0], 32);
    }

    #[test]
    fn commit_crop_rejects_oversized_region() {
        let src = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(10, 10, Rgba([0, 0, 0, 255])));
        let rect = SourceRect {
            left: 0,
            top: 0,
            right: 11,
            bottom: 5,
        };
        assert!(commit_crop(&src, rect).is_err());
    }

    #[test]
    fn crop_tool_state_machine() {
        let mut tool = CropTool::default();
        tool.pointer_down(Point::new(1.0, 1.0));
        assert_eq!(tool, CropTool::Idle, "idle tool ignores pointer");

        tool.enable();
        assert_eq!(tool, CropTool::Armed);
        assert_eq!(tool.pointer_up(Point::new(3.0, 3.0)), None);

        tool.pointer_down(Point::new(1.0, 2.0));
        tool.pointer_moved(Point::new(5.0, 6.0));
        assert_eq!(tool.live_rect(), Some(rect(1.0, 2.0, 5.0, 6.0)));

        // A second press discards the uncommitted rectangle.
        tool.pointer_down(Point::new(10.0, 10.0));
        let done = tool.pointer_up(Point::new(20.0, 30.0));
        assert_eq!(done, Some(rect(10.0, 10.0, 20.0, 30.0)));
        assert_eq!(tool, CropTool::Idle);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut tool = CropTool::default();
        tool.enable();
        tool.pointer_down(Point::new(0.0, 0.0));
        tool.cancel();
        assert!(!tool.is_active());
        assert_eq!(tool.live_rect(), None);
    }

    proptest! {
        #[test]
        fn prop_screen_round_trip_recovers_source_rect(
            scale in 0.1f32..4.0,
            (ox, oy) in (0.0f32..200.0, 0.0f32..200.0),
            (left, top) in (0u32..100, 0u32..100),
            (w, h) in (1u32..100, 1u32..100),
            horizontal in any::<bool>(),
            vertical in any::<bool>(),
        ) {
            let size = (200u32, 200u32);
            let want = SourceRect { left, top, right: left + w, bottom: top + h };
            let display = DisplayTransform::uniform(scale, ox, oy);
            let flips = FlipState { horizontal, vertical };

            // Where the rectangle appears on screen once flipped.
            let (sl, sr) = if horizontal {
                (size.0 - want.right, size.0 - want.left)
            } else {
                (want.left, want.right)
            };
            let (st, sb) = if vertical {
                (size.1 - want.bottom, size.1 - want.top)
            } else {
                (want.top, want.bottom)
            };
            let screen = ScreenRect::new(
                display.to_screen(sl as f32, st as f32),
                display.to_screen(sr as f32, sb as f32),
            );

            let got = to_source_rect(&screen, &display, flips, size).unwrap();
            prop_assert_eq!(got, want);
        }
    }
}
