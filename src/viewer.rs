use retouch::{EditError, Editor, Point, SourceRect};

const CROP_STROKE: egui::Color32 = egui::Color32::from_rgb(255, 210, 0);

pub enum CanvasEvent {
    Cropped(SourceRect),
    CropRejected(EditError),
}

/// Draws the derived image letterboxed into the central panel and turns
/// pointer drags into crop gestures on the editor.
pub struct Viewer {
    texture: Option<egui::TextureHandle>,
    uploaded_revision: Option<u64>,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            texture: None,
            uploaded_revision: None,
        }
    }

    fn sync_texture(&mut self, ctx: &egui::Context, editor: &Editor) {
        if self.uploaded_revision == Some(editor.revision()) {
            return;
        }
        self.uploaded_revision = Some(editor.revision());
        self.texture = editor.derived().map(|img| {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
            ctx.load_texture("derived_image", color, egui::TextureOptions::LINEAR)
        });
    }

    pub fn show(&mut self, ui: &mut egui::Ui, editor: &mut Editor) -> Option<CanvasEvent> {
        self.sync_texture(ui.ctx(), editor);

        let canvas = ui.available_rect_before_wrap();
        let sense = if editor.crop_tool().is_active() {
            egui::Sense::click_and_drag()
        } else {
            egui::Sense::hover()
        };
        let response = ui.allocate_rect(canvas, sense);
        let viewport = (canvas.width(), canvas.height());

        let (Some(texture), Some(display), Some(derived)) = (
            self.texture.as_ref(),
            editor.display_transform(viewport),
            editor.derived(),
        ) else {
            ui.painter().text(
                canvas.center(),
                egui::Align2::CENTER_CENTER,
                "Open an image to start",
                egui::FontId::proportional(16.0),
                ui.visuals().weak_text_color(),
            );
            return None;
        };

        let origin = display.to_screen(0.0, 0.0);
        let (w, h) = display.displayed_size(derived.width(), derived.height());
        let image_rect = egui::Rect::from_min_size(
            canvas.min + egui::vec2(origin.x, origin.y),
            egui::vec2(w, h),
        );
        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if !editor.crop_tool().is_active() {
            return None;
        }
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        let local = |pos: egui::Pos2| Point::new(pos.x - canvas.min.x, pos.y - canvas.min.y);
        let mut event = None;

        if response.drag_started() {
            let origin = ui
                .input(|i| i.pointer.press_origin())
                .or(response.interact_pointer_pos());
            if let Some(pos) = origin {
                editor.pointer_pressed(local(pos));
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                editor.pointer_moved(local(pos));
            }
        }
        if response.drag_stopped() {
            let end = response
                .interact_pointer_pos()
                .map(local)
                .or_else(|| editor.crop_tool().live_rect().map(|r| r.end));
            if let Some(end) = end {
                event = match editor.pointer_released(end, viewport) {
                    Ok(Some(rect)) => Some(CanvasEvent::Cropped(rect)),
                    Ok(None) => None,
                    Err(err) => Some(CanvasEvent::CropRejected(err)),
                };
            }
        }

        if let Some(live) = editor.crop_tool().live_rect() {
            let a = canvas.min + egui::vec2(live.start.x, live.start.y);
            let b = canvas.min + egui::vec2(live.end.x, live.end.y);
            paint_selection(ui.painter(), egui::Rect::from_two_pos(a, b));
        }

        event
    }
}

fn paint_selection(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_filled(rect, 0.0, egui::Color32::from_white_alpha(24));
    let stroke = egui::Stroke::new(1.5, CROP_STROKE);
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    for i in 0..corners.len() {
        painter.line_segment([corners[i], corners[(i + 1) % corners.len()]], stroke);
    }
}
