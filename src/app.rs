use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::Context;
use retouch::config::AppConfig;
use retouch::{EditError, Editor, QuarterTurn};

use crate::viewer::{CanvasEvent, Viewer};

const TOOLS_WIDTH: f32 = 300.0;

#[derive(Debug, PartialEq)]
enum Status {
    Idle,
    Info(String),
    Warning(String),
    Error(String),
}

impl Status {
    /// Rejected edits leave the image as it was, so they only warn.
    fn from_error(err: &EditError) -> Self {
        if err.is_recoverable_edit() {
            Status::Warning(err.to_string())
        } else {
            Status::Error(err.to_string())
        }
    }
}

pub struct RetouchApp {
    editor: Editor,
    viewer: Viewer,
    config: AppConfig,
    open_input: String,
    save_input: String,
    status: Status,
}

impl RetouchApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        initial: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            editor: Editor::new(),
            viewer: Viewer::new(),
            config,
            open_input: String::new(),
            save_input: String::new(),
            status: Status::Idle,
        };
        if let Some(path) = initial {
            app.open_input = path.display().to_string();
            app.open_from_input();
        }
        app
    }

    fn open_from_input(&mut self) {
        let result = open_path(&mut self.editor, &self.open_input);
        self.status = match result {
            Ok(path) => {
                if let Some(target) = suggested_save_path(&self.editor) {
                    self.save_input = target.display().to_string();
                }
                Status::Info(format!("Opened {}", path.display()))
            }
            Err(err) => Status::Error(format!("{err:#}")),
        };
    }

    fn save_from_input(&mut self) {
        let result = save_path(&self.editor, &self.save_input, self.config.jpeg_quality());
        self.status = match result {
            Ok(path) => Status::Info(format!("Saved {}", path.display())),
            Err(err) => Status::Error(format!("{err:#}")),
        };
    }

    fn report(&mut self, result: Result<(), EditError>, done: &str) {
        self.status = match result {
            Ok(()) => Status::Info(done.to_string()),
            Err(err) => Status::from_error(&err),
        };
    }

    fn show_file_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Image");
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.open_input)
                    .desired_width(280.0)
                    .hint_text("path/to/image.jpg"),
            );
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Open").clicked() || submitted {
                self.open_from_input();
            }

            ui.separator();
            ui.label("Save as");
            ui.add(
                egui::TextEdit::singleline(&mut self.save_input)
                    .desired_width(280.0)
                    .hint_text("edited.jpg"),
            );
            if ui
                .add_enabled(self.editor.derived().is_some(), egui::Button::new("Save"))
                .clicked()
            {
                self.save_from_input();
            }
        });
    }

    fn show_edit_bar(&mut self, ui: &mut egui::Ui) {
        let has_image = self.editor.source().is_some();
        ui.horizontal(|ui| {
            ui.add_enabled_ui(has_image, |ui| {
                let cropping = self.editor.crop_tool().is_active();
                if ui.selectable_label(cropping, "✂ Crop").clicked() {
                    if cropping {
                        self.editor.cancel_crop();
                        self.status = Status::Idle;
                    } else {
                        let result = self.editor.begin_crop();
                        self.report(result, "Drag a rectangle over the image");
                    }
                }
                if ui.button("⟲ 90°").clicked() {
                    let result = self.editor.rotate(QuarterTurn::CounterClockwise);
                    self.report(result, "Rotated left");
                }
                if ui.button("90° ⟳").clicked() {
                    let result = self.editor.rotate(QuarterTurn::Clockwise);
                    self.report(result, "Rotated right");
                }
                ui.separator();
                let adjusted = !self.editor.params().is_default();
                if ui.add_enabled(adjusted, egui::Button::new("Reset")).clicked() {
                    let result = self.editor.reset();
                    self.report(result, "Adjustments reset");
                }
                if ui.button("Revert").clicked() {
                    let result = self.editor.revert();
                    self.report(result, "Reverted to the opened image");
                }
            });

            ui.separator();
            match &self.status {
                Status::Idle => {}
                Status::Info(msg) => {
                    ui.label(egui::RichText::new(msg).weak());
                }
                Status::Warning(msg) => {
                    ui.colored_label(ui.visuals().warn_fg_color, msg);
                }
                Status::Error(msg) => {
                    ui.colored_label(ui.visuals().error_fg_color, msg);
                }
            }
        });
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let mut params = *self.editor.params();
        let mut changed = false;

        ui.label(egui::RichText::new("Color").strong());
        changed |= param_slider(ui, "Red", &mut params.red, 0.0..=2.0);
        changed |= param_slider(ui, "Green", &mut params.green, 0.0..=2.0);
        changed |= param_slider(ui, "Blue", &mut params.blue, 0.0..=2.0);
        changed |= param_slider(ui, "Saturation", &mut params.saturation, 0.0..=3.0);
        ui.separator();

        ui.label(egui::RichText::new("Tone").strong());
        changed |= param_slider(ui, "Brightness", &mut params.brightness, 0.0..=2.0);
        changed |= param_slider(ui, "Sharpness", &mut params.sharpness, 0.0..=3.0);
        changed |= param_slider(ui, "Blur", &mut params.blur_radius, 0.0..=10.0);
        ui.separator();

        ui.label(egui::RichText::new("Transform").strong());
        changed |= param_slider(ui, "Stretch H", &mut params.stretch_horizontal, 0.1..=3.0);
        changed |= param_slider(ui, "Stretch V", &mut params.stretch_vertical, 0.1..=3.0);
        ui.horizontal(|ui| {
            ui.label("Flip");
            if ui
                .selectable_label(params.flip_horizontal, "↔ H")
                .clicked()
            {
                params.flip_horizontal = !params.flip_horizontal;
                changed = true;
            }
            if ui.selectable_label(params.flip_vertical, "↕ V").clicked() {
                params.flip_vertical = !params.flip_vertical;
                changed = true;
            }
        });

        if changed {
            if let Err(err) = self.editor.set_params(params) {
                self.status = Status::from_error(&err);
            }
        }

        if let Some(img) = self.editor.derived() {
            ui.add_space(8.0);
            ui.label(egui::RichText::new(format!("{} × {} px", img.width(), img.height())).weak());
        }
    }
}

fn param_slider(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f32,
    range: RangeInclusive<f32>,
) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(
            egui::Slider::new(value, range)
                .fixed_decimals(2)
                .clamping(egui::SliderClamping::Always),
        )
        .changed()
    })
    .inner
}

fn open_path(editor: &mut Editor, raw: &str) -> anyhow::Result<PathBuf> {
    let path = expand_home_prefix(raw.trim());
    if path.as_os_str().is_empty() {
        anyhow::bail!("Enter a path to open");
    }
    editor
        .open(&path)
        .with_context(|| format!("Open failed for {}", path.display()))?;
    Ok(path)
}

fn save_path(editor: &Editor, raw: &str, jpeg_quality: u8) -> anyhow::Result<PathBuf> {
    let path = expand_home_prefix(raw.trim());
    if path.as_os_str().is_empty() {
        anyhow::bail!("Enter a path to save to");
    }
    editor
        .save_as(&path, jpeg_quality)
        .with_context(|| format!("Save failed for {}", path.display()))
}

fn suggested_save_path(editor: &Editor) -> Option<PathBuf> {
    editor.path().map(default_save_path)
}

/// Suggests `<stem>-edited.jpg` next to the opened file.
fn default_save_path(opened: &Path) -> PathBuf {
    let stem = opened
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    opened.with_file_name(format!("{}-edited.jpg", stem))
}

fn expand_home_prefix(raw: &str) -> PathBuf {
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

impl eframe::App for RetouchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.editor.crop_tool().is_active() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.editor.cancel_crop();
            self.status = Status::Info("Crop cancelled".to_string());
        }

        egui::TopBottomPanel::top("file_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.show_file_bar(ui);
            self.show_edit_bar(ui);
            ui.add_space(4.0);
        });

        egui::SidePanel::right("adjustments")
            .resizable(false)
            .exact_width(TOOLS_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("adjustments_scroll")
                    .show(ui, |ui| self.show_controls(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            match self.viewer.show(ui, &mut self.editor) {
                Some(CanvasEvent::Cropped(rect)) => {
                    self.status = Status::Info(format!(
                        "Cropped to {} × {} at ({}, {})",
                        rect.width(),
                        rect.height(),
                        rect.left,
                        rect.top
                    ));
                }
                Some(CanvasEvent::CropRejected(err)) => {
                    self.status = Status::from_error(&err);
                }
                None => {}
            }
        });
    }
}
