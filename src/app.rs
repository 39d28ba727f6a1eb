use std::path::PathBuf;

use crossbeam::channel::{Receiver, Sender};
use eframe::egui;

use crate::clip::MIN_POLYGON_VERTICES;
use crate::config::{CropperConfig, ExportFormat};
use crate::drag::{DragState, PressOutcome};
use crate::loader::{self, LoadOutcome};
use crate::mapper::ImageView;
use crate::preset::AspectRatioMode;
use crate::render::{self, PolygonStyle};
use crate::session::CropSession;

pub struct CropperApp {
    session: CropSession,
    style: PolygonStyle,
    texture: Option<egui::TextureHandle>,
    result_texture: Option<egui::TextureHandle>,
    aspect_ratio_mode: AspectRatioMode,
    custom_w: u32,
    custom_h: u32,
    is_portrait: bool,
    status: Option<String>,
    load_tx: Sender<LoadOutcome>,
    load_rx: Receiver<LoadOutcome>,
}

impl CropperApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: CropperConfig) -> Self {
        let (load_tx, load_rx) = crossbeam::channel::unbounded();
        Self {
            style: PolygonStyle::from(&config),
            session: CropSession::new(config),
            texture: None,
            result_texture: None,
            aspect_ratio_mode: AspectRatioMode::Free,
            custom_w: 4,
            custom_h: 3,
            is_portrait: false,
            status: None,
            load_tx,
            load_rx,
        }
    }

    fn start_load(&mut self, path: PathBuf) {
        let ticket = self.session.begin_load();
        log::info!("loading {}", path.display());
        loader::spawn_decode(
            path,
            ticket,
            self.session.config().max_file_size,
            self.load_tx.clone(),
        );
    }

    fn poll_loads(&mut self, ctx: &egui::Context) {
        while let Ok(outcome) = self.load_rx.try_recv() {
            match self.session.finish_load(outcome.ticket, outcome.result) {
                Ok(true) => {
                    self.status = None;
                    self.load_texture(ctx);
                }
                Ok(false) => {}
                Err(e) => {
                    log::warn!("failed to load {}: {}", outcome.path.display(), e);
                    self.status = Some(format!("{}: {}", outcome.path.display(), e));
                }
            }
        }
        if self.session.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        self.result_texture = None;
        self.texture = self.session.image().map(|image| {
            let size = [image.width() as _, image.height() as _];
            let image_buffer = image.to_rgba8();
            let pixels = image_buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR)
        });
    }

    fn load_result_texture(&mut self, ctx: &egui::Context) {
        self.result_texture = self.session.result().map(|result| {
            let size = [result.width() as _, result.height() as _];
            let color_image =
                egui::ColorImage::from_rgba_unmultiplied(size, result.image().as_raw());
            ctx.load_texture("cropped", color_image, egui::TextureOptions::LINEAR)
        });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped_files.first() else {
            return;
        };
        if let Some(path) = &file.path {
            self.start_load(path.clone());
        } else if let Some(bytes) = &file.bytes {
            match loader::decode_bytes_limited(bytes, self.session.config().max_file_size) {
                Ok(image) => {
                    self.session.load_image(image);
                    self.status = None;
                    self.load_texture(ctx);
                }
                Err(e) => self.status = Some(format!("{}: {}", file.name, e)),
            }
        }
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", self.session.config().accepted_extensions)
            .pick_file()
        {
            self.start_load(path);
        }
    }

    fn crop(&mut self, ctx: &egui::Context) {
        match self.session.crop() {
            Ok(_) => self.status = None,
            Err(e) => self.status = Some(e.to_string()),
        }
        self.load_result_texture(ctx);
    }

    fn save_result(&mut self) {
        let Some(result) = self.session.result() else {
            return;
        };
        let config = self.session.config();
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(config.default_file_name)
            .add_filter("PNG", &[ExportFormat::Png.extension()])
            .add_filter(
                "JPEG",
                &[
                    ExportFormat::Jpeg {
                        quality: config.jpeg_quality,
                    }
                    .extension(),
                    "jpeg",
                ],
            )
            .save_file()
        else {
            return;
        };
        match result.save(&path, config.jpeg_quality) {
            Ok(()) => {
                log::info!("saved crop to {}", path.display());
                self.status = None;
            }
            Err(e) => {
                log::error!("failed to save image: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            if self.texture.is_none() {
                if ui.button("Open Image").clicked() {
                    self.pick_file();
                }
                ui.label("or drop an image onto the window");
                return;
            }

            if ui
                .button("New Image")
                .on_hover_text("Load a new image")
                .clicked()
            {
                self.pick_file();
            }
            if ui
                .button("Reset Points")
                .on_hover_text("Reset all points")
                .clicked()
            {
                self.session.reset_points();
                self.result_texture = None;
            }
            if ui
                .add_enabled(self.session.can_crop(), egui::Button::new("Crop Image"))
                .on_hover_text("Crop the selected area")
                .on_disabled_hover_text(format!("Need at least {MIN_POLYGON_VERTICES} points to crop"))
                .clicked()
            {
                self.crop(ctx);
            }
            if ui
                .button("Clear All")
                .on_hover_text("Clear everything")
                .clicked()
            {
                self.session.clear_all();
                self.texture = None;
                self.result_texture = None;
            }
        });
    }

    fn rectangle_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Rectangle:");
            let custom = AspectRatioMode::Custom {
                w: self.custom_w,
                h: self.custom_h,
            };
            egui::ComboBox::from_id_salt("params_aspect_ratio")
                .selected_text(format!("{}", self.aspect_ratio_mode))
                .show_ui(ui, |ui| {
                    for mode in [
                        AspectRatioMode::Free,
                        AspectRatioMode::Original,
                        AspectRatioMode::Square,
                    ] {
                        ui.selectable_value(&mut self.aspect_ratio_mode, mode, mode.to_string());
                    }
                    ui.separator();
                    let oriented = if self.is_portrait {
                        AspectRatioMode::PORTRAIT
                    } else {
                        AspectRatioMode::LANDSCAPE
                    };
                    for mode in oriented {
                        ui.selectable_value(&mut self.aspect_ratio_mode, mode, mode.to_string());
                    }
                    ui.separator();
                    ui.selectable_value(&mut self.aspect_ratio_mode, custom, "Custom");
                });

            if ui.button("🔄").on_hover_text("Swap orientation").clicked() {
                self.is_portrait = !self.is_portrait;
                std::mem::swap(&mut self.custom_w, &mut self.custom_h);
                self.aspect_ratio_mode = self.aspect_ratio_mode.counterpart();
            }

            if let AspectRatioMode::Custom { .. } = self.aspect_ratio_mode {
                ui.add(
                    egui::DragValue::new(&mut self.custom_w)
                        .speed(0.1)
                        .range(1..=100),
                );
                ui.label(":");
                ui.add(
                    egui::DragValue::new(&mut self.custom_h)
                        .speed(0.1)
                        .range(1..=100),
                );
                self.aspect_ratio_mode = AspectRatioMode::Custom {
                    w: self.custom_w,
                    h: self.custom_h,
                };
            }

            if ui
                .button("Insert")
                .on_hover_text("Replace the points with a rectangle")
                .clicked()
            {
                self.session.seed_rectangle(self.aspect_ratio_mode);
            }
        });
    }

    fn point_count(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("Points: {}", self.session.points().len()));
            let missing = self.session.points_needed();
            if missing > 0 {
                ui.colored_label(
                    ui.visuals().warn_fg_color,
                    format!("Need at least {MIN_POLYGON_VERTICES} points to crop ({missing} more)"),
                );
            }
            if self.session.is_loading() {
                ui.spinner();
            }
        });
    }

    fn result_panel(&mut self, ctx: &egui::Context) {
        let Some(texture) = self.result_texture.clone() else {
            return;
        };
        egui::TopBottomPanel::bottom("cropped_result")
            .resizable(true)
            .min_height(120.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Cropped Result");
                    let size = texture.size();
                    ui.label(format!("{} × {}", size[0], size[1]));
                    if ui.button("Save Cropped Image").clicked() {
                        self.save_result();
                    }
                    if ui
                        .button("Copy Data URL")
                        .on_hover_text("Copy the PNG as a data: URL")
                        .clicked()
                    {
                        self.copy_data_url(ctx);
                    }
                });
                ui.add(
                    egui::Image::from_texture(&texture)
                        .max_height(ui.available_height())
                        .max_width(ui.available_width()),
                );
            });
    }

    fn copy_data_url(&mut self, ctx: &egui::Context) {
        let Some(result) = self.session.result() else {
            return;
        };
        match result.to_data_url(Default::default()) {
            Ok(url) => ctx.copy_text(url),
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        if let Some(texture) = &self.texture {
            canvas(ui, &mut self.session, texture, &self.style);
        }
    }
}

/// Draws the image and polygon and feeds pointer input into `session`.
///
/// Presses only count when the canvas itself is the hovered widget, so a
/// click on a popup or window drawn over it never reaches the session.
pub(crate) fn canvas(
    ui: &mut egui::Ui,
    session: &mut CropSession,
    texture: &egui::TextureHandle,
    style: &PolygonStyle,
) {
    let Some(native_size) = session.native_size() else {
        return;
    };
    let ctx = ui.ctx().clone();

    let padding = session.config().canvas_padding;
    let hit_radius = session.config().hit_radius;
    let (target_rect, view) = ImageView::fit(ui.available_rect_before_wrap(), native_size, padding);
    let response = ui.allocate_rect(target_rect, egui::Sense::click_and_drag());
    let painter = ui.painter_at(target_rect);

    let (pressed, released, hover) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.hover_pos(),
        )
    });

    if pressed {
        // Handles sitting on the image border stay grabbable.
        let press_area = view.rect.expand(hit_radius);
        if let Some(pos) = response.hover_pos().filter(|p| press_area.contains(*p)) {
            match session.pointer_down(pos, &view) {
                PressOutcome::Grabbed(index) => log::debug!("grabbed vertex {}", index),
                PressOutcome::Added(_) | PressOutcome::Ignored => {}
            }
        }
    }

    if session.drag_state() != DragState::Idle {
        match hover {
            Some(pos) if target_rect.contains(pos) => {
                if session.pointer_move(pos, &view) {
                    ctx.request_repaint();
                }
            }
            _ => session.pointer_leave(),
        }
    }
    if released {
        session.pointer_up();
    }

    let active = match session.drag_state() {
        DragState::Dragging { index } => {
            ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
            Some(index)
        }
        DragState::Idle => {
            if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
            None
        }
    };

    render::paint(&painter, texture, &view, session.points(), active, style);
}

impl eframe::App for CropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loads(ctx);

        // Handle dropped files
        if !ctx.input(|i| i.raw.dropped_files.is_empty()) {
            self.handle_dropped_files(ctx);
        }

        if self.session.result().is_none() {
            self.result_texture = None;
        }
        self.result_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.toolbar(ui, ctx);

            if self.texture.is_some() {
                self.rectangle_controls(ui);
                self.point_count(ui);
            }
            if let Some(status) = &self.status {
                ui.colored_label(ui.visuals().error_fg_color, status);
            }
            ui.separator();

            self.canvas(ui);
        });
    }
}
