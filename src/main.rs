#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;
use polygon_cropper::{CropperApp, CropperConfig};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = CropperConfig::default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "Polygon Cropper",
        options,
        Box::new(|cc| Ok(Box::new(CropperApp::new(cc, config)))),
    )
}
