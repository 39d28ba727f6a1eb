//! Polygon image cropping: place vertices on an image, drag them around, and
//! cut the enclosed region out as a new transparent-backed image.

pub mod app;
pub mod clip;
pub mod config;
pub mod drag;
pub mod error;
pub mod loader;
pub mod mapper;
pub mod points;
pub mod preset;
pub mod render;
pub mod session;

pub use app::CropperApp;
pub use clip::{CroppedResult, extract};
pub use config::{CropperConfig, ExportFormat};
pub use drag::{DragController, DragState, PressOutcome};
pub use error::{CropError, Result};
pub use mapper::ImageView;
pub use points::PointSet;
pub use session::CropSession;
