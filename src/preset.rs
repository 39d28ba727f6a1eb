//! Rectangle presets: a rectangle is just a four-vertex polygon, seeded
//! with a chosen aspect ratio and then edited like any other.

use eframe::egui::{self, Pos2, Vec2};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AspectRatioMode {
    #[default]
    Free,
    Original,
    Square,
    // Landscape
    R3_2,
    R4_3,
    R16_9,
    R16_10,
    // Portrait
    R2_3,
    R3_4,
    R9_16,
    R10_16,
    Custom { w: u32, h: u32 },
}

impl AspectRatioMode {
    pub const LANDSCAPE: [AspectRatioMode; 4] = [
        AspectRatioMode::R3_2,
        AspectRatioMode::R4_3,
        AspectRatioMode::R16_9,
        AspectRatioMode::R16_10,
    ];

    pub const PORTRAIT: [AspectRatioMode; 4] = [
        AspectRatioMode::R2_3,
        AspectRatioMode::R3_4,
        AspectRatioMode::R9_16,
        AspectRatioMode::R10_16,
    ];

    /// The same ratio rotated a quarter turn.
    pub fn counterpart(&self) -> Self {
        match *self {
            AspectRatioMode::R3_2 => AspectRatioMode::R2_3,
            AspectRatioMode::R4_3 => AspectRatioMode::R3_4,
            AspectRatioMode::R16_9 => AspectRatioMode::R9_16,
            AspectRatioMode::R16_10 => AspectRatioMode::R10_16,
            AspectRatioMode::R2_3 => AspectRatioMode::R3_2,
            AspectRatioMode::R3_4 => AspectRatioMode::R4_3,
            AspectRatioMode::R9_16 => AspectRatioMode::R16_9,
            AspectRatioMode::R10_16 => AspectRatioMode::R16_10,
            AspectRatioMode::Custom { w, h } => AspectRatioMode::Custom { w: h, h: w },
            other => other,
        }
    }

    /// Width over height, or `None` when unconstrained.
    pub fn ratio(&self, image_size: Vec2) -> Option<f32> {
        match *self {
            AspectRatioMode::Free => None,
            AspectRatioMode::Original => Some(image_size.x / image_size.y),
            AspectRatioMode::Square => Some(1.0),
            AspectRatioMode::R3_2 => Some(3.0 / 2.0),
            AspectRatioMode::R4_3 => Some(4.0 / 3.0),
            AspectRatioMode::R16_9 => Some(16.0 / 9.0),
            AspectRatioMode::R16_10 => Some(16.0 / 10.0),
            AspectRatioMode::R2_3 => Some(2.0 / 3.0),
            AspectRatioMode::R3_4 => Some(3.0 / 4.0),
            AspectRatioMode::R9_16 => Some(9.0 / 16.0),
            AspectRatioMode::R10_16 => Some(10.0 / 16.0),
            AspectRatioMode::Custom { w, h } => Some(w.max(1) as f32 / h.max(1) as f32),
        }
    }
}

impl std::fmt::Display for AspectRatioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AspectRatioMode::Free => write!(f, "Free"),
            AspectRatioMode::Original => write!(f, "Original"),
            AspectRatioMode::Square => write!(f, "1:1"),
            AspectRatioMode::R3_2 => write!(f, "3:2"),
            AspectRatioMode::R4_3 => write!(f, "4:3"),
            AspectRatioMode::R16_9 => write!(f, "16:9"),
            AspectRatioMode::R16_10 => write!(f, "16:10"),
            AspectRatioMode::R2_3 => write!(f, "2:3"),
            AspectRatioMode::R3_4 => write!(f, "3:4"),
            AspectRatioMode::R9_16 => write!(f, "9:16"),
            AspectRatioMode::R10_16 => write!(f, "10:16"),
            AspectRatioMode::Custom { w, h } => write!(f, "Custom {w}:{h}"),
        }
    }
}

/// Corners (clockwise from top-left) of the largest centered rectangle with
/// the mode's ratio that fits the image, shrunk by `coverage`.
pub fn rectangle(image_size: Vec2, mode: AspectRatioMode, coverage: f32) -> [Pos2; 4] {
    let coverage = coverage.clamp(0.0, 1.0);
    let size = match mode.ratio(image_size) {
        Some(ratio) if ratio > 0.0 && image_size.y > 0.0 => {
            // Fit to bounds
            if ratio >= image_size.x / image_size.y {
                egui::vec2(image_size.x, image_size.x / ratio)
            } else {
                egui::vec2(image_size.y * ratio, image_size.y)
            }
        }
        _ => image_size,
    } * coverage;

    let rect = egui::Rect::from_center_size((image_size / 2.0).to_pos2(), size);
    [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ]
}
