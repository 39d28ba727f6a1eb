//! Conversions between display space (egui points) and image-pixel space.
//!
//! The image is usually shown scaled, so every pointer position has to be
//! pushed through the ratio between the on-screen rect and the native raster
//! size. Nothing here caches: the rect can change between frames.

use eframe::egui::{self, Pos2, Rect, Vec2};

/// Maps a pointer position to image-pixel coordinates.
///
/// `scale = native / displayed` is computed independently per axis. A
/// zero-sized display rect yields a zero scale on that axis instead of NaN.
pub fn to_image_space(pointer: Pos2, display_rect: Rect, native_size: Vec2) -> Pos2 {
    let scale = scale_factors(display_rect, native_size);
    egui::pos2(
        (pointer.x - display_rect.left()) * scale.x,
        (pointer.y - display_rect.top()) * scale.y,
    )
}

/// Inverse of [`to_image_space`], used when drawing image-space points.
pub fn to_display_space(point: Pos2, display_rect: Rect, native_size: Vec2) -> Pos2 {
    let scale = display_factors(display_rect, native_size);
    egui::pos2(
        display_rect.left() + point.x * scale.x,
        display_rect.top() + point.y * scale.y,
    )
}

/// Native pixels per display point, per axis.
pub fn scale_factors(display_rect: Rect, native_size: Vec2) -> Vec2 {
    egui::vec2(
        ratio(native_size.x, display_rect.width()),
        ratio(native_size.y, display_rect.height()),
    )
}

fn display_factors(display_rect: Rect, native_size: Vec2) -> Vec2 {
    egui::vec2(
        ratio(display_rect.width(), native_size.x),
        ratio(display_rect.height(), native_size.y),
    )
}

fn ratio(num: f32, den: f32) -> f32 {
    if den > 0.0 { num / den } else { 0.0 }
}

/// Where the image sits on screen for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageView {
    /// On-screen rect the image is drawn into.
    pub rect: Rect,
    /// Native raster size in pixels.
    pub native_size: Vec2,
}

impl ImageView {
    pub fn new(rect: Rect, native_size: Vec2) -> Self {
        Self { rect, native_size }
    }

    /// Letterboxes the image into `available`, keeping its aspect ratio and
    /// leaving `padding` on every side. Returns the padded outer rect (the
    /// interactive area) together with the view.
    pub fn fit(available: Rect, native_size: Vec2, padding: f32) -> (Rect, Self) {
        let pad = egui::vec2(padding * 2.0, padding * 2.0);
        let max_size = (available.size() - pad).max(Vec2::ZERO);

        let scale = if native_size.x > 0.0 && native_size.y > 0.0 {
            (max_size.x / native_size.x).min(max_size.y / native_size.y)
        } else {
            0.0
        };
        let display_size = native_size * scale;
        let total_size = display_size + pad;

        // Manual centering
        let x_offset = (available.width() - total_size.x) / 2.0;
        let y_offset = (available.height() - total_size.y) / 2.0;
        let start = available.min + egui::vec2(x_offset.max(0.0), y_offset.max(0.0));

        let outer = Rect::from_min_size(start, total_size);
        let image_rect =
            Rect::from_min_size(outer.min + egui::vec2(padding, padding), display_size);
        (outer, Self::new(image_rect, native_size))
    }

    pub fn to_image(&self, pointer: Pos2) -> Pos2 {
        to_image_space(pointer, self.rect, self.native_size)
    }

    pub fn to_display(&self, point: Pos2) -> Pos2 {
        to_display_space(point, self.rect, self.native_size)
    }

    /// Converts a display-space distance (such as the hit radius) to image
    /// pixels using the larger axis scale, so a vertex is never harder to
    /// grab than its drawn handle suggests.
    pub fn image_distance(&self, display_distance: f32) -> f32 {
        let scale = scale_factors(self.rect, self.native_size);
        display_distance * scale.x.max(scale.y)
    }
}
