//! Owns everything that changes while the user works on one image.
//!
//! Every mutating method runs to completion on the UI thread and reports
//! whether the canvas needs to be redrawn.

use eframe::egui::{self, Pos2, Vec2};
use image::DynamicImage;

use crate::clip::{self, CroppedResult, MIN_POLYGON_VERTICES};
use crate::config::CropperConfig;
use crate::drag::{DragController, DragState, PressOutcome};
use crate::error::{CropError, Result};
use crate::loader::LoadTicket;
use crate::mapper::ImageView;
use crate::points::PointSet;
use crate::preset::{self, AspectRatioMode};

#[derive(Debug, Default)]
pub struct CropSession {
    config: CropperConfig,
    image: Option<DynamicImage>,
    points: PointSet,
    drag: DragController,
    result: Option<CroppedResult>,
    last_ticket: u64,
    pending: Option<LoadTicket>,
}

impl CropSession {
    pub fn new(config: CropperConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn native_size(&self) -> Option<Vec2> {
        self.image
            .as_ref()
            .map(|img| egui::vec2(img.width() as f32, img.height() as f32))
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn result(&self) -> Option<&CroppedResult> {
        self.result.as_ref()
    }

    // Loading

    /// Starts a load and supersedes any load still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.last_ticket += 1;
        let ticket = LoadTicket(self.last_ticket);
        if let Some(old) = self.pending.replace(ticket) {
            log::debug!("load {:?} superseded by {:?}", old, ticket);
        }
        ticket
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Installs a decoded image if `ticket` is still the current load.
    ///
    /// Returns `Ok(false)` for a stale completion. A decode failure clears
    /// the pending load and leaves the existing image and points untouched.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<DynamicImage>) -> Result<bool> {
        if self.pending != Some(ticket) {
            log::debug!("dropping stale load {:?}", ticket);
            return Ok(false);
        }
        self.pending = None;
        self.install(result?);
        Ok(true)
    }

    /// Installs an image right away, cancelling any pending load.
    pub fn load_image(&mut self, image: DynamicImage) {
        self.pending = None;
        self.install(image);
    }

    fn install(&mut self, image: DynamicImage) {
        log::info!("loaded {}x{} image", image.width(), image.height());
        self.image = Some(image);
        self.points.clear();
        self.drag = DragController::default();
        self.result = None;
    }

    // Editing

    /// Primary-button press at `pointer` (display space).
    pub fn pointer_down(&mut self, pointer: Pos2, view: &ImageView) -> PressOutcome {
        let radius = view.image_distance(self.config.hit_radius);
        self.press(view.to_image(pointer), radius)
    }

    /// Press at an image-space position with an image-space hit radius.
    pub fn press(&mut self, point: Pos2, radius: f32) -> PressOutcome {
        if self.image.is_none() {
            return PressOutcome::Ignored;
        }
        let outcome = self.drag.pointer_down(point, radius, &mut self.points);
        if let PressOutcome::Added(index) = outcome {
            log::debug!("added vertex {} at ({:.1}, {:.1})", index, point.x, point.y);
        }
        outcome
    }

    /// Pointer motion in display space; moves the grabbed vertex, if any.
    pub fn pointer_move(&mut self, pointer: Pos2, view: &ImageView) -> bool {
        self.drag_to(view.to_image(pointer))
    }

    pub fn drag_to(&mut self, point: Pos2) -> bool {
        self.drag.pointer_move(point, &mut self.points)
    }

    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        if self.drag.is_dragging() {
            log::debug!("pointer left canvas, ending drag");
        }
        self.drag.pointer_leave();
    }

    /// Replaces the points with a centered rectangle of the given ratio.
    pub fn seed_rectangle(&mut self, mode: AspectRatioMode) -> bool {
        let Some(size) = self.native_size() else {
            return false;
        };
        let corners = preset::rectangle(size, mode, self.config.preset_coverage);
        self.points = PointSet::from_points(corners);
        self.drag = DragController::default();
        true
    }

    pub fn reset_points(&mut self) {
        self.points.clear();
        self.drag = DragController::default();
        self.result = None;
    }

    pub fn clear_all(&mut self) {
        self.image = None;
        self.pending = None;
        self.reset_points();
    }

    // Cropping

    pub fn can_crop(&self) -> bool {
        self.image.is_some() && self.points_needed() == 0
    }

    /// How many more vertices the polygon needs before it can be cropped.
    pub fn points_needed(&self) -> usize {
        MIN_POLYGON_VERTICES.saturating_sub(self.points.len())
    }

    /// Extracts the polygon and keeps the result, replacing any previous one.
    ///
    /// A polygon with no area is a silent no-op: `Ok(None)`, previous result
    /// dropped.
    pub fn crop(&mut self) -> Result<Option<&CroppedResult>> {
        let image = self.image.as_ref().ok_or(CropError::NoImage)?;
        match clip::extract(image, self.points.as_slice()) {
            Ok(result) => {
                log::info!(
                    "cropped {}x{} region from {} vertices",
                    result.width(),
                    result.height(),
                    self.points.len()
                );
                self.result = Some(result);
                Ok(self.result.as_ref())
            }
            Err(CropError::DegeneratePolygon) => {
                log::debug!("polygon has no area, nothing to crop");
                self.result = None;
                Ok(None)
            }
            Err(err) => {
                log::warn!("crop rejected: {}", err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;
    use image::RgbaImage;

    fn blank(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::new(w, h))
    }

    #[test]
    fn presses_without_image_are_ignored() {
        let mut session = CropSession::default();
        assert_eq!(session.press(pos2(1.0, 1.0), 10.0), PressOutcome::Ignored);
        assert!(session.points().is_empty());
    }

    #[test]
    fn latest_ticket_wins() {
        let mut session = CropSession::default();
        let first = session.begin_load();
        let second = session.begin_load();
        assert!(!session.finish_load(first, Ok(blank(4, 4))).unwrap());
        assert!(session.image().is_none());
        assert!(session.finish_load(second, Ok(blank(8, 6))).unwrap());
        assert_eq!(session.native_size(), Some(egui::vec2(8.0, 6.0)));
        assert!(!session.is_loading());
    }

    #[test]
    fn failed_load_keeps_existing_state() {
        let mut session = CropSession::default();
        session.load_image(blank(50, 50));
        session.press(pos2(10.0, 10.0), 10.0);
        let ticket = session.begin_load();
        let err = session
            .finish_load(ticket, Err(CropError::NoImage))
            .unwrap_err();
        assert!(matches!(err, CropError::NoImage));
        assert_eq!(session.points().len(), 1);
        assert_eq!(session.native_size(), Some(egui::vec2(50.0, 50.0)));
        assert!(!session.is_loading());
    }

    #[test]
    fn synchronous_load_cancels_pending() {
        let mut session = CropSession::default();
        let ticket = session.begin_load();
        session.load_image(blank(10, 10));
        assert!(!session.finish_load(ticket, Ok(blank(99, 99))).unwrap());
        assert_eq!(session.native_size(), Some(egui::vec2(10.0, 10.0)));
    }

    #[test]
    fn points_needed_tracks_crop_availability() {
        let mut session = CropSession::default();
        session.load_image(blank(100, 100));
        assert_eq!(session.points_needed(), MIN_POLYGON_VERTICES);
        for (i, p) in [pos2(10.0, 10.0), pos2(90.0, 10.0), pos2(50.0, 90.0)]
            .into_iter()
            .enumerate()
        {
            assert!(!session.can_crop());
            session.press(p, 10.0);
            assert_eq!(session.points_needed(), MIN_POLYGON_VERTICES - i - 1);
        }
        assert!(session.can_crop());
        session.press(pos2(20.0, 60.0), 10.0);
        assert_eq!(session.points_needed(), 0);
    }

    #[test]
    fn crop_without_image_fails() {
        let mut session = CropSession::default();
        assert!(matches!(session.crop(), Err(CropError::NoImage)));
    }

    #[test]
    fn seeded_rectangle_is_croppable() {
        let mut session = CropSession::default();
        assert!(!session.seed_rectangle(AspectRatioMode::Square));
        session.load_image(blank(100, 50));
        assert!(session.seed_rectangle(AspectRatioMode::Square));
        assert_eq!(session.points().len(), 4);
        let result = session.crop().unwrap().unwrap();
        assert_eq!((result.width(), result.height()), (40, 40));
    }
}
