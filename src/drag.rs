use eframe::egui::Pos2;

use crate::points::PointSet;

/// Which vertex, if any, is currently grabbed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        index: usize,
    },
}

/// What a primary-button press turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    /// The press landed on a vertex and grabbed it.
    Grabbed(usize),
    /// The press missed every vertex and a new one was appended.
    Added(usize),
    /// Nothing happened (a drag is already active).
    Ignored,
}

/// `Idle -> Dragging(index) -> Idle`, one pointer at a time.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn active_index(&self) -> Option<usize> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { index } => Some(index),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active_index().is_some()
    }

    /// Handles a press at `point` (image space). A vertex under the pointer
    /// is grabbed; otherwise a vertex is added. Never both for one press.
    pub fn pointer_down(&mut self, point: Pos2, radius: f32, points: &mut PointSet) -> PressOutcome {
        if self.is_dragging() {
            return PressOutcome::Ignored;
        }
        if let Some(index) = points.hit_test(point, radius) {
            self.state = DragState::Dragging { index };
            return PressOutcome::Grabbed(index);
        }
        match points.add(point, radius) {
            Some(index) => PressOutcome::Added(index),
            None => PressOutcome::Ignored,
        }
    }

    /// Moves the grabbed vertex. Returns whether anything changed.
    pub fn pointer_move(&mut self, point: Pos2, points: &mut PointSet) -> bool {
        match self.state {
            DragState::Dragging { index } => {
                let moved = points.get(index).is_some_and(|old| old != point);
                if !points.replace_at(index, point) {
                    // Point set was cleared under us.
                    self.state = DragState::Idle;
                    return false;
                }
                moved
            }
            DragState::Idle => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    /// Leaving the canvas mid-drag drops the vertex where it last was.
    pub fn pointer_leave(&mut self) {
        self.state = DragState::Idle;
    }
}
