use eframe::egui::{Pos2, Rect};

/// Ordered polygon vertices in image-pixel space.
///
/// Insertion order is edge order: `points[i]` connects to `points[i + 1]`
/// and the last point connects back to the first once the polygon is closed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Pos2>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = Pos2>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Appends `point` unless an existing vertex lies within `radius`, in
    /// which case nothing changes. Returns the index of the new vertex.
    pub fn add(&mut self, point: Pos2, radius: f32) -> Option<usize> {
        if self.hit_test(point, radius).is_some() {
            return None;
        }
        self.points.push(point);
        Some(self.points.len() - 1)
    }

    /// First vertex strictly closer than `radius` to `point`.
    pub fn hit_test(&self, point: Pos2, radius: f32) -> Option<usize> {
        self.points.iter().position(|p| p.distance(point) < radius)
    }

    /// Overwrites one vertex. Out-of-range indices are ignored.
    pub fn replace_at(&mut self, index: usize, point: Pos2) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Pos2> {
        self.points.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Pos2] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.points.iter().copied()
    }

    /// Smallest axis-aligned rect containing every vertex.
    pub fn bounding_box(&self) -> Option<Rect> {
        bounding_box(&self.points)
    }
}

pub(crate) fn bounding_box(points: &[Pos2]) -> Option<Rect> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold(Rect::from_min_max(first, first), |rect, p| rect.union(Rect::from_min_max(*p, *p))),
    )
}
