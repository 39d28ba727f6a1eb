// Property tests for point bookkeeping and coordinate mapping.

use eframe::egui::{Rect, pos2, vec2};
use polygon_cropper::PointSet;
use polygon_cropper::mapper::to_image_space;
use proptest::prelude::*;

const RADIUS: f32 = 10.0;

proptest! {
    #[test]
    fn well_separated_adds_are_never_dropped(cells in prop::collection::btree_set((0u32..40, 0u32..40), 0..60)) {
        // Grid cells 20 px apart are always farther than the hit radius.
        let mut set = PointSet::new();
        for (cx, cy) in &cells {
            prop_assert!(set.add(pos2(*cx as f32 * 20.0, *cy as f32 * 20.0), RADIUS).is_some());
        }
        prop_assert_eq!(set.len(), cells.len());
    }

    #[test]
    fn add_within_radius_changes_nothing(
        x in 0.0f32..1000.0,
        y in 0.0f32..1000.0,
        dx in -7.0f32..7.0,
        dy in -7.0f32..7.0,
    ) {
        let mut set = PointSet::from_points([pos2(x, y)]);
        prop_assert_eq!(set.add(pos2(x + dx, y + dy), RADIUS), None);
        prop_assert_eq!(set.len(), 1);
        prop_assert_eq!(set.get(0), Some(pos2(x, y)));
    }

    #[test]
    fn hit_test_finds_exact_vertex(points in prop::collection::vec((0u32..50, 0u32..50), 1..30), pick in any::<prop::sample::Index>()) {
        let mut set = PointSet::new();
        for (cx, cy) in points {
            set.add(pos2(cx as f32 * 25.0, cy as f32 * 25.0), RADIUS);
        }
        let i = pick.index(set.len());
        let p = set.get(i).unwrap();
        prop_assert_eq!(set.hit_test(p, RADIUS), Some(i));
    }

    #[test]
    fn mapping_is_linear_in_scale(
        left in -500.0f32..500.0,
        top in -500.0f32..500.0,
        w in 10.0f32..1000.0,
        h in 10.0f32..1000.0,
        ox in 0.0f32..1.0,
        oy in 0.0f32..1.0,
    ) {
        let rect = Rect::from_min_size(pos2(left, top), vec2(w, h));
        let pointer = pos2(left + ox * w, top + oy * h);
        let native = vec2(300.0, 200.0);
        let single = to_image_space(pointer, rect, native);
        let double = to_image_space(pointer, rect, native * 2.0);
        prop_assert!((double.x - 2.0 * single.x).abs() <= 1e-2 * (1.0 + single.x.abs()));
        prop_assert!((double.y - 2.0 * single.y).abs() <= 1e-2 * (1.0 + single.y.abs()));
    }
}
