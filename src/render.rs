//! Draws the image and the polygon being edited.
//!
//! Everything is rebuilt from scratch every frame: vertex counts are small,
//! and a pure shape builder keeps the output a function of its inputs.

use eframe::egui::{self, Color32, Mesh, Painter, Pos2, Shape, Stroke, TextureHandle};

use crate::config::CropperConfig;
use crate::mapper::ImageView;
use crate::points::PointSet;

#[derive(Clone, Debug, PartialEq)]
pub struct PolygonStyle {
    pub stroke: Stroke,
    pub fill: Color32,
    pub handle_radius: f32,
    pub handle_fill: Color32,
    pub handle_outline: Stroke,
}

impl From<&CropperConfig> for PolygonStyle {
    fn from(config: &CropperConfig) -> Self {
        Self {
            stroke: Stroke::new(config.stroke_width, config.stroke_color),
            fill: config.fill_color,
            handle_radius: config.handle_radius,
            handle_fill: config.handle_color,
            handle_outline: Stroke::new(config.handle_outline_width, config.handle_outline_color),
        }
    }
}

/// Paints the base image, then the polygon on top of it.
pub fn paint(
    painter: &Painter,
    texture: &TextureHandle,
    view: &ImageView,
    points: &PointSet,
    active: Option<usize>,
    style: &PolygonStyle,
) {
    painter.image(
        texture.id(),
        view.rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        Color32::WHITE,
    );
    painter.extend(polygon_shapes(view, points, active, style));
}

/// Fill underneath, edges over it, vertex handles on top. `active` marks
/// the vertex being dragged, which gets a slightly larger handle.
pub fn polygon_shapes(
    view: &ImageView,
    points: &PointSet,
    active: Option<usize>,
    style: &PolygonStyle,
) -> Vec<Shape> {
    let screen: Vec<Pos2> = points.iter().map(|p| view.to_display(p)).collect();
    let mut shapes = Vec::with_capacity(screen.len() * 2 + 2);

    if screen.len() > 2 {
        shapes.push(fill_shape(&screen, style.fill));
        shapes.push(Shape::closed_line(screen.clone(), style.stroke));
    } else if screen.len() == 2 {
        shapes.push(Shape::line(screen.clone(), style.stroke));
    }

    for (i, center) in screen.iter().enumerate() {
        let radius = if active == Some(i) {
            style.handle_radius * 1.5
        } else {
            style.handle_radius
        };
        shapes.push(Shape::circle_filled(*center, radius, style.handle_fill));
        shapes.push(Shape::circle_stroke(*center, radius, style.handle_outline));
    }
    shapes
}

/// Triangulates the outline so concave polygons fill correctly.
fn fill_shape(outline: &[Pos2], color: Color32) -> Shape {
    let coords: Vec<f64> = outline
        .iter()
        .flat_map(|p| [p.x as f64, p.y as f64])
        .collect();

    match earcutr::earcut(&coords, &[], 2) {
        Ok(indices) if !indices.is_empty() => {
            let mut mesh = Mesh::default();
            for p in outline {
                mesh.colored_vertex(*p, color);
            }
            for tri in indices.chunks_exact(3) {
                mesh.add_triangle(tri[0] as u32, tri[1] as u32, tri[2] as u32);
            }
            Shape::mesh(mesh)
        }
        _ => {
            log::debug!("triangulation failed for {} vertices", outline.len());
            Shape::convex_polygon(outline.to_vec(), color, Stroke::NONE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2, Rect};

    fn view() -> ImageView {
        // 200x200 image drawn at half size.
        ImageView::new(
            Rect::from_min_size(pos2(10.0, 10.0), vec2(100.0, 100.0)),
            vec2(200.0, 200.0),
        )
    }

    fn style() -> PolygonStyle {
        PolygonStyle::from(&CropperConfig::default())
    }

    #[test]
    fn empty_point_set_draws_nothing() {
        assert!(polygon_shapes(&view(), &PointSet::new(), None, &style()).is_empty());
    }

    #[test]
    fn single_point_is_only_a_handle() {
        let points = PointSet::from_points([pos2(100.0, 100.0)]);
        let shapes = polygon_shapes(&view(), &points, None, &style());
        assert_eq!(shapes.len(), 2);
        match &shapes[0] {
            Shape::Circle(circle) => assert_eq!(circle.center, pos2(60.0, 60.0)),
            other => panic!("expected a handle, got {other:?}"),
        }
    }

    #[test]
    fn two_points_are_an_open_line_without_fill() {
        let points = PointSet::from_points([pos2(0.0, 0.0), pos2(200.0, 0.0)]);
        let shapes = polygon_shapes(&view(), &points, None, &style());
        assert_eq!(shapes.len(), 1 + 2 * 2);
        assert!(matches!(&shapes[0], Shape::Path(path) if !path.closed));
        assert!(!shapes.iter().any(|s| matches!(s, Shape::Mesh(_))));
    }

    #[test]
    fn three_points_fill_under_closed_outline() {
        let points = PointSet::from_points([pos2(0.0, 0.0), pos2(200.0, 0.0), pos2(0.0, 200.0)]);
        let shapes = polygon_shapes(&view(), &points, None, &style());
        assert_eq!(shapes.len(), 2 + 3 * 2);
        match &shapes[0] {
            Shape::Mesh(mesh) => assert_eq!(mesh.indices.len(), 3),
            other => panic!("expected fill mesh first, got {other:?}"),
        }
        assert!(matches!(&shapes[1], Shape::Path(path) if path.closed));
    }

    #[test]
    fn concave_polygon_is_triangulated() {
        let points = PointSet::from_points([
            pos2(0.0, 0.0),
            pos2(60.0, 0.0),
            pos2(60.0, 120.0),
            pos2(140.0, 120.0),
            pos2(140.0, 0.0),
            pos2(200.0, 0.0),
            pos2(200.0, 200.0),
            pos2(0.0, 200.0),
        ]);
        let shapes = polygon_shapes(&view(), &points, None, &style());
        match &shapes[0] {
            Shape::Mesh(mesh) => assert_eq!(mesh.indices.len(), (8 - 2) * 3),
            other => panic!("expected fill mesh, got {other:?}"),
        }
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let points = PointSet::from_points([pos2(5.0, 5.0), pos2(150.0, 30.0), pos2(80.0, 190.0)]);
        let a = polygon_shapes(&view(), &points, Some(1), &style());
        let b = polygon_shapes(&view(), &points, Some(1), &style());
        assert_eq!(a, b);
    }

    #[test]
    fn active_handle_is_enlarged() {
        let points = PointSet::from_points([pos2(5.0, 5.0), pos2(150.0, 30.0)]);
        let shapes = polygon_shapes(&view(), &points, Some(1), &style());
        let radii: Vec<f32> = shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Circle(c) if c.fill != Color32::TRANSPARENT => Some(c.radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![6.0, 9.0]);
    }
}
