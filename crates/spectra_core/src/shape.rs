//! Collider geometry and exact intersection tests.

use spectra_math::{Aabb2, Interval, Pose, Vec2};

use crate::error::{SceneError, SceneResult};

/// Collider geometry, either in body-local or world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Filled disc.
    Circle { center: Vec2, radius: f32 },
    /// Simple polygon, counter-clockwise.
    Polygon { vertices: Vec<Vec2> },
}

impl Shape {
    /// Create a circle. The radius must be positive and finite.
    pub fn circle(center: Vec2, radius: f32) -> SceneResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SceneError::InvalidShape(format!(
                "circle radius must be positive, got {radius}"
            )));
        }
        Ok(Shape::Circle { center, radius })
    }

    /// Create a polygon from at least three vertices.
    ///
    /// Clockwise input is reversed so that edge normals computed by
    /// `intersect_segment` always point outward.
    pub fn polygon(mut vertices: Vec<Vec2>) -> SceneResult<Self> {
        if vertices.len() < 3 {
            return Err(SceneError::InvalidShape(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }

        let area = signed_area(&vertices);
        if !area.is_finite() || area == 0.0 {
            return Err(SceneError::InvalidShape(
                "polygon has zero area".to_string(),
            ));
        }
        if area < 0.0 {
            vertices.reverse();
        }

        Ok(Shape::Polygon { vertices })
    }

    /// Axis-aligned rectangle spanning two corners.
    pub fn rect(a: Vec2, b: Vec2) -> SceneResult<Self> {
        let min = a.min(b);
        let max = a.max(b);
        Self::polygon(vec![
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ])
    }

    /// Return this shape mapped through `pose`.
    pub fn transformed(&self, pose: &Pose) -> Shape {
        let affine = pose.to_affine();
        match self {
            Shape::Circle { center, radius } => Shape::Circle {
                center: affine.transform_point2(*center),
                radius: *radius,
            },
            Shape::Polygon { vertices } => Shape::Polygon {
                vertices: vertices.iter().map(|v| affine.transform_point2(*v)).collect(),
            },
        }
    }

    /// Bounding box of the shape.
    pub fn bounds(&self) -> Aabb2 {
        match self {
            Shape::Circle { center, radius } => {
                Aabb2::from_points(*center - Vec2::splat(*radius), *center + Vec2::splat(*radius))
            }
            Shape::Polygon { vertices } => Aabb2::from_point_cloud(vertices.iter().copied()),
        }
    }

    /// Returns true if `p` lies strictly inside the shape.
    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Shape::Circle { center, radius } => p.distance_squared(*center) < radius * radius,
            Shape::Polygon { vertices } => {
                // Crossing-number test
                let mut inside = false;
                let mut j = vertices.len() - 1;
                for i in 0..vertices.len() {
                    let (a, b) = (vertices[i], vertices[j]);
                    if (a.y > p.y) != (b.y > p.y) {
                        let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                        if p.x < x {
                            inside = !inside;
                        }
                    }
                    j = i;
                }
                inside
            }
        }
    }

    /// Nearest boundary crossing of the segment `p0 -> p1`.
    ///
    /// Returns `(fraction, outward_normal)` with `fraction` in [0, 1]. A
    /// segment starting inside the shape reports where it leaves.
    pub fn intersect_segment(&self, p0: Vec2, p1: Vec2) -> Option<(f32, Vec2)> {
        let d = p1 - p0;
        if d.length_squared() == 0.0 {
            return None;
        }

        match self {
            Shape::Circle { center, radius } => {
                let f = p0 - *center;
                let a = d.dot(d);
                let h = f.dot(d);
                let c = f.dot(f) - radius * radius;

                let discriminant = h * h - a * c;
                if discriminant < 0.0 {
                    return None;
                }
                let sqrtd = discriminant.sqrt();

                // Nearest root in range first, then the far one
                let mut t = (-h - sqrtd) / a;
                if !Interval::UNIT.contains(t) {
                    t = (-h + sqrtd) / a;
                    if !Interval::UNIT.contains(t) {
                        return None;
                    }
                }

                let point = p0 + d * t;
                let normal = (point - *center) / *radius;
                Some((t, normal.normalize_or_zero()))
            }
            Shape::Polygon { vertices } => {
                let mut best: Option<(f32, Vec2)> = None;

                for i in 0..vertices.len() {
                    let a = vertices[i];
                    let e = vertices[(i + 1) % vertices.len()] - a;

                    let denom = d.perp_dot(e);
                    if denom == 0.0 {
                        continue;
                    }
                    let ap = a - p0;
                    let t = ap.perp_dot(e) / denom;
                    let u = ap.perp_dot(d) / denom;
                    if !Interval::UNIT.contains(t) || !Interval::UNIT.contains(u) {
                        continue;
                    }

                    if best.map_or(true, |(bt, _)| t < bt) {
                        // CCW winding: outward normal is the edge rotated clockwise
                        let normal = Vec2::new(e.y, -e.x).normalize_or_zero();
                        best = Some((t, normal));
                    }
                }

                best
            }
        }
    }
}

/// Shoelace area, positive for counter-clockwise winding.
fn signed_area(vertices: &[Vec2]) -> f32 {
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_rejects_bad_radius() {
        assert!(Shape::circle(Vec2::ZERO, 0.0).is_err());
        assert!(Shape::circle(Vec2::ZERO, -1.0).is_err());
        assert!(Shape::circle(Vec2::ZERO, f32::NAN).is_err());
    }

    #[test]
    fn test_polygon_validation() {
        assert!(Shape::polygon(vec![Vec2::ZERO, Vec2::X]).is_err());
        // Collinear points have no area
        assert!(Shape::polygon(vec![Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)]).is_err());
    }

    #[test]
    fn test_polygon_clockwise_is_reversed() {
        let cw = vec![Vec2::ZERO, Vec2::Y, Vec2::ONE, Vec2::X];
        let Shape::Polygon { vertices } = Shape::polygon(cw).unwrap() else {
            panic!("expected polygon");
        };
        assert!(signed_area(&vertices) > 0.0);
    }

    #[test]
    fn test_circle_hit_from_outside() {
        let circle = Shape::circle(Vec2::new(500.0, 0.0), 50.0).unwrap();
        let (t, normal) = circle
            .intersect_segment(Vec2::ZERO, Vec2::new(1000.0, 0.0))
            .unwrap();

        assert!((t - 0.45).abs() < 1e-5);
        assert!((normal - Vec2::new(-1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_circle_hit_from_inside() {
        let circle = Shape::circle(Vec2::ZERO, 1.0).unwrap();
        let (t, normal) = circle
            .intersect_segment(Vec2::ZERO, Vec2::new(4.0, 0.0))
            .unwrap();

        assert!((t - 0.25).abs() < 1e-5);
        assert!((normal - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_circle_miss() {
        let circle = Shape::circle(Vec2::new(0.0, 10.0), 1.0).unwrap();
        assert!(circle
            .intersect_segment(Vec2::ZERO, Vec2::new(10.0, 0.0))
            .is_none());

        // Segment that ends before reaching the circle
        let circle = Shape::circle(Vec2::new(10.0, 0.0), 1.0).unwrap();
        assert!(circle
            .intersect_segment(Vec2::ZERO, Vec2::new(5.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_rect_hit_normal_points_outward() {
        let rect = Shape::rect(Vec2::new(100.0, -50.0), Vec2::new(110.0, 50.0)).unwrap();

        let (t, normal) = rect
            .intersect_segment(Vec2::ZERO, Vec2::new(200.0, 0.0))
            .unwrap();
        assert!((t - 0.5).abs() < 1e-6);
        assert_eq!(normal, Vec2::new(-1.0, 0.0));

        // Leaving through the far side reports the +X face
        let (_, normal) = rect
            .intersect_segment(Vec2::new(105.0, 0.0), Vec2::new(200.0, 0.0))
            .unwrap();
        assert_eq!(normal, Vec2::X);
    }

    #[test]
    fn test_contains() {
        let circle = Shape::circle(Vec2::ZERO, 1.0).unwrap();
        assert!(circle.contains(Vec2::new(0.5, 0.5)));
        assert!(!circle.contains(Vec2::new(1.0, 1.0)));

        let triangle =
            Shape::polygon(vec![Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)]).unwrap();
        assert!(triangle.contains(Vec2::new(1.0, 1.0)));
        assert!(!triangle.contains(Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn test_transformed_bounds() {
        let rect = Shape::rect(Vec2::ZERO, Vec2::new(2.0, 1.0)).unwrap();
        let moved = rect.transformed(&Pose::new(Vec2::new(10.0, 0.0), 0.0));
        let bounds = moved.bounds();

        assert_eq!(bounds.x, Interval::new(10.0, 12.0));
        assert_eq!(bounds.y, Interval::new(0.0, 1.0));
    }

    #[test]
    fn test_zero_length_segment() {
        let circle = Shape::circle(Vec2::ZERO, 1.0).unwrap();
        assert!(circle.intersect_segment(Vec2::X, Vec2::X).is_none());
    }
}
