use crate::{Interval, Vec2};

/// Axis-aligned bounding box in the scene plane.
///
/// Used as a broad-phase rejection before exact shape intersection tests.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb2 {
    pub x: Interval,
    pub y: Interval,
}

impl Aabb2 {
    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
        }
    }

    /// Create the tightest AABB around a set of points.
    ///
    /// Returns `Aabb2::EMPTY` for an empty iterator.
    pub fn from_point_cloud(points: impl IntoIterator<Item = Vec2>) -> Self {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);

        for p in points {
            min = min.min(p);
            max = max.max(p);
        }

        if min.x.is_infinite() {
            Self::EMPTY
        } else {
            Self::from_points(min, max)
        }
    }

    /// Returns true if the point lies inside or on the box.
    pub fn contains(&self, p: Vec2) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y)
    }

    /// Test if the segment `p0 -> p1` touches this box.
    ///
    /// Uses the slab method over the segment parameter range `[0, 1]`.
    pub fn hit_segment(&self, p0: Vec2, p1: Vec2) -> bool {
        let d = p1 - p0;
        let mut t = Interval::UNIT;

        for (slab, origin, dir) in [(self.x, p0.x, d.x), (self.y, p0.y, d.y)] {
            if dir == 0.0 {
                // Parallel to the slab: inside or never
                if !slab.contains(origin) {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (slab.min - origin) * inv;
            let mut t1 = (slab.max - origin) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t.min = t0.max(t.min);
            t.max = t1.min(t.max);
            if t.max < t.min {
                return false;
            }
        }

        true
    }

    pub const EMPTY: Aabb2 = Aabb2 {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb2::from_points(Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0));

        assert_eq!(aabb.x.min, 0.0);
        assert_eq!(aabb.x.max, 10.0);
        assert_eq!(aabb.y.min, 0.0);
        assert_eq!(aabb.y.max, 10.0);
    }

    #[test]
    fn test_aabb_from_point_cloud() {
        let aabb = Aabb2::from_point_cloud([
            Vec2::new(1.0, -2.0),
            Vec2::new(-3.0, 4.0),
            Vec2::new(0.5, 0.5),
        ]);
        assert_eq!(aabb.x, Interval::new(-3.0, 1.0));
        assert_eq!(aabb.y, Interval::new(-2.0, 4.0));

        assert_eq!(Aabb2::from_point_cloud(std::iter::empty()), Aabb2::EMPTY);
    }

    #[test]
    fn test_aabb_hit_segment() {
        let aabb = Aabb2::from_points(Vec2::splat(-1.0), Vec2::splat(1.0));

        // Segment through the center
        assert!(aabb.hit_segment(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0)));

        // Segment that stops short
        assert!(!aabb.hit_segment(Vec2::new(-5.0, 0.0), Vec2::new(-2.0, 0.0)));

        // Segment pointing away
        assert!(!aabb.hit_segment(Vec2::new(-5.0, 0.0), Vec2::new(-10.0, 0.0)));

        // Axis-parallel segment outside the slab
        assert!(!aabb.hit_segment(Vec2::new(-5.0, 3.0), Vec2::new(5.0, 3.0)));

        // Segment starting inside
        assert!(aabb.hit_segment(Vec2::ZERO, Vec2::new(0.1, 0.1)));
    }

    #[test]
    fn test_aabb_contains() {
        let aabb = Aabb2::from_points(Vec2::ZERO, Vec2::ONE);

        assert!(aabb.contains(Vec2::new(0.4, 1.0)));
        assert!(!aabb.contains(Vec2::new(-0.1, 0.5)));
        assert!(!Aabb2::EMPTY.contains(Vec2::ZERO));
    }
}
