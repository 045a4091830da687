use crate::Vec2;

/// A ray in the 2D scene plane.
///
/// Rays start at `origin` and travel along `direction`. Light paths keep
/// the direction normalized so that `at(t)` measures distance in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray2 {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl Ray2 {
    /// Create a new ray.
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }
}
