// Re-export glam for convenience
pub use glam::*;

// Spectra math types
mod aabb;
mod interval;
mod pose;
mod ray;

pub use aabb::Aabb2;
pub use interval::Interval;
pub use pose::Pose;
pub use ray::Ray2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_creation() {
        let v = Vec2::new(1.0, 2.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
    }

    #[test]
    fn test_vec2_perp_dot() {
        // perp_dot is the 2D cross product used by segment intersection
        assert_eq!(Vec2::X.perp_dot(Vec2::Y), 1.0);
        assert_eq!(Vec2::Y.perp_dot(Vec2::X), -1.0);
    }
}
