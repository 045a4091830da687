// Rigid 2D transforms for bodies and emitters.
//
// glam::Affine2 already provides transform_point2() and inverse(); Pose keeps
// the (position, angle) pair that physics bodies report and converts on demand.

use glam::{Affine2, Vec2};

/// Position and orientation of something in the scene plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Translation in world units
    pub position: Vec2,

    /// Rotation in radians, counter-clockwise from +X
    pub angle: f32,
}

impl Pose {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Unit vector pointing along `angle`.
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    /// Map a body-local point into world space.
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.position + self.direction().rotate(local)
    }

    /// Map a world point into this pose's local frame.
    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        let inv = Vec2::new(self.angle.cos(), -self.angle.sin());
        inv.rotate(world - self.position)
    }

    /// Convert to an affine matrix (rotate, then translate).
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_angle_translation(self.angle, self.position)
    }
}
