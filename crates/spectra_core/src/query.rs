//! The query surface the optics engine needs from a physics world.

use std::collections::HashSet;
use std::fmt;

use spectra_math::{Pose, Vec2};

/// Stable opaque id of a collider shape.
///
/// Handles are never reused inside one world, so equality is stable for
/// at least the duration of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeHandle(pub u64);

/// Stable opaque id of a rigid body.
///
/// Holding a `BodyHandle` does not keep the body alive; once the body is
/// removed every lookup through the handle returns `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

impl fmt::Display for ShapeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Nearest boundary crossing along a query segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Point of intersection
    pub point: Vec2,
    /// Unit outward surface normal at the intersection
    pub normal: Vec2,
    /// Shape that was hit
    pub shape: ShapeHandle,
    /// Position along the query segment, in [0, 1]
    pub fraction: f32,
}

/// Geometric queries answered by the scene for the trace engine.
///
/// Implementations must be read-only during a trace pass. Parallel frame
/// updates additionally require `Sync`.
pub trait SceneQuery {
    /// Nearest intersection along the segment `p0 -> p1`, if any.
    fn segment_query(&self, p0: Vec2, p1: Vec2) -> Option<Hit>;

    /// Every shape that contains `p`.
    fn point_query(&self, p: Vec2) -> HashSet<ShapeHandle>;

    /// Fraction of incident energy transmitted through `shape`'s boundary.
    ///
    /// `None` means the shape carries no override and the scene-wide
    /// default applies.
    fn transparency(&self, shape: ShapeHandle) -> Option<f32>;

    /// Current pose of a body, or `None` once the body has been removed.
    fn body_pose(&self, body: BodyHandle) -> Option<Pose>;
}

impl<T: SceneQuery + ?Sized> SceneQuery for &T {
    fn segment_query(&self, p0: Vec2, p1: Vec2) -> Option<Hit> {
        (**self).segment_query(p0, p1)
    }

    fn point_query(&self, p: Vec2) -> HashSet<ShapeHandle> {
        (**self).point_query(p)
    }

    fn transparency(&self, shape: ShapeHandle) -> Option<f32> {
        (**self).transparency(shape)
    }

    fn body_pose(&self, body: BodyHandle) -> Option<Pose> {
        (**self).body_pose(body)
    }
}
