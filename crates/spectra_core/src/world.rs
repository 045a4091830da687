//! Reference 2D world of bodies and colliders.
//!
//! `World` is a minimal stand-in for a rigid-body engine: it owns body poses
//! and collider geometry and answers the `SceneQuery` calls the optics
//! engine issues. It does not simulate dynamics; callers move bodies with
//! `set_body_pose` between frames.

use std::collections::{HashMap, HashSet};

use spectra_math::{Aabb2, Pose, Vec2};

use crate::error::{SceneError, SceneResult};
use crate::query::{BodyHandle, Hit, SceneQuery, ShapeHandle};
use crate::shape::Shape;

/// A shape attached to a body (or to the static world frame).
#[derive(Clone, Debug)]
struct Collider {
    handle: ShapeHandle,

    /// Owning body, `None` for static geometry
    body: Option<BodyHandle>,

    /// Geometry in body-local coordinates
    local: Shape,

    /// Cached world-space geometry, refreshed when the body moves
    world: Shape,

    /// Cached world-space bounds
    bounds: Aabb2,

    /// Per-shape transmission override
    transparency: Option<f32>,
}

impl Collider {
    fn refresh(&mut self, pose: &Pose) {
        self.world = self.local.transformed(pose);
        self.bounds = self.world.bounds();
    }
}

/// A set of posed bodies with attached colliders.
#[derive(Clone, Debug, Default)]
pub struct World {
    bodies: HashMap<BodyHandle, Pose>,

    /// Colliders in insertion order, which keeps query results deterministic
    colliders: Vec<Collider>,

    next_id: u64,
}

impl World {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a body at `pose` and return its handle.
    pub fn add_body(&mut self, pose: Pose) -> BodyHandle {
        let handle = BodyHandle(self.issue_id());
        self.bodies.insert(handle, pose);
        handle
    }

    /// Move a body; its colliders follow.
    pub fn set_body_pose(&mut self, body: BodyHandle, pose: Pose) -> SceneResult<()> {
        let slot = self
            .bodies
            .get_mut(&body)
            .ok_or(SceneError::UnknownBody(body))?;
        *slot = pose;

        for collider in self.colliders.iter_mut().filter(|c| c.body == Some(body)) {
            collider.refresh(&pose);
        }
        Ok(())
    }

    /// Remove a body together with all of its colliders.
    ///
    /// Outstanding handles to the body stop resolving.
    pub fn remove_body(&mut self, body: BodyHandle) -> SceneResult<()> {
        self.bodies
            .remove(&body)
            .ok_or(SceneError::UnknownBody(body))?;

        let before = self.colliders.len();
        self.colliders.retain(|c| c.body != Some(body));
        log::debug!(
            "Removed {} and {} collider(s)",
            body,
            before - self.colliders.len()
        );
        Ok(())
    }

    /// Attach `shape` (body-local coordinates) to `body`.
    pub fn add_collider(&mut self, body: BodyHandle, shape: Shape) -> SceneResult<ShapeHandle> {
        let pose = *self.bodies.get(&body).ok_or(SceneError::UnknownBody(body))?;
        Ok(self.insert_collider(Some(body), shape, pose))
    }

    /// Add world-space geometry that never moves.
    pub fn add_static_collider(&mut self, shape: Shape) -> ShapeHandle {
        self.insert_collider(None, shape, Pose::default())
    }

    fn insert_collider(
        &mut self,
        body: Option<BodyHandle>,
        shape: Shape,
        pose: Pose,
    ) -> ShapeHandle {
        let handle = ShapeHandle(self.issue_id());
        let world = shape.transformed(&pose);
        let bounds = world.bounds();
        self.colliders.push(Collider {
            handle,
            body,
            local: shape,
            world,
            bounds,
            transparency: None,
        });
        handle
    }

    /// Override the transmitted fraction for one collider.
    ///
    /// Pass `None` to fall back to the scene-wide default.
    pub fn set_transparency(
        &mut self,
        shape: ShapeHandle,
        transparency: Option<f32>,
    ) -> SceneResult<()> {
        if let Some(t) = transparency {
            if !(0.0..=1.0).contains(&t) {
                return Err(SceneError::InvalidTransparency(t));
            }
        }

        let collider = self
            .colliders
            .iter_mut()
            .find(|c| c.handle == shape)
            .ok_or(SceneError::UnknownShape(shape))?;
        collider.transparency = transparency;
        Ok(())
    }

    /// Remove a single collider.
    pub fn remove_collider(&mut self, shape: ShapeHandle) -> SceneResult<()> {
        let index = self
            .colliders
            .iter()
            .position(|c| c.handle == shape)
            .ok_or(SceneError::UnknownShape(shape))?;
        self.colliders.remove(index);
        Ok(())
    }

    /// World-space geometry of a collider.
    pub fn collider_shape(&self, shape: ShapeHandle) -> Option<&Shape> {
        self.colliders
            .iter()
            .find(|c| c.handle == shape)
            .map(|c| &c.world)
    }

    /// Get body count.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get collider count.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl SceneQuery for World {
    fn segment_query(&self, p0: Vec2, p1: Vec2) -> Option<Hit> {
        let mut nearest: Option<Hit> = None;

        for collider in &self.colliders {
            if !collider.bounds.hit_segment(p0, p1) {
                continue;
            }
            let Some((fraction, normal)) = collider.world.intersect_segment(p0, p1) else {
                continue;
            };

            // Ties keep the earliest collider
            if nearest.map_or(true, |hit| fraction < hit.fraction) {
                nearest = Some(Hit {
                    point: p0.lerp(p1, fraction),
                    normal,
                    shape: collider.handle,
                    fraction,
                });
            }
        }

        nearest
    }

    fn point_query(&self, p: Vec2) -> HashSet<ShapeHandle> {
        self.colliders
            .iter()
            .filter(|c| c.bounds.contains(p) && c.world.contains(p))
            .map(|c| c.handle)
            .collect()
    }

    fn transparency(&self, shape: ShapeHandle) -> Option<f32> {
        self.colliders
            .iter()
            .find(|c| c.handle == shape)
            .and_then(|c| c.transparency)
    }

    fn body_pose(&self, body: BodyHandle) -> Option<Pose> {
        self.bodies.get(&body).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lens_world() -> (World, ShapeHandle) {
        let mut world = World::new();
        let lens = world.add_static_collider(Shape::circle(Vec2::new(500.0, 0.0), 50.0).unwrap());
        (world, lens)
    }

    #[test]
    fn test_world_creation() {
        let mut world = World::new();
        let body = world.add_body(Pose::default());
        world
            .add_collider(body, Shape::circle(Vec2::ZERO, 1.0).unwrap())
            .unwrap();
        world.add_static_collider(Shape::rect(Vec2::ZERO, Vec2::ONE).unwrap());

        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 2);
    }

    #[test]
    fn test_segment_query_hits_lens() {
        let (world, lens) = lens_world();
        let hit = world
            .segment_query(Vec2::ZERO, Vec2::new(1000.0, 0.0))
            .unwrap();

        assert_eq!(hit.shape, lens);
        assert!((hit.point - Vec2::new(450.0, 0.0)).length() < 1e-2);
        assert!((hit.fraction - 0.45).abs() < 1e-5);
    }

    #[test]
    fn test_segment_query_picks_nearest() {
        let (mut world, _) = lens_world();
        let near = world.add_static_collider(Shape::circle(Vec2::new(200.0, 0.0), 10.0).unwrap());

        let hit = world
            .segment_query(Vec2::ZERO, Vec2::new(1000.0, 0.0))
            .unwrap();
        assert_eq!(hit.shape, near);
    }

    #[test]
    fn test_point_query() {
        let (mut world, lens) = lens_world();
        let overlap =
            world.add_static_collider(Shape::circle(Vec2::new(520.0, 0.0), 50.0).unwrap());

        assert!(world.point_query(Vec2::ZERO).is_empty());
        assert_eq!(world.point_query(Vec2::new(460.0, 0.0)), HashSet::from([lens]));
        assert_eq!(
            world.point_query(Vec2::new(510.0, 0.0)),
            HashSet::from([lens, overlap])
        );
    }

    #[test]
    fn test_body_moves_colliders() {
        let mut world = World::new();
        let body = world.add_body(Pose::new(Vec2::new(100.0, 0.0), 0.0));
        let shape = world
            .add_collider(body, Shape::circle(Vec2::ZERO, 5.0).unwrap())
            .unwrap();

        assert_eq!(
            world.point_query(Vec2::new(100.0, 0.0)),
            HashSet::from([shape])
        );

        world
            .set_body_pose(body, Pose::new(Vec2::new(0.0, 100.0), 0.0))
            .unwrap();
        assert!(world.point_query(Vec2::new(100.0, 0.0)).is_empty());
        assert_eq!(
            world.point_query(Vec2::new(0.0, 100.0)),
            HashSet::from([shape])
        );
    }

    #[test]
    fn test_removed_body_stops_resolving() {
        let mut world = World::new();
        let body = world.add_body(Pose::default());
        world
            .add_collider(body, Shape::circle(Vec2::ZERO, 1.0).unwrap())
            .unwrap();

        assert!(world.body_pose(body).is_some());
        world.remove_body(body).unwrap();

        assert!(world.body_pose(body).is_none());
        assert_eq!(world.collider_count(), 0);
        assert_eq!(world.remove_body(body), Err(SceneError::UnknownBody(body)));

        // Handles are never reused
        let next = world.add_body(Pose::default());
        assert_ne!(next, body);
    }

    #[test]
    fn test_transparency_override() {
        let (mut world, lens) = lens_world();
        assert_eq!(world.transparency(lens), None);

        world.set_transparency(lens, Some(0.25)).unwrap();
        assert_eq!(world.transparency(lens), Some(0.25));

        assert_eq!(
            world.set_transparency(lens, Some(1.5)),
            Err(SceneError::InvalidTransparency(1.5))
        );
        assert_eq!(
            world.set_transparency(ShapeHandle(999), None),
            Err(SceneError::UnknownShape(ShapeHandle(999)))
        );
    }

    #[test]
    fn test_remove_collider() {
        let (mut world, lens) = lens_world();
        world.remove_collider(lens).unwrap();

        assert!(world
            .segment_query(Vec2::ZERO, Vec2::new(1000.0, 0.0))
            .is_none());
        assert!(world.collider_shape(lens).is_none());
    }
}
