//! Laser emitters placed in the scene.

use spectra_core::{BodyHandle, SceneError, SceneQuery};
use spectra_math::{Pose, Vec2};

use crate::error::{OpticsError, Result};
use crate::segment::TracedRay;
use crate::spectrum::Spectrum;

/// Weak link from an emitter to a movable body.
///
/// The emitter follows the body while it exists. Removing the body does not
/// invalidate the emitter; it just stops moving.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub body: BodyHandle,
    /// Emitter position in the body's local frame
    pub local_offset: Vec2,
    /// Emitter angle relative to the body's angle
    pub angle_offset: f32,
}

/// A point source shooting a spectral beam along `angle`.
///
/// Owned by the caller (editor/tool), not by the trace engine. The latest
/// trace result is stored on the emitter for the renderer to pick up.
#[derive(Debug, Clone)]
pub struct LaserEmitter {
    /// World position
    pub position: Vec2,

    /// Beam direction in radians, CCW from +X
    pub angle: f32,

    max_length: f32,
    spectrum: Spectrum,
    attachment: Option<Attachment>,
    traced: TracedRay,
}

fn check_max_length(max_length: f32) -> Result<f32> {
    if max_length.is_finite() && max_length > 0.0 {
        Ok(max_length)
    } else {
        Err(OpticsError::InvalidMaxLength(max_length))
    }
}

impl LaserEmitter {
    /// Create a free-standing emitter.
    pub fn new(position: Vec2, angle: f32, max_length: f32, spectrum: Spectrum) -> Result<Self> {
        Ok(Self {
            position,
            angle,
            max_length: check_max_length(max_length)?,
            spectrum,
            attachment: None,
            traced: TracedRay::default(),
        })
    }

    /// Total path length each beam may travel.
    pub fn max_length(&self) -> f32 {
        self.max_length
    }

    pub fn set_max_length(&mut self, max_length: f32) -> Result<()> {
        self.max_length = check_max_length(max_length)?;
        Ok(())
    }

    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    pub fn set_spectrum(&mut self, spectrum: Spectrum) {
        self.spectrum = spectrum;
    }

    /// Transform for drawing the emitter icon.
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.angle)
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Attach to `body`, keeping the emitter's current world placement.
    pub fn attach<S: SceneQuery + ?Sized>(&mut self, body: BodyHandle, scene: &S) -> Result<()> {
        let pose = scene
            .body_pose(body)
            .ok_or(OpticsError::Scene(SceneError::UnknownBody(body)))?;

        self.attachment = Some(Attachment {
            body,
            local_offset: pose.world_to_local(self.position),
            angle_offset: self.angle - pose.angle,
        });
        Ok(())
    }

    /// Attach with explicit offsets; takes effect on the next `resync`.
    pub fn attach_with_offset(&mut self, body: BodyHandle, local_offset: Vec2, angle_offset: f32) {
        self.attachment = Some(Attachment {
            body,
            local_offset,
            angle_offset,
        });
    }

    pub fn detach(&mut self) -> Option<Attachment> {
        self.attachment.take()
    }

    /// Follow the attached body, if any.
    ///
    /// Returns true if the transform was updated. A body that no longer
    /// exists leaves the last known transform in place.
    pub fn resync<S: SceneQuery + ?Sized>(&mut self, scene: &S) -> bool {
        let Some(attachment) = self.attachment else {
            return false;
        };
        let Some(pose) = scene.body_pose(attachment.body) else {
            log::trace!("{} is gone, emitter keeps its last transform", attachment.body);
            return false;
        };

        self.position = pose.local_to_world(attachment.local_offset);
        self.angle = pose.angle + attachment.angle_offset;
        true
    }

    /// Light paths from the most recent frame.
    pub fn traced(&self) -> &TracedRay {
        &self.traced
    }

    pub(crate) fn set_traced(&mut self, traced: TracedRay) {
        self.traced = traced;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectra_core::World;
    use std::f32::consts::FRAC_PI_2;

    fn green(position: Vec2, angle: f32) -> LaserEmitter {
        LaserEmitter::new(position, angle, 100.0, Spectrum::monochromatic(550.0, 1.0).unwrap())
            .unwrap()
    }

    #[test]
    fn test_rejects_bad_max_length() {
        let spectrum = Spectrum::monochromatic(550.0, 1.0).unwrap();
        for bad in [0.0, -1.0, f32::INFINITY, f32::NAN] {
            assert!(LaserEmitter::new(Vec2::ZERO, 0.0, bad, spectrum.clone()).is_err());
        }

        let mut emitter = green(Vec2::ZERO, 0.0);
        assert!(emitter.set_max_length(0.0).is_err());
        assert_eq!(emitter.max_length(), 100.0);
    }

    #[test]
    fn test_unattached_resync_is_noop() {
        let world = World::new();
        let mut emitter = green(Vec2::new(1.0, 2.0), 0.3);

        assert!(!emitter.resync(&world));
        assert_eq!(emitter.pose(), Pose::new(Vec2::new(1.0, 2.0), 0.3));
    }

    #[test]
    fn test_attach_keeps_world_placement() {
        let mut world = World::new();
        let body = world.add_body(Pose::new(Vec2::new(10.0, 0.0), FRAC_PI_2));
        let mut emitter = green(Vec2::new(10.0, 5.0), FRAC_PI_2);

        emitter.attach(body, &world).unwrap();
        assert!(emitter.resync(&world));

        assert!((emitter.position - Vec2::new(10.0, 5.0)).length() < 1e-4);
        assert!((emitter.angle - FRAC_PI_2).abs() < 1e-6);
        let attachment = emitter.attachment().unwrap();
        assert!((attachment.local_offset - Vec2::new(5.0, 0.0)).length() < 1e-4);
        assert!(attachment.angle_offset.abs() < 1e-6);
    }

    #[test]
    fn test_resync_follows_body() {
        let mut world = World::new();
        let body = world.add_body(Pose::default());
        let mut emitter = green(Vec2::ZERO, 0.0);
        emitter.attach_with_offset(body, Vec2::new(2.0, 0.0), 0.5);

        world
            .set_body_pose(body, Pose::new(Vec2::new(0.0, 10.0), FRAC_PI_2))
            .unwrap();
        assert!(emitter.resync(&world));

        assert!((emitter.position - Vec2::new(0.0, 12.0)).length() < 1e-4);
        assert!((emitter.angle - (FRAC_PI_2 + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_dangling_attachment_keeps_last_transform() {
        let mut world = World::new();
        let body = world.add_body(Pose::new(Vec2::new(3.0, 4.0), 0.0));
        let mut emitter = green(Vec2::ZERO, 0.0);
        emitter.attach_with_offset(body, Vec2::ZERO, 0.25);
        emitter.resync(&world);
        let before = emitter.pose();

        world.remove_body(body).unwrap();
        assert!(!emitter.resync(&world));
        assert_eq!(emitter.pose(), before);
        assert!(emitter.attachment().is_some());
    }

    #[test]
    fn test_attach_unknown_body() {
        let world = World::new();
        let mut emitter = green(Vec2::ZERO, 0.0);

        assert!(matches!(
            emitter.attach(BodyHandle(42), &world),
            Err(OpticsError::Scene(SceneError::UnknownBody(BodyHandle(42))))
        ));
        assert!(emitter.detach().is_none());
    }
}
