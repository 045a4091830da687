//! Spectral light tracing.
//!
//! For every spectral sample of an emitter, a beam is followed through the
//! scene. At each boundary the beam splits into a reflected and a refracted
//! branch according to the boundary's transparency, with the refracted
//! direction depending on the wavelength through the dispersion law.
//!
//! Branches live on an explicit LIFO work stack rather than the call stack,
//! so branching can never overflow the thread stack. One interaction budget
//! (`max_bounces * sample_count`) is shared by all branches of an emitter;
//! once spent, whatever is left on the stack is dropped and the frame shows
//! a truncated light path.

use spectra_core::SceneQuery;
use spectra_math::{Ray2, Vec2};

use crate::backend::{select_backend, OpticsBackend};
use crate::config::TraceConfig;
use crate::emitter::LaserEmitter;
use crate::error::Result;
use crate::medium::MediumSet;
use crate::segment::{RaySegment, TracedRay};

/// Pending work: one beam branch waiting to be traced.
#[derive(Debug, Clone)]
struct TraceState {
    /// Unit-direction ray the branch travels along
    ray: Ray2,
    /// Path length the branch may still travel
    remaining: f32,
    wavelength: f32,
    intensity: f32,
    medium: MediumSet,
}

/// How the energy of a beam divides at a boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergySplit {
    pub reflected: f32,
    pub transmitted: f32,
}

impl EnergySplit {
    /// Split `intensity` with `transparency` going through the boundary.
    ///
    /// `reflected + transmitted == intensity` holds exactly: both parts are
    /// taken as remainders of `intensity`, so one of the two subtractions is
    /// always exact. Transparency is clamped to [0, 1] and NaN counts as
    /// opaque.
    pub fn new(intensity: f32, transparency: f32) -> Self {
        let t = if transparency.is_nan() {
            0.0
        } else {
            transparency.clamp(0.0, 1.0)
        };
        let reflected = intensity - intensity * t;
        Self {
            reflected,
            transmitted: intensity - reflected,
        }
    }
}

/// Traces emitters against a scene.
///
/// Holds the immutable configuration and the numeric backend chosen at
/// construction; cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Tracer {
    config: TraceConfig,
    backend: &'static dyn OpticsBackend,
}

impl Tracer {
    /// Create a tracer using the process-wide backend.
    pub fn new(config: TraceConfig) -> Result<Self> {
        let backend = select_backend(config.backend);
        Self::with_backend(config, backend)
    }

    /// Create a tracer with an explicit backend.
    pub fn with_backend(config: TraceConfig, backend: &'static dyn OpticsBackend) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn backend(&self) -> &'static dyn OpticsBackend {
        self.backend
    }

    /// A branch is worth tracing only with length and energy left.
    #[inline]
    fn is_live(&self, remaining: f32, intensity: f32) -> bool {
        remaining > 0.0 && intensity > self.config.absorption_threshold
    }

    #[inline]
    fn push(&self, stack: &mut Vec<TraceState>, state: TraceState) {
        if self.is_live(state.remaining, state.intensity) {
            stack.push(state);
        }
    }

    /// Trace every spectral sample of `emitter` and collect the visible segments.
    ///
    /// Deterministic: the same emitter and scene always produce the same
    /// segments in the same order.
    pub fn trace<S: SceneQuery + ?Sized>(&self, emitter: &LaserEmitter, scene: &S) -> TracedRay {
        let mut traced = TracedRay::default();

        let pose = emitter.pose();
        let direction = pose.direction();
        if !(direction.is_finite() && pose.position.is_finite()) {
            return traced;
        }

        let spectrum = emitter.spectrum();
        let budget = self.config.max_bounces.saturating_mul(spectrum.len());
        let medium = MediumSet::from(scene.point_query(pose.position));

        let mut stack = Vec::with_capacity(spectrum.len() * 2);
        for sample in spectrum.iter() {
            self.push(
                &mut stack,
                TraceState {
                    ray: Ray2::new(pose.position, direction),
                    remaining: emitter.max_length(),
                    wavelength: sample.wavelength,
                    intensity: sample.intensity,
                    medium: medium.clone(),
                },
            );
        }

        while let Some(state) = stack.pop() {
            if !self.is_live(state.remaining, state.intensity) {
                continue;
            }
            if traced.interactions >= budget {
                traced.truncated = true;
                log::debug!(
                    "Bounce budget of {} spent, dropping {} pending branch(es)",
                    budget,
                    stack.len() + 1
                );
                break;
            }

            traced.interactions += 1;
            self.step(state, scene, &mut stack, &mut traced.segments);
        }

        traced
    }

    /// Advance one branch to its next boundary and queue the child branches.
    fn step<S: SceneQuery + ?Sized>(
        &self,
        state: TraceState,
        scene: &S,
        stack: &mut Vec<TraceState>,
        segments: &mut Vec<RaySegment>,
    ) {
        let endpoint = state.ray.at(state.remaining);

        // Ignore the surface the branch was just spawned from
        let hit = scene
            .segment_query(state.ray.origin, endpoint)
            .filter(|hit| hit.fraction > self.config.self_intersection_epsilon);

        let Some(hit) = hit else {
            segments.push(RaySegment::new(
                state.ray.origin,
                endpoint,
                state.wavelength,
                state.intensity,
            ));
            return;
        };

        let traveled = state.ray.origin.distance(hit.point);
        if !(traveled > 0.0) {
            return;
        }
        segments.push(RaySegment::new(
            state.ray.origin,
            hit.point,
            state.wavelength,
            state.intensity,
        ));

        let remaining = state.remaining - traveled;
        let entering = !state.medium.contains(hit.shape);
        let glass = self
            .backend
            .refractive_index(&self.config.dispersion, state.wavelength);
        let (n1, n2) = if entering { (1.0, glass) } else { (glass, 1.0) };

        let transparency = scene
            .transparency(hit.shape)
            .unwrap_or(self.config.transparency);
        let split = EnergySplit::new(state.intensity, transparency);
        let threshold = self.config.absorption_threshold;
        let eps = self.config.spawn_epsilon;

        // Energy blocked by total internal reflection is not moved into the
        // reflected branch.
        if split.reflected > threshold && remaining > 0.0 {
            let dir = self.backend.reflect(state.ray.direction, hit.normal);
            if dir != Vec2::ZERO {
                self.push(
                    stack,
                    TraceState {
                        ray: Ray2::new(hit.point + dir * eps, dir),
                        remaining,
                        wavelength: state.wavelength,
                        intensity: split.reflected,
                        medium: state.medium.clone(),
                    },
                );
            }
        }

        if split.transmitted > threshold && remaining > 0.0 {
            if let Some(dir) = self.backend.refract(state.ray.direction, hit.normal, n1, n2) {
                let medium = if entering {
                    state.medium.entering(hit.shape)
                } else {
                    state.medium.leaving(hit.shape)
                };
                self.push(
                    stack,
                    TraceState {
                        ray: Ray2::new(hit.point + dir * eps, dir),
                        remaining,
                        wavelength: state.wavelength,
                        intensity: split.transmitted,
                        medium,
                    },
                );
            }
        }
    }
}
