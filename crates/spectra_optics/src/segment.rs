//! Per-frame trace output.

use spectra_math::Vec2;

use crate::backend::OpticsBackend;

/// One straight, visible piece of a light path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySegment {
    pub start: Vec2,
    pub end: Vec2,
    /// Wavelength in nanometres
    pub wavelength: f32,
    /// Relative energy carried along the segment
    pub intensity: f32,
}

impl RaySegment {
    pub fn new(start: Vec2, end: Vec2, wavelength: f32, intensity: f32) -> Self {
        Self {
            start,
            end,
            wavelength,
            intensity,
        }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end, zero for a degenerate segment.
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Display color recommended for this segment.
    pub fn color(&self, backend: &dyn OpticsBackend) -> [u8; 3] {
        backend.wavelength_to_rgb(self.wavelength)
    }
}

/// Every segment one emitter produced this frame.
///
/// Replaced wholesale each frame; segments carry no identity across frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TracedRay {
    /// Segments in emission order
    pub segments: Vec<RaySegment>,

    /// Trace states processed against the bounce budget
    pub interactions: usize,

    /// True if the bounce budget cut the trace short
    pub truncated: bool,
}

impl TracedRay {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RaySegment> {
        self.segments.iter()
    }

    /// Sum of segment lengths.
    pub fn total_length(&self) -> f32 {
        self.segments.iter().map(RaySegment::length).sum()
    }
}
