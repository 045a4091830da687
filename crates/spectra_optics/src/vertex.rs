//! Hand-off of traced segments to a GPU renderer.

use spectra_math::Vec2;

use crate::backend::OpticsBackend;
use crate::segment::TracedRay;

/// Line-list vertex: position plus RGBA color.
///
/// RGB comes from the segment's wavelength, alpha from its intensity.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SegmentVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl SegmentVertex {
    fn new(position: Vec2, rgb: [u8; 3], intensity: f32) -> Self {
        Self {
            position: position.to_array(),
            color: [
                rgb[0] as f32 / 255.0,
                rgb[1] as f32 / 255.0,
                rgb[2] as f32 / 255.0,
                intensity.clamp(0.0, 1.0),
            ],
        }
    }
}

/// Expand a trace into two vertices per segment.
///
/// Upload with `bytemuck::cast_slice(&vertices)` and draw as a line list.
pub fn segment_vertices(ray: &TracedRay, backend: &dyn OpticsBackend) -> Vec<SegmentVertex> {
    let mut vertices = Vec::with_capacity(ray.len() * 2);
    for segment in ray.iter() {
        let rgb = segment.color(backend);
        vertices.push(SegmentVertex::new(segment.start, rgb, segment.intensity));
        vertices.push(SegmentVertex::new(segment.end, rgb, segment.intensity));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ReferenceBackend;
    use crate::segment::RaySegment;

    #[test]
    fn test_two_vertices_per_segment() {
        let ray = TracedRay {
            segments: vec![
                RaySegment::new(Vec2::ZERO, Vec2::X, 645.0, 1.0),
                RaySegment::new(Vec2::X, Vec2::ONE, 510.0, 0.5),
            ],
            ..Default::default()
        };

        let vertices = segment_vertices(&ray, &ReferenceBackend);

        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0].position, [0.0, 0.0]);
        assert_eq!(vertices[1].position, [1.0, 0.0]);
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(vertices[3].color, [0.0, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_cast_to_bytes() {
        let ray = TracedRay {
            segments: vec![RaySegment::new(Vec2::ZERO, Vec2::X, 550.0, 1.0)],
            ..Default::default()
        };
        let vertices = segment_vertices(&ray, &ReferenceBackend);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);

        assert_eq!(bytes.len(), 2 * std::mem::size_of::<SegmentVertex>());
        assert_eq!(std::mem::size_of::<SegmentVertex>(), 24);
    }
}
