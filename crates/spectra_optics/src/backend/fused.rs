//! f32 kernels built on fused multiply-add.

use spectra_math::Vec2;

use super::{clamp_to_visible, Cauchy, OpticsBackend};

/// Fast path: single precision, every multiply-accumulate fused.
///
/// Correct on any CPU, but only fast where `mul_add` lowers to a hardware
/// FMA instruction, see `fused_available`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FusedBackend;

impl OpticsBackend for FusedBackend {
    fn name(&self) -> &'static str {
        "fused"
    }

    #[inline]
    fn refractive_index(&self, dispersion: &Cauchy, wavelength_nm: f32) -> f32 {
        let um = wavelength_nm * 1e-3;
        dispersion.b.mul_add((um * um).recip(), dispersion.a)
    }

    #[inline]
    fn reflect(&self, incident: Vec2, normal: Vec2) -> Vec2 {
        let d = incident.normalize_or_zero();
        let n = normal.normalize_or_zero();
        if d == Vec2::ZERO || n == Vec2::ZERO {
            return Vec2::ZERO;
        }

        let k = -2.0 * d.dot(n);
        Vec2::new(k.mul_add(n.x, d.x), k.mul_add(n.y, d.y))
    }

    #[inline]
    fn refract(&self, incident: Vec2, normal: Vec2, n1: f32, n2: f32) -> Option<Vec2> {
        let d = incident.normalize_or_zero();
        let mut n = normal.normalize_or_zero();
        if d == Vec2::ZERO || n == Vec2::ZERO || !(n1 > 0.0 && n2 > 0.0) {
            return None;
        }

        // Orient the normal against the incident direction
        let mut cos_i = -d.dot(n);
        if cos_i < 0.0 {
            n = -n;
            cos_i = -cos_i;
        }

        let eta = n1 / n2;
        let sin2_t = (eta * eta) * (-cos_i).mul_add(cos_i, 1.0);
        let k = 1.0 - sin2_t;
        if k < 0.0 {
            return None;
        }

        let coef = eta.mul_add(cos_i, -k.sqrt());
        let t = Vec2::new(eta.mul_add(d.x, coef * n.x), eta.mul_add(d.y, coef * n.y));
        let t = t.normalize_or_zero();
        (t != Vec2::ZERO).then_some(t)
    }

    fn wavelength_to_rgb(&self, wavelength_nm: f32) -> [u8; 3] {
        let nm = clamp_to_visible(wavelength_nm);

        let (r, g, b) = if nm < 440.0 {
            (-(nm - 440.0) / 60.0, 0.0, 1.0)
        } else if nm < 490.0 {
            (0.0, (nm - 440.0) / 50.0, 1.0)
        } else if nm < 510.0 {
            (0.0, 1.0, -(nm - 510.0) / 20.0)
        } else if nm < 580.0 {
            ((nm - 510.0) / 70.0, 1.0, 0.0)
        } else if nm < 645.0 {
            (1.0, -(nm - 645.0) / 65.0, 0.0)
        } else {
            (1.0, 0.0, 0.0)
        };

        // Eye sensitivity falls off toward both ends of the band
        let factor = if nm < 420.0 {
            0.7f32.mul_add((nm - 380.0) / 40.0, 0.3)
        } else if nm > 700.0 {
            0.7f32.mul_add((750.0 - nm) / 50.0, 0.3)
        } else {
            1.0
        };

        let channel = |c: f32| (255.0 * c * factor) as u8;
        [channel(r), channel(g), channel(b)]
    }
}
