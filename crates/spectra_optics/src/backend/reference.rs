//! Portable scalar kernels evaluated in double precision.

use spectra_math::Vec2;

use super::{clamp_to_visible, Cauchy, OpticsBackend};

/// Fallback path: plain arithmetic, no hardware assumptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceBackend;

/// Normalize in f64, `None` for zero-length or non-finite input.
fn unit(v: Vec2) -> Option<(f64, f64)> {
    let (x, y) = (v.x as f64, v.y as f64);
    let len = (x * x + y * y).sqrt();
    if len > 0.0 && len.is_finite() {
        Some((x / len, y / len))
    } else {
        None
    }
}

fn to_vec2((x, y): (f64, f64)) -> Vec2 {
    Vec2::new(x as f32, y as f32)
}

impl OpticsBackend for ReferenceBackend {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn refractive_index(&self, dispersion: &Cauchy, wavelength_nm: f32) -> f32 {
        let um = wavelength_nm as f64 / 1000.0;
        (dispersion.a as f64 + dispersion.b as f64 / (um * um)) as f32
    }

    fn reflect(&self, incident: Vec2, normal: Vec2) -> Vec2 {
        let (Some((dx, dy)), Some((nx, ny))) = (unit(incident), unit(normal)) else {
            return Vec2::ZERO;
        };

        let dot = dx * nx + dy * ny;
        to_vec2((dx - 2.0 * dot * nx, dy - 2.0 * dot * ny))
    }

    fn refract(&self, incident: Vec2, normal: Vec2, n1: f32, n2: f32) -> Option<Vec2> {
        let (dx, dy) = unit(incident)?;
        let (mut nx, mut ny) = unit(normal)?;
        if !(n1 > 0.0 && n2 > 0.0) {
            return None;
        }

        let mut cos_i = -(dx * nx + dy * ny);
        if cos_i < 0.0 {
            nx = -nx;
            ny = -ny;
            cos_i = -cos_i;
        }

        let eta = n1 as f64 / n2 as f64;
        let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
        if k < 0.0 {
            return None;
        }

        let coef = eta * cos_i - k.sqrt();
        let tx = eta * dx + coef * nx;
        let ty = eta * dy + coef * ny;
        let len = (tx * tx + ty * ty).sqrt();
        if len == 0.0 {
            return None;
        }
        Some(to_vec2((tx / len, ty / len)))
    }

    fn wavelength_to_rgb(&self, wavelength_nm: f32) -> [u8; 3] {
        let nm = clamp_to_visible(wavelength_nm) as f64;

        let (r, g, b) = match nm {
            x if x < 440.0 => (-(x - 440.0) / 60.0, 0.0, 1.0),
            x if x < 490.0 => (0.0, (x - 440.0) / 50.0, 1.0),
            x if x < 510.0 => (0.0, 1.0, -(x - 510.0) / 20.0),
            x if x < 580.0 => ((x - 510.0) / 70.0, 1.0, 0.0),
            x if x < 645.0 => (1.0, -(x - 645.0) / 65.0, 0.0),
            _ => (1.0, 0.0, 0.0),
        };

        let factor = match nm {
            x if x < 420.0 => 0.3 + 0.7 * (x - 380.0) / 40.0,
            x if x > 700.0 => 0.3 + 0.7 * (750.0 - x) / 50.0,
            _ => 1.0,
        };

        let channel = |c: f64| (255.0 * c * factor) as u8;
        [channel(r), channel(g), channel(b)]
    }
}
