//! Numeric backend for the trace engine.
//!
//! The trace engine needs four pure functions: Cauchy dispersion, mirror
//! reflection, Snell refraction and a wavelength-to-RGB ramp. They sit behind
//! `OpticsBackend` with two implementations:
//!
//! - `FusedBackend`: f32 with fused multiply-add, the fast path on CPUs
//!   with hardware FMA
//! - `ReferenceBackend`: portable scalar arithmetic carried out in f64
//!
//! Both agree within floating tolerance. `select_backend` picks one the
//! first time it is called and every later call returns the same choice.
//!
//! # Example
//!
//! ```ignore
//! use spectra_optics::backend::{select_backend, BackendPreference};
//!
//! let backend = select_backend(BackendPreference::Auto);
//! let rgb = backend.wavelength_to_rgb(550.0);
//! ```

mod fused;
mod reference;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use spectra_math::{Interval, Vec2};

pub use fused::FusedBackend;
pub use reference::ReferenceBackend;

/// Environment variable that overrides the configured backend preference.
pub const BACKEND_ENV_VAR: &str = "SPECTRA_BACKEND";

/// Cauchy dispersion constants: `n(λ) = a + b / λ²` with λ in micrometres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cauchy {
    pub a: f32,
    pub b: f32,
}

impl Default for Cauchy {
    /// Borosilicate crown glass.
    fn default() -> Self {
        Self {
            a: 1.5046,
            b: 0.0042,
        }
    }
}

/// Pure numeric kernels used by the trace engine.
///
/// Direction arguments need not be normalized; zero-length inputs produce a
/// zero vector (or `None`) and the caller drops the branch.
pub trait OpticsBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Refractive index at `wavelength_nm`.
    fn refractive_index(&self, dispersion: &Cauchy, wavelength_nm: f32) -> f32;

    /// Mirror `incident` about the surface `normal`: `d - 2(d·n)n`.
    fn reflect(&self, incident: Vec2, normal: Vec2) -> Vec2;

    /// Bend `incident` through a boundary going from index `n1` into `n2`.
    ///
    /// The normal may face either side of the surface. Returns `None` on
    /// total internal reflection or degenerate input.
    fn refract(&self, incident: Vec2, normal: Vec2, n1: f32, n2: f32) -> Option<Vec2>;

    /// Approximate display color of a wavelength, clamped to the visible band.
    fn wavelength_to_rgb(&self, wavelength_nm: f32) -> [u8; 3];
}

impl fmt::Debug for dyn OpticsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpticsBackend({})", self.name())
    }
}

/// Which backend the process should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// Fused when the CPU supports it, otherwise reference
    #[default]
    Auto,
    Fused,
    Reference,
}

impl FromStr for BackendPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "fused" => Ok(Self::Fused),
            "reference" => Ok(Self::Reference),
            other => Err(format!("unknown backend '{other}'")),
        }
    }
}

/// Band (nm) the RGB ramp is defined over.
pub const VISIBLE_BAND: Interval = Interval::new(380.0, 750.0);

/// Pin a wavelength onto the RGB ramp. NaN maps to the short edge.
pub(crate) fn clamp_to_visible(wavelength_nm: f32) -> f32 {
    if wavelength_nm.is_nan() {
        VISIBLE_BAND.min
    } else {
        VISIBLE_BAND.clamp(wavelength_nm)
    }
}

static FUSED: FusedBackend = FusedBackend;
static REFERENCE: ReferenceBackend = ReferenceBackend;
static SELECTED: OnceLock<&'static dyn OpticsBackend> = OnceLock::new();

/// Returns true if the fused backend runs on hardware FMA here.
pub fn fused_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("fma")
    }
    #[cfg(target_arch = "aarch64")]
    {
        true
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        false
    }
}

/// Select the process-wide backend.
///
/// The first call probes the CPU and honours `SPECTRA_BACKEND` over
/// `preference`; the result is fixed for the rest of the process.
pub fn select_backend(preference: BackendPreference) -> &'static dyn OpticsBackend {
    *SELECTED.get_or_init(|| {
        let preference = env_preference().unwrap_or(preference);
        let backend = resolve(preference, fused_available());
        log::info!("Optics backend: {}", backend.name());
        backend
    })
}

/// The selected backend, if `select_backend` has run.
pub fn selected_backend() -> Option<&'static dyn OpticsBackend> {
    SELECTED.get().copied()
}

fn env_preference() -> Option<BackendPreference> {
    let value = std::env::var(BACKEND_ENV_VAR).ok()?;
    match value.parse() {
        Ok(preference) => Some(preference),
        Err(e) => {
            log::warn!("Ignoring {}: {}", BACKEND_ENV_VAR, e);
            None
        }
    }
}

fn resolve(preference: BackendPreference, fused_ok: bool) -> &'static dyn OpticsBackend {
    match preference {
        BackendPreference::Reference => &REFERENCE,
        BackendPreference::Auto if fused_ok => &FUSED,
        BackendPreference::Auto => &REFERENCE,
        BackendPreference::Fused if fused_ok => &FUSED,
        BackendPreference::Fused => {
            log::warn!("Fused backend unavailable (no hardware FMA), using reference backend");
            &REFERENCE
        }
    }
}
