//! Trace configuration.
//!
//! All tunables of the trace engine live in one immutable `TraceConfig`
//! handed to `Tracer` at construction. It can be built in code with the
//! builder-style setters or loaded from JSON; missing JSON fields take their
//! default values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use spectra_math::Interval;

use crate::backend::{BackendPreference, Cauchy};
use crate::error::{OpticsError, Result};
use crate::spectrum::Spectrum;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Short edge of the visible band (nm)
    pub min_wavelength_nm: f32,

    /// Long edge of the visible band (nm)
    pub max_wavelength_nm: f32,

    /// Samples in a default white-light spectrum
    pub default_sample_count: usize,

    /// Transmitted fraction at boundaries without a per-shape override
    pub transparency: f32,

    /// Branches at or below this intensity count as absorbed
    pub absorption_threshold: f32,

    /// Hits at or below this segment fraction are ignored
    ///
    /// The fraction is measured along the branch's remaining length, so the
    /// ignored zone grows with the emitter's `max_length`: at 1e-4 and a
    /// 100000 unit beam, surfaces closer than 10 units are passed through.
    /// Lower it for very long beams.
    pub self_intersection_epsilon: f32,

    /// Distance new branches start off the surface (world units)
    pub spawn_epsilon: f32,

    /// Interaction budget per spectral sample
    pub max_bounces: usize,

    /// Dispersion of every refracting shape
    pub dispersion: Cauchy,

    /// Numeric backend to request at startup
    pub backend: BackendPreference,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            min_wavelength_nm: 380.0,
            max_wavelength_nm: 750.0,
            default_sample_count: 10,
            transparency: 0.5,
            absorption_threshold: 0.01,
            self_intersection_epsilon: 1e-4,
            spawn_epsilon: 1e-2,
            max_bounces: 32,
            dispersion: Cauchy::default(),
            backend: BackendPreference::Auto,
        }
    }
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TraceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The visible wavelength band as an interval.
    pub fn visible_band(&self) -> Interval {
        Interval::new(self.min_wavelength_nm, self.max_wavelength_nm)
    }

    /// Evenly spaced white light across the visible band, unit intensity.
    pub fn default_spectrum(&self) -> Result<Spectrum> {
        Spectrum::uniform(self.visible_band(), self.default_sample_count, 1.0)
    }

    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<()> {
        let band = self.visible_band();
        if !(band.min.is_finite() && band.max.is_finite() && band.min > 0.0) {
            return Err(OpticsError::config(
                "wavelength band",
                format!("must be finite and positive, got {}..{}", band.min, band.max),
            ));
        }
        if band.size() <= 0.0 {
            return Err(OpticsError::config(
                "wavelength band",
                format!("is empty: {}..{}", band.min, band.max),
            ));
        }
        if self.default_sample_count == 0 {
            return Err(OpticsError::config("default_sample_count", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.transparency) {
            return Err(OpticsError::config(
                "transparency",
                format!("must be within [0, 1], got {}", self.transparency),
            ));
        }
        if !(0.0..1.0).contains(&self.absorption_threshold) {
            return Err(OpticsError::config(
                "absorption_threshold",
                format!("must be within [0, 1), got {}", self.absorption_threshold),
            ));
        }
        if !(self.self_intersection_epsilon > 0.0 && self.self_intersection_epsilon < 1.0) {
            return Err(OpticsError::config(
                "self_intersection_epsilon",
                format!("must be within (0, 1), got {}", self.self_intersection_epsilon),
            ));
        }
        if !(self.spawn_epsilon > 0.0 && self.spawn_epsilon.is_finite()) {
            return Err(OpticsError::config(
                "spawn_epsilon",
                format!("must be positive, got {}", self.spawn_epsilon),
            ));
        }
        if self.max_bounces == 0 {
            return Err(OpticsError::config("max_bounces", "must be at least 1"));
        }
        let Cauchy { a, b } = self.dispersion;
        if !(a.is_finite() && b.is_finite() && a >= 1.0) {
            return Err(OpticsError::config(
                "dispersion",
                format!("needs finite constants with a >= 1, got {:?}", self.dispersion),
            ));
        }
        Ok(())
    }

    pub fn visible_range(mut self, min_nm: f32, max_nm: f32) -> Self {
        self.min_wavelength_nm = min_nm;
        self.max_wavelength_nm = max_nm;
        self
    }

    pub fn default_sample_count(mut self, count: usize) -> Self {
        self.default_sample_count = count;
        self
    }

    pub fn transparency(mut self, transparency: f32) -> Self {
        self.transparency = transparency;
        self
    }

    pub fn absorption_threshold(mut self, threshold: f32) -> Self {
        self.absorption_threshold = threshold;
        self
    }

    pub fn self_intersection_epsilon(mut self, epsilon: f32) -> Self {
        self.self_intersection_epsilon = epsilon;
        self
    }

    pub fn spawn_epsilon(mut self, epsilon: f32) -> Self {
        self.spawn_epsilon = epsilon;
        self
    }

    pub fn max_bounces(mut self, bounces: usize) -> Self {
        self.max_bounces = bounces;
        self
    }

    pub fn dispersion(mut self, a: f32, b: f32) -> Self {
        self.dispersion = Cauchy { a, b };
        self
    }

    pub fn backend(mut self, preference: BackendPreference) -> Self {
        self.backend = preference;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TraceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.visible_band(), Interval::new(380.0, 750.0));
        assert_eq!(config.default_spectrum().unwrap().len(), 10);
    }

    #[test]
    fn test_builder() {
        let config = TraceConfig::new()
            .transparency(0.25)
            .max_bounces(8)
            .dispersion(1.6, 0.01)
            .backend(BackendPreference::Reference);

        assert_eq!(config.transparency, 0.25);
        assert_eq!(config.max_bounces, 8);
        assert_eq!(config.dispersion, Cauchy { a: 1.6, b: 0.01 });
        assert_eq!(config.backend, BackendPreference::Reference);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            TraceConfig::new().visible_range(750.0, 380.0),
            TraceConfig::new().visible_range(0.0, 380.0),
            TraceConfig::new().default_sample_count(0),
            TraceConfig::new().transparency(1.5),
            TraceConfig::new().transparency(f32::NAN),
            TraceConfig::new().absorption_threshold(1.0),
            TraceConfig::new().self_intersection_epsilon(0.0),
            TraceConfig::new().spawn_epsilon(-1.0),
            TraceConfig::new().max_bounces(0),
            TraceConfig::new().dispersion(0.5, 0.004),
        ];

        for config in bad {
            assert!(
                matches!(config.validate(), Err(OpticsError::InvalidConfig { .. })),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = TraceConfig::from_json_str(
            r#"{
                "transparency": 0.8,
                "backend": "reference",
                "dispersion": { "a": 1.7, "b": 0.01 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.transparency, 0.8);
        assert_eq!(config.backend, BackendPreference::Reference);
        assert_eq!(config.dispersion, Cauchy { a: 1.7, b: 0.01 });
        assert_eq!(config.max_bounces, TraceConfig::default().max_bounces);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TraceConfig::new().max_bounces(5).transparency(0.1);
        let json = config.to_json_string().unwrap();
        assert_eq!(TraceConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            TraceConfig::from_json_str("{ not json"),
            Err(OpticsError::Json(_))
        ));
        assert!(matches!(
            TraceConfig::from_json_str(r#"{ "transparency": 2.0 }"#),
            Err(OpticsError::InvalidConfig { field: "transparency", .. })
        ));
        assert!(matches!(
            TraceConfig::from_json_file("/nonexistent/spectra.json"),
            Err(OpticsError::Io(_))
        ));
    }
}
