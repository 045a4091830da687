//! Spectral composition of an emitted beam.

use spectra_math::Interval;

use crate::error::{OpticsError, Result};

/// One component of a compound beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSample {
    /// Wavelength in nanometres
    pub wavelength: f32,
    /// Relative energy in [0, 1]
    pub intensity: f32,
}

impl SpectralSample {
    pub fn new(wavelength: f32, intensity: f32) -> Self {
        Self {
            wavelength,
            intensity,
        }
    }
}

/// Ordered, non-empty list of spectral samples.
///
/// Sample order is significant: it fixes the order in which the trace
/// engine processes wavelengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    samples: Vec<SpectralSample>,
}

impl Spectrum {
    /// Create a spectrum, rejecting empty input and unusable samples.
    pub fn new(samples: Vec<SpectralSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(OpticsError::EmptySpectrum);
        }

        for sample in &samples {
            if !(sample.wavelength.is_finite() && sample.wavelength > 0.0) {
                return Err(OpticsError::InvalidSample(format!(
                    "wavelength must be positive, got {}",
                    sample.wavelength
                )));
            }
            if !(0.0..=1.0).contains(&sample.intensity) {
                return Err(OpticsError::InvalidSample(format!(
                    "intensity must be within [0, 1], got {}",
                    sample.intensity
                )));
            }
        }

        Ok(Self { samples })
    }

    /// A single-wavelength beam.
    pub fn monochromatic(wavelength: f32, intensity: f32) -> Result<Self> {
        Self::new(vec![SpectralSample::new(wavelength, intensity)])
    }

    /// `count` evenly spaced samples spanning `band`, all at `intensity`.
    ///
    /// A single sample sits in the middle of the band.
    pub fn uniform(band: Interval, count: usize, intensity: f32) -> Result<Self> {
        let samples = match count {
            0 => Vec::new(),
            1 => vec![SpectralSample::new(band.lerp(0.5), intensity)],
            _ => (0..count)
                .map(|i| {
                    let t = i as f32 / (count - 1) as f32;
                    SpectralSample::new(band.lerp(t), intensity)
                })
                .collect(),
        };
        Self::new(samples)
    }

    pub fn samples(&self) -> &[SpectralSample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpectralSample> {
        self.samples.iter()
    }

    /// Get the number of samples (always at least 1).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl TryFrom<Vec<SpectralSample>> for Spectrum {
    type Error = OpticsError;

    fn try_from(samples: Vec<SpectralSample>) -> Result<Self> {
        Self::new(samples)
    }
}
