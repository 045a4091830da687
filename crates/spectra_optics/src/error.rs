//! Error types for Spectra optics.
//!
//! Nothing that happens during a trace is an error: degenerate geometry,
//! dangling attachments and budget exhaustion are handled in place. These
//! variants cover construction and configuration only.

use spectra_core::SceneError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpticsError {
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Spectrum must contain at least one sample")]
    EmptySpectrum,

    #[error("Invalid spectral sample: {0}")]
    InvalidSample(String),

    #[error("Max length must be positive and finite, got {0}")]
    InvalidMaxLength(f32),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OpticsError>;

impl OpticsError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        OpticsError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
