//! Error types for scene construction.

use thiserror::Error;

use crate::query::{BodyHandle, ShapeHandle};

/// Errors that can occur while building or editing a `World`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Transparency must be within [0, 1], got {0}")]
    InvalidTransparency(f32),

    #[error("Unknown body: {0}")]
    UnknownBody(BodyHandle),

    #[error("Unknown shape: {0}")]
    UnknownShape(ShapeHandle),
}

pub type SceneResult<T> = Result<T, SceneError>;
