//! Spectra Optics - spectral light tracing in a 2D physics scene.
//!
//! Given laser emitters placed among physics bodies, computes the visible
//! light paths produced by reflection and dispersive refraction, one
//! wavelength at a time.
//!
//! - **Numeric backend**: dispersion, reflect/refract vector math and
//!   wavelength colors behind `OpticsBackend`
//! - **Emitters**: `LaserEmitter` with an optional weak body attachment
//! - **Trace engine**: `Tracer`, a bounded, stack-based branch tracer
//! - **Frame driver**: `FrameDriver` resyncs and traces emitters each frame
//!
//! # Example
//!
//! ```ignore
//! use spectra_optics::{FrameDriver, LaserEmitter, Spectrum, TraceConfig, Tracer};
//!
//! let config = TraceConfig::default();
//! let driver = FrameDriver::new(Tracer::new(config.clone())?);
//! let white = LaserEmitter::new(Vec2::ZERO, 0.0, 1000.0, config.default_spectrum()?)?;
//! let mut emitters = vec![white];
//!
//! // Once per frame, after the physics step:
//! driver.update(&mut emitters, &world);
//! for segment in emitters[0].traced().iter() {
//!     draw_line(segment.start, segment.end, segment.color(driver.tracer().backend()));
//! }
//! ```

pub mod backend;
pub mod config;
pub mod driver;
pub mod emitter;
pub mod error;
pub mod medium;
pub mod segment;
pub mod spectrum;
pub mod trace;
pub mod vertex;

// Re-export commonly used types
pub use backend::{select_backend, BackendPreference, Cauchy, OpticsBackend};
pub use config::TraceConfig;
pub use driver::{FrameDriver, FrameStats};
pub use emitter::{Attachment, LaserEmitter};
pub use error::{OpticsError, Result};
pub use medium::MediumSet;
pub use segment::{RaySegment, TracedRay};
pub use spectrum::{SpectralSample, Spectrum};
pub use trace::{EnergySplit, Tracer};
pub use vertex::{segment_vertices, SegmentVertex};
