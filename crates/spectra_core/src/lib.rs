//! Spectra Core - scene contract and reference physics world.
//!
//! This crate provides:
//!
//! - **Scene contract**: `SceneQuery`, `Hit`, `ShapeHandle`, `BodyHandle`
//! - **Reference world**: `World`, a set of bodies carrying circle and
//!   polygon colliders that answers segment and point queries
//!
//! The optics engine only talks to `SceneQuery`, so any physics engine can
//! stand in for `World` by implementing that trait.
//!
//! # Example
//!
//! ```ignore
//! use spectra_core::{SceneQuery, Shape, World};
//! use spectra_math::Vec2;
//!
//! let mut world = World::new();
//! let lens = world.add_static_collider(Shape::circle(Vec2::new(500.0, 0.0), 50.0)?);
//! let hit = world.segment_query(Vec2::ZERO, Vec2::new(1000.0, 0.0));
//! assert_eq!(hit.map(|h| h.shape), Some(lens));
//! ```

pub mod error;
pub mod query;
pub mod shape;
pub mod world;

// Re-export commonly used types
pub use error::{SceneError, SceneResult};
pub use query::{BodyHandle, Hit, SceneQuery, ShapeHandle};
pub use shape::Shape;
pub use world::World;
