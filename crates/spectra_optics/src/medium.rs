//! Per-branch record of which shapes a ray is inside.

use std::collections::HashSet;

use spectra_core::ShapeHandle;

/// Shapes the current ray branch is inside.
///
/// Only consulted to decide which side of a boundary carries the glass
/// index. Reflection keeps the set; refraction adds or removes the shape
/// that was crossed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediumSet {
    inside: HashSet<ShapeHandle>,
}

impl MediumSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, shape: ShapeHandle) -> bool {
        self.inside.contains(&shape)
    }

    /// The set after crossing into `shape`.
    pub fn entering(&self, shape: ShapeHandle) -> Self {
        let mut next = self.clone();
        next.inside.insert(shape);
        next
    }

    /// The set after crossing out of `shape`.
    pub fn leaving(&self, shape: ShapeHandle) -> Self {
        let mut next = self.clone();
        next.inside.remove(&shape);
        next
    }

    pub fn len(&self) -> usize {
        self.inside.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inside.is_empty()
    }
}

impl From<HashSet<ShapeHandle>> for MediumSet {
    fn from(inside: HashSet<ShapeHandle>) -> Self {
        Self { inside }
    }
}
