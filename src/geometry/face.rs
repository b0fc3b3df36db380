//! Polygon faces of a model
//!
//! A face lists vertex indices in right-hand-rule order: curling the fingers
//! along the index order, the thumb points out of the visible side.

/// Minimum vertices needed to define a plane
pub const MIN_FACE_VERTICES: usize = 3;

/// An ordered list of vertex indices into the owning model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self {
            indices: indices.into(),
        }
    }

    /// Indices in winding order
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The same polygon wound the other way, so its visible side flips
    pub fn reversed(&self) -> Self {
        Self {
            indices: self.indices.iter().rev().copied().collect(),
        }
    }

    /// Check the face has enough vertices and every index is in range
    pub fn is_valid_for(&self, vertex_count: usize) -> bool {
        self.indices.len() >= MIN_FACE_VERTICES && self.indices.iter().all(|&i| i < vertex_count)
    }
}
