//! Points in three-space
//!
//! Every point carries three coordinate triples:
//! - `original`: authored object-space position, never changed after creation
//! - `transformed`: after the owning object's rotate/scale/translate
//! - `projected`: screen-plane x/y plus a depth value
//!
//! The derived triples are rebuilt from `original` on every call, so a frame
//! never accumulates error from the one before it.

use glam::DVec3;

/// A vertex with its original, transformed and projected representations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub original: DVec3,
    pub transformed: DVec3,
    pub projected: DVec3,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_vec(DVec3::new(x, y, z))
    }

    pub fn from_vec(v: DVec3) -> Self {
        Self {
            original: v,
            transformed: v,
            projected: v,
        }
    }

    /// Rotate about X, then Y, then Z, then scale uniformly, then translate.
    ///
    /// Each rotation is applied to the result of the previous one rather than
    /// through a combined matrix.
    pub fn transform(&mut self, rotation: DVec3, scale: f64, translation: DVec3) {
        let DVec3 { x, y, z } = self.original;

        // About X
        let (s, c) = rotation.x.sin_cos();
        let (x, y, z) = (x, y * c - z * s, y * s + z * c);

        // About Y
        let (s, c) = rotation.y.sin_cos();
        let (x, y, z) = (x * c - z * s, y, x * s + z * c);

        // About Z
        let (s, c) = rotation.z.sin_cos();
        let (x, y, z) = (x * c - y * s, x * s + y * c, z);

        self.transformed = DVec3::new(x, y, z) * scale + translation;
    }

    /// Pinhole projection of the transformed point against `viewpoint`.
    ///
    /// A point level with the viewpoint in depth projects to the origin with
    /// zero depth.
    pub fn project(&mut self, viewpoint: DVec3) {
        let p = self.transformed;
        let d = viewpoint.z - p.z;
        self.projected = if d != 0.0 {
            DVec3::new(
                (viewpoint.z * p.x - viewpoint.x * p.z) / d,
                (viewpoint.z * p.y - viewpoint.y * p.z) / d,
                (viewpoint.z * p.z) / d,
            )
        } else {
            DVec3::ZERO
        };
    }
}
