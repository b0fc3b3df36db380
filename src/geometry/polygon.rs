//! Integer screen-space polygons

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

/// A projected face in pixel coordinates (y grows downward)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPolygon {
    pub points: Vec<IVec2>,
}

impl ScreenPolygon {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            points: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, p: IVec2) {
        self.points.push(p);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Even-odd containment test.
    ///
    /// Crossings are counted on a ray toward +x with half-open edge spans, so
    /// a point on a shared edge belongs to exactly one of two adjacent
    /// polygons.
    pub fn contains(&self, p: IVec2) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let p = p.as_dvec2();
        let mut inside = false;
        let mut prev: DVec2 = self.points[self.points.len() - 1].as_dvec2();
        for cur in self.points.iter().map(|v| v.as_dvec2()) {
            if (cur.y > p.y) != (prev.y > p.y) {
                let x_cross = cur.x + (p.y - cur.y) * (prev.x - cur.x) / (prev.y - cur.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            prev = cur;
        }
        inside
    }

    /// Axis-aligned bounds as (min, max), `None` when empty
    pub fn bounds(&self) -> Option<(IVec2, IVec2)> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    /// Middle of the bounds, `None` when empty. Safe for points at the `i32`
    /// limits.
    pub fn center(&self) -> Option<IVec2> {
        let (min, max) = self.bounds()?;
        Some(((min.as_dvec2() + max.as_dvec2()) / 2.0).round().as_ivec2())
    }
}

impl FromIterator<IVec2> for ScreenPolygon {
    fn from_iter<T: IntoIterator<Item = IVec2>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
