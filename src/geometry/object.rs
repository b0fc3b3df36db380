//! Three-dimensional objects and their render pipeline
//!
//! A [`Model`] is the authored shape: vertices and faces, shared by every
//! object built from it. An [`Object`] owns its own points and a rigid
//! transform, and on every [`Object::render`] call rebuilds the list of
//! visible screen polygons, nearest-point depth first.
//!
//! Rendering happens in object space against a fixed viewpoint. Each object
//! keeps its own face order; the coarser cross-object order lives in the
//! [`DrawList`], keyed by the object's Z translation.

use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{DVec3, IVec2};
use serde::{Deserialize, Serialize};

use super::draw_list::{DrawList, DrawRef, insert_by_depth};
use super::face::Face;
use super::point::Point;
use super::polygon::ScreenPolygon;

/// Authored shape data, immutable once built
#[derive(Debug, Clone)]
pub struct Model {
    vertices: Vec<DVec3>,
    faces: Arc<[Face]>,
}

impl Model {
    /// Build a model, checking every face against the vertex list
    pub fn new(vertices: Vec<DVec3>, faces: Vec<Face>) -> anyhow::Result<Self> {
        for (i, face) in faces.iter().enumerate() {
            anyhow::ensure!(
                face.is_valid_for(vertices.len()),
                "face {} ({:?}) is not a polygon over {} vertices",
                i,
                face.indices(),
                vertices.len()
            );
        }
        Ok(Self {
            vertices,
            faces: faces.into(),
        })
    }

    /// Build from plain coordinate and index tables
    pub fn from_tables(vertices: &[[f64; 3]], faces: &[&[usize]]) -> anyhow::Result<Self> {
        Self::new(
            vertices.iter().map(|&v| DVec3::from_array(v)).collect(),
            faces.iter().map(|f| Face::new(*f)).collect(),
        )
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
}

/// Rotation (radians about X, Y, Z), uniform scale and translation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub rotation: DVec3,
    pub scale: f64,
    pub translation: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: DVec3::ZERO,
            scale: 1.0,
            translation: DVec3::ZERO,
        }
    }
}

impl Transform {
    pub fn at_depth(z: f64) -> Self {
        Self {
            translation: DVec3::new(0.0, 0.0, z),
            ..Default::default()
        }
    }
}

/// Where and how objects are projected onto the screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Fixed eye point used for projection and visibility
    pub viewpoint: DVec3,
    /// Model units to pixels
    pub magnification: f64,
    /// Screen-space origin (usually the screen center)
    pub x_offset: i32,
    pub y_offset: i32,
}

impl Viewport {
    /// Map a projected point to pixels, flipping y so model "up" is screen "up".
    ///
    /// Points projected from right at the viewpoint plane land far off
    /// screen; the casts saturate at the `i32` limits.
    pub fn to_screen(&self, projected: DVec3) -> IVec2 {
        let y_offset = self.y_offset as f64;
        let x = (self.magnification * projected.x + self.x_offset as f64).round();
        let y = 2.0 * y_offset - (self.magnification * projected.y + y_offset).round();
        IVec2::new(x as i32, y as i32)
    }
}

/// A visible face after rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedFace {
    pub polygon: ScreenPolygon,
    /// Angle between the outward normal and the view vector, in `[0, π/2)`
    pub angle: f64,
    /// Largest projected depth among the face's points
    pub depth: f64,
}

/// Angle between a face's outward normal and the direction to the viewpoint.
///
/// The normal is `(p1 - p0) × (p2 - p1)` and the view vector runs from `p1`.
/// Either vector having zero length gives 0.
pub fn face_angle(p0: DVec3, p1: DVec3, p2: DVec3, viewpoint: DVec3) -> f64 {
    let normal = (p1 - p0).cross(p2 - p1);
    let view = viewpoint - p1;
    let div = view.length() * normal.length();
    if div == 0.0 {
        return 0.0;
    }
    (view.dot(normal) / div).clamp(-1.0, 1.0).acos()
}

/// Faces at or past a right angle to the viewer are culled
#[inline]
pub fn is_visible(angle: f64) -> bool {
    angle < FRAC_PI_2
}

/// An instance of a model with its own transform and render output
#[derive(Debug, Clone)]
pub struct Object {
    points: Vec<Point>,
    faces: Arc<[Face]>,
    pub transform: Transform,
    rendered: Vec<RenderedFace>,
}

impl Object {
    pub fn new(model: &Model) -> Self {
        Self {
            points: model.vertices.iter().map(|&v| Point::from_vec(v)).collect(),
            faces: Arc::clone(&model.faces),
            transform: Transform::default(),
            rendered: Vec::new(),
        }
    }

    /// An object with no geometry; renders nothing
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            faces: Arc::from(Vec::new()),
            transform: Transform::default(),
            rendered: Vec::new(),
        }
    }

    /// Two-sided single-face object cut from face `index` of `source`.
    ///
    /// Takes the face's original points and the source's current transform,
    /// so the fragment starts exactly where the face was. Returns `None` for
    /// an out-of-range index.
    pub fn from_face(source: &Object, index: usize) -> Option<Self> {
        let face = source.faces.get(index)?;
        let points: Vec<Point> = face
            .indices()
            .iter()
            .map(|&i| Point::from_vec(source.points[i].original))
            .collect();
        let front = Face::new((0..points.len()).collect::<Vec<_>>());
        let back = front.reversed();
        Some(Self {
            points,
            faces: Arc::from(vec![front, back]),
            transform: source.transform,
            rendered: Vec::new(),
        })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Whether two objects share the same face table
    pub fn shares_faces_with(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.faces, &other.faces)
    }

    /// Visible faces from the last render, non-decreasing in depth
    pub fn rendered(&self) -> &[RenderedFace] {
        &self.rendered
    }

    /// Transform and project every point, then rebuild the visible faces
    pub fn render(&mut self, viewport: &Viewport) {
        let t = self.transform;
        for point in &mut self.points {
            point.transform(t.rotation, t.scale, t.translation);
            point.project(viewport.viewpoint);
        }

        self.rendered.clear();

        for face in self.faces.iter() {
            let idx = face.indices();

            let mut polygon = ScreenPolygon::with_capacity(idx.len());
            let mut depth = f64::NEG_INFINITY;
            for &k in idx {
                let p = &self.points[k];
                polygon.push(viewport.to_screen(p.projected));
                depth = depth.max(p.projected.z);
            }

            let angle = face_angle(
                self.points[idx[0]].transformed,
                self.points[idx[1]].transformed,
                self.points[idx[2]].transformed,
                viewport.viewpoint,
            );

            if is_visible(angle) {
                insert_by_depth(
                    &mut self.rendered,
                    RenderedFace {
                        polygon,
                        angle,
                        depth,
                    },
                    |f| f.depth,
                );
            }
        }
    }

    /// Render, then enter this object into the frame's draw list by its Z
    /// translation
    pub fn render_into(&mut self, viewport: &Viewport, list: &mut DrawList, target: DrawRef) {
        self.render(viewport);
        list.insert(target, self.transform.translation.z);
    }
}
