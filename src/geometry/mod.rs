//! 3D object pipeline
//!
//! Points are transformed and projected, faces become screen polygons,
//! back faces are culled, and the survivors are depth-sorted per object.
//! Objects then take their place in a frame-wide painter's order.

pub mod draw_list;
pub mod face;
pub mod object;
pub mod point;
pub mod polygon;

pub use draw_list::{DrawEntry, DrawList, DrawRef, insert_by_depth};
pub use face::Face;
pub use object::{Model, Object, RenderedFace, Transform, Viewport, face_angle, is_visible};
pub use point::Point;
pub use polygon::ScreenPolygon;
