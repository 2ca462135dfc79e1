//! Built-in primitive geometry
//!
//! Unit-sized shapes centred on the origin. Triangle and square lie in the
//! XY plane, so their boxes are flat on Z.

use crate::model::ModelStore;
use crate::thing::RenderKind;
use thing3d_math::Vec3;
use thing3d_physics::bounds_from_vertices;

pub const TRIANGLE_VERTICES: [Vec3; 3] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(0.0, 0.5, 0.0),
];

pub const SQUARE_VERTICES: [Vec3; 4] = [
    Vec3::new(-0.5, -0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(0.5, 0.5, 0.0),
    Vec3::new(-0.5, 0.5, 0.0),
];

pub const SQUARE_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-0.5, -0.5, -0.5),
    Vec3::new(0.5, -0.5, -0.5),
    Vec3::new(0.5, 0.5, -0.5),
    Vec3::new(-0.5, 0.5, -0.5),
    Vec3::new(-0.5, -0.5, 0.5),
    Vec3::new(0.5, -0.5, 0.5),
    Vec3::new(0.5, 0.5, 0.5),
    Vec3::new(-0.5, 0.5, 0.5),
];

/// Counter-clockwise when seen from outside
#[rustfmt::skip]
pub const CUBE_INDICES: [u32; 36] = [
    0, 2, 1, 0, 3, 2, // -Z
    4, 5, 6, 6, 7, 4, // +Z
    0, 4, 7, 7, 3, 0, // -X
    1, 2, 6, 6, 5, 1, // +X
    0, 1, 5, 5, 4, 0, // -Y
    3, 7, 6, 6, 2, 3, // +Y
];

/// Vertex positions of a built-in kind; `None` for models
pub fn vertices(kind: &RenderKind) -> Option<&'static [Vec3]> {
    match kind {
        RenderKind::Triangle => Some(&TRIANGLE_VERTICES),
        RenderKind::Square => Some(&SQUARE_VERTICES),
        RenderKind::Cube => Some(&CUBE_VERTICES),
        RenderKind::Model(_) => None,
    }
}

/// Half-extents of a render kind drawn at `scale`
///
/// A model missing from `models` gets a zero-size box.
pub fn render_bounds(kind: &RenderKind, scale: Vec3, models: &ModelStore) -> Vec3 {
    match kind {
        RenderKind::Model(key) => match models.get(*key) {
            Some(model) => model.half_extents(scale),
            None => {
                log::warn!("Model {:?} not in store, using empty bounds", key);
                Vec3::ZERO
            }
        },
        _ => vertices(kind).map_or(Vec3::ZERO, |v| bounds_from_vertices(v, scale)),
    }
}
