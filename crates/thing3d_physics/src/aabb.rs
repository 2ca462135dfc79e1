//! Axis-aligned bounding boxes and swept ray tests
//!
//! Sweeping a moving box against a static one is reduced to casting the
//! mover's centre as a ray against the static box grown by the mover's
//! half-extents (Minkowski sum). The ray is a *displacement*, not a unit
//! direction, so a hit at time `t` means contact after travelling the
//! fraction `t` of this tick's motion.

use crate::body::Body;
use thing3d_math::Vec3;

/// Displacement components at or below this magnitude are treated as parallel
pub const PARALLEL_EPSILON: f32 = 1e-8;

/// A box given by centre and half-extents
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    /// Create a box from centre and half-extents
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Minimum corner
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Grow this box by another box's half-extents, keeping the centre
    #[inline]
    pub fn expanded_by(&self, half_extents: Vec3) -> Self {
        Self::new(self.center, self.half_extents + half_extents)
    }

    /// Strict containment: points on the boundary are outside
    pub fn contains_strict(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        (0..3).all(|i| point.axis(i) > min.axis(i) && point.axis(i) < max.axis(i))
    }
}

/// Result of a successful sweep
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// Fraction of the displacement travelled before contact, in [0, 1]
    pub time: f32,
    /// Ray origin advanced to the contact time
    pub position: Vec3,
    /// Axis-aligned contact normal pointing from the collider toward the mover
    pub normal: Vec3,
}

impl Hit {
    /// Index of the axis the normal lies on
    pub fn axis(&self) -> usize {
        if self.normal.x != 0.0 {
            0
        } else if self.normal.y != 0.0 {
            1
        } else {
            2
        }
    }
}

/// Minimum and maximum corners of a body's box
pub fn min_max(body: &Body) -> (Vec3, Vec3) {
    let aabb = body.aabb();
    (aabb.min(), aabb.max())
}

/// Minkowski difference of two boxes
///
/// The two boxes overlap exactly when the origin lies inside the result.
pub fn minkowski_difference(a: &Body, b: &Body) -> Aabb {
    Aabb::new(a.position - b.position, a.half_extents() + b.half_extents())
}

/// Whether two bodies interpenetrate (touching faces do not count)
pub fn overlaps(a: &Body, b: &Body) -> bool {
    minkowski_difference(a, b).contains_strict(Vec3::ZERO)
}

/// Half-extents of the box spanning `vertices`, scaled per axis
///
/// Fewer than two vertices give a zero-size box. Scale signs are ignored so
/// a mirrored primitive keeps a valid box.
pub fn bounds_from_vertices(vertices: &[Vec3], scale: Vec3) -> Vec3 {
    if vertices.len() < 2 {
        return Vec3::ZERO;
    }

    let (min, max) = vertices.iter().fold(
        (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
        |(min, max), v| (min.min_components(*v), max.max_components(*v)),
    );

    ((max - min) * 0.5).component_mul(scale.abs())
}

/// Shallowest way out of `target` for a point strictly inside it
///
/// Returns the outward normal of the nearest face and the distance to it.
/// All three axes are considered whether or not anything moves along them;
/// on equal depths the earlier axis wins. Points on or outside the boundary
/// give `None`.
pub fn penetration(point: Vec3, target: &Aabb) -> Option<(Vec3, f32)> {
    if !target.contains_strict(point) {
        return None;
    }

    let offset = point - target.center;
    let mut best: Option<(usize, f32)> = None;
    for i in 0..3 {
        let depth = target.half_extents.axis(i) - offset.axis(i).abs();
        if best.map_or(true, |(_, d)| depth < d) {
            best = Some((i, depth));
        }
    }

    let (axis, depth) = best?;
    let side = if offset.axis(axis) >= 0.0 { 1.0 } else { -1.0 };
    Some((Vec3::unit_axis(axis, side), depth))
}

/// Slab test of the segment `origin .. origin + displacement` against `target`
///
/// Returns `None` when the segment misses the box within this tick. Axes with
/// no motion only pass when the origin is strictly between the slabs. The
/// normal comes from the axis with the latest entry time; on ties the axis
/// evaluated first (x, then y, then z) is kept.
///
/// An origin already inside the box is judged by [`penetration`]: motion
/// deeper along the shallowest axis is blocked at time 0 with that axis'
/// normal, anything else passes.
pub fn ray_intersects_aabb(origin: Vec3, displacement: Vec3, target: &Aabb) -> Option<Hit> {
    if let Some((normal, _)) = penetration(origin, target) {
        if displacement.dot(normal) < 0.0 {
            return Some(Hit { time: 0.0, position: origin, normal });
        }
        return None;
    }

    let (min, max) = (target.min(), target.max());

    let mut last_entry = f32::NEG_INFINITY;
    let mut first_exit = f32::INFINITY;
    let mut binding_axis = None;

    for i in 0..3 {
        let o = origin.axis(i);
        let d = displacement.axis(i);

        if d.abs() > PARALLEL_EPSILON {
            let t1 = (min.axis(i) - o) / d;
            let t2 = (max.axis(i) - o) / d;
            let near = t1.min(t2);
            let far = t1.max(t2);

            if binding_axis.is_none() || near > last_entry {
                last_entry = near;
                binding_axis = Some(i);
            }
            first_exit = first_exit.min(far);
        } else if o <= min.axis(i) || o >= max.axis(i) {
            return None;
        }
    }

    // No motion on any axis: nothing to sweep
    let axis = binding_axis?;

    if !(last_entry <= first_exit && first_exit >= 0.0 && last_entry <= 1.0) {
        return None;
    }

    let side = if origin.axis(axis) - target.center.axis(axis) >= 0.0 { 1.0 } else { -1.0 };

    // On the boundary and leaving
    if last_entry < 0.0 && displacement.axis(axis) * side >= 0.0 {
        return None;
    }

    let time = last_entry.max(0.0);
    Some(Hit {
        time,
        position: origin + displacement * time,
        normal: Vec3::unit_axis(axis, side),
    })
}
