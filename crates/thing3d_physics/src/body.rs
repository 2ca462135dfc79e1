//! Body types for swept-AABB physics

use crate::aabb::Aabb;
use serde::{Deserialize, Serialize};
use thing3d_math::Vec3;

/// How the physics loop treats a body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicsCategory {
    /// Never moves; blocks dynamic bodies
    #[default]
    Static,
    /// Integrated every tick, affected by gravity, swept against everything else
    Dynamic,
    /// Never moves and never blocks; reports overlaps with dynamic bodies
    Trigger,
}

/// Physical state of one entity
///
/// The collision volume is always the axis-aligned box
/// `[position - half_extents, position + half_extents]`; `rotation` is
/// carried for rendering only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// World-space centre
    pub position: Vec3,
    /// Euler angles in degrees (render only)
    pub rotation: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Physics category (static, dynamic, trigger)
    pub category: PhysicsCategory,
    /// Set when a vertical collision zeroed downward velocity
    pub grounded: bool,
    half_extents: Vec3,
}

impl Body {
    /// Create a body of the given category
    ///
    /// Negative or non-finite half-extent components are clamped to zero.
    pub fn new(position: Vec3, half_extents: Vec3, category: PhysicsCategory) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            velocity: Vec3::ZERO,
            category,
            grounded: false,
            half_extents: sanitize_extents(half_extents),
        }
    }

    /// Create a dynamic body
    pub fn new_dynamic(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(position, half_extents, PhysicsCategory::Dynamic)
    }

    /// Create a static body that doesn't move
    pub fn new_static(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(position, half_extents, PhysicsCategory::Static)
    }

    /// Create a trigger volume
    pub fn new_trigger(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(position, half_extents, PhysicsCategory::Trigger)
    }

    /// Set the velocity of this body
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the Euler rotation (degrees) of this body
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the grounded flag of this body
    pub fn with_grounded(mut self, grounded: bool) -> Self {
        self.grounded = grounded;
        self
    }

    /// Half-size of the bounding box along each axis (always >= 0)
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// Replace the half-extents, clamping invalid components to zero
    pub fn set_half_extents(&mut self, half_extents: Vec3) {
        self.half_extents = sanitize_extents(half_extents);
    }

    /// Whether physics integration and gravity apply
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.category == PhysicsCategory::Dynamic
    }

    /// Whether this body is a non-blocking trigger volume
    #[inline]
    pub fn is_trigger(&self) -> bool {
        self.category == PhysicsCategory::Trigger
    }

    /// A box with no extent on any axis never collides
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.half_extents == Vec3::ZERO
    }

    /// The body's bounding box
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }
}

fn sanitize_extents(v: Vec3) -> Vec3 {
    let fix = |c: f32| if c.is_finite() && c > 0.0 { c } else { 0.0 };
    Vec3::new(fix(v.x), fix(v.y), fix(v.z))
}
