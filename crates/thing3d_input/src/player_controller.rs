//! Player controller: active actions to body velocity
//!
//! Movement is planar. The camera's front and right vectors are flattened
//! onto XZ so looking up or down never changes walking speed. Vertical
//! velocity is left to gravity, except for jumps.

use crate::action::Action;
use thing3d_math::Vec3;
use thing3d_physics::Body;

/// Default horizontal speed in units per second
pub const DEFAULT_MOVE_SPEED: f32 = 6.0;
/// Default upward speed given by a jump
pub const DEFAULT_JUMP_VELOCITY: f32 = 5.0;

/// Drives a player body from input
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerController {
    pub move_speed: f32,
    pub jump_velocity: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerController {
    pub fn new() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            jump_velocity: DEFAULT_JUMP_VELOCITY,
        }
    }

    /// Builder: set movement speed
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Builder: set jump velocity
    pub fn with_jump_velocity(mut self, velocity: f32) -> Self {
        self.jump_velocity = velocity;
        self
    }

    /// Horizontal velocity for the given actions and camera basis
    pub fn wish_velocity(&self, actions: Action, front: Vec3, right: Vec3) -> Vec3 {
        let (fwd, rgt) = actions.movement_axes();
        let front = Vec3::new(front.x, 0.0, front.z).normalized();
        let right = Vec3::new(right.x, 0.0, right.z).normalized();

        (front * fwd + right * rgt).normalized() * self.move_speed
    }

    /// Write movement into `body` and start a jump if possible
    ///
    /// Horizontal velocity is replaced, so releasing all keys stops the body.
    /// Returns true if a jump started.
    pub fn apply(&self, actions: Action, front: Vec3, right: Vec3, body: &mut Body) -> bool {
        let wish = self.wish_velocity(actions, front, right);
        body.velocity.x = wish.x;
        body.velocity.z = wish.z;

        if actions.contains(Action::JUMP) && body.grounded {
            body.velocity.y = self.jump_velocity;
            body.grounded = false;
            log::debug!("Jump with velocity {}", self.jump_velocity);
            return true;
        }
        false
    }
}
