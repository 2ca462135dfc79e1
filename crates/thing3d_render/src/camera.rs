//! First-person perspective camera
//!
//! Yaw and pitch are in degrees. Yaw 0 looks down +X; pitch is clamped to
//! ±89° so the view never flips over the pole.

use thing3d_math::{mat4, Mat4, Vec3};

/// Near clip plane distance
pub const NEAR_PLANE: f32 = 0.1;
/// Far clip plane distance
pub const FAR_PLANE: f32 = 1000.0;
/// Pitch limit in degrees
pub const PITCH_LIMIT: f32 = 89.0;

/// Perspective camera driven by mouse look
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space eye position
    pub position: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Degrees of rotation per pixel of cursor movement
    pub sensitivity: f32,
    yaw: f32,
    pitch: f32,
    last_cursor: Option<(f64, f64)>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Create a camera at the default position
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 3.0),
            fov: 45.0,
            sensitivity: 0.1,
            yaw: 0.0,
            pitch: 0.0,
            last_cursor: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Turn by the given yaw and pitch deltas (degrees)
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Mouse look from an absolute cursor position
    ///
    /// The first sample after creation or [`reset_pan`](Self::reset_pan)
    /// only records the position, so capturing the cursor doesn't jerk the
    /// view. Moving the cursor up looks up.
    pub fn pan(&mut self, x: f64, y: f64) {
        let (last_x, last_y) = self.last_cursor.unwrap_or((x, y));
        self.last_cursor = Some((x, y));

        let x_offset = (x - last_x) as f32 * self.sensitivity;
        let y_offset = (last_y - y) as f32 * self.sensitivity;
        self.rotate(x_offset, y_offset);
    }

    /// Forget the last cursor sample
    pub fn reset_pan(&mut self) {
        self.last_cursor = None;
    }

    /// Unit view direction
    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalized()
    }

    /// Unit vector to the camera's right, always horizontal
    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalized()
    }

    /// Unit camera up vector
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.front()).normalized()
    }

    /// World-to-view matrix
    pub fn view(&self) -> Mat4 {
        mat4::look_at(self.position, self.position + self.front(), self.up())
    }

    /// Projection matrix for a viewport of the given width/height ratio
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            log::warn!("Invalid aspect ratio {}, using 1.0", aspect);
            1.0
        };
        mat4::perspective(self.fov.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }
}
