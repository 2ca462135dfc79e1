//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`T3D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use thing3d_physics::PhysicsConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsSection,
    /// Frame loop configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`T3D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    ///
    /// Missing files are skipped; an empty directory yields the defaults
    /// plus any environment overrides.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        } else {
            log::warn!("No default config at {}", default_path.display());
        }

        if user_path.exists() {
            log::debug!("Applying user config from {}", user_path.display());
            figment = figment.merge(Toml::file(&user_path));
        }

        // T3D_PHYSICS__GRAVITY=20 -> physics.gravity = 20.0
        figment = figment.merge(Env::prefixed("T3D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "thing3d".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl WindowConfig {
    /// Width over height, as used for the projection matrix
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position [x, y, z]
    pub start_position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Degrees of rotation per pixel of mouse movement
    pub sensitivity: f32,
    /// Follow the player body each frame
    pub follow_player: bool,
    /// Eye height above the player's centre
    pub eye_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 1.0, 3.0],
            fov: 45.0,
            sensitivity: 0.1,
            follow_player: true,
            eye_height: 0.6,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Horizontal movement speed (units per second)
    pub move_speed: f32,
    /// Upward speed given by a jump
    pub jump_velocity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            move_speed: thing3d_input::DEFAULT_MOVE_SPEED,
            jump_velocity: thing3d_input::DEFAULT_JUMP_VELOCITY,
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSection {
    /// Gravity magnitude, applied along -Y
    pub gravity: f32,
    /// Gap left between a body and what it hit
    pub contact_epsilon: f32,
    /// Sweeps per body per tick
    pub max_slide_iterations: u32,
    /// How far below a grounded body to look for support
    pub ground_probe_distance: f32,
}

impl Default for PhysicsSection {
    fn default() -> Self {
        let defaults = PhysicsConfig::default();
        Self {
            gravity: defaults.gravity,
            contact_epsilon: defaults.contact_epsilon,
            max_slide_iterations: defaults.max_slide_iterations,
            ground_probe_distance: defaults.ground_probe_distance,
        }
    }
}

impl PhysicsSection {
    /// Build the physics world configuration
    pub fn to_physics_config(&self) -> PhysicsConfig {
        PhysicsConfig::new(self.gravity)
            .with_contact_epsilon(self.contact_epsilon)
            .with_max_slide_iterations(self.max_slide_iterations)
            .with_ground_probe_distance(self.ground_probe_distance)
    }
}

/// Frame loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Upper bound on a frame's dt in seconds
    pub max_frame_time: f32,
    /// Use this dt instead of wall-clock time (headless runs)
    pub fixed_dt: Option<f32>,
    /// Ticks to run in headless mode
    pub headless_ticks: u32,
    /// Scene file loaded at startup
    pub scene: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_frame_time: 0.25,
            fixed_dt: None,
            headless_ticks: 300,
            scene: "scenes/demo.ron".to_string(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level used when `RUST_LOG` is unset (error, warn, info, debug, trace)
    pub log_level: String,
    /// Log every body's position every this many ticks (0 disables)
    pub log_interval: u32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_interval: 60,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
