//! Game simulation system
//!
//! Manages the frame loop timing:
//! - Delta time calculation
//! - Handing each frame to the engine

use std::time::Instant;
use thing3d_render::RenderBackend;

use crate::engine::{Engine, TickReport};

/// Default cap on a single frame's dt in seconds
pub const DEFAULT_MAX_FRAME_TIME: f32 = 0.25;

/// Measures frame time and drives [`Engine::tick`]
pub struct SimulationSystem {
    last_frame: Instant,
    max_frame_time: f32,
    fixed_dt: Option<f32>,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
            fixed_dt: None,
        }
    }

    /// Builder: set the dt cap
    pub fn with_max_frame_time(mut self, max_frame_time: f32) -> Self {
        self.max_frame_time = max_frame_time.max(0.0);
        self
    }

    /// Builder: use a constant dt instead of wall-clock time
    pub fn with_fixed_dt(mut self, dt: Option<f32>) -> Self {
        self.fixed_dt = dt;
        self
    }

    /// Seconds since the previous call, capped at `max_frame_time`
    pub fn frame_dt(&mut self) -> f32 {
        let now = Instant::now();
        let raw_dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        // Cap dt so a stall (first frame, window drag) doesn't launch bodies
        // through thin colliders in one giant step
        self.fixed_dt.unwrap_or(raw_dt).min(self.max_frame_time)
    }

    /// Run one frame
    pub fn update<B: RenderBackend>(&mut self, engine: &mut Engine<B>) -> TickReport {
        let dt = self.frame_dt();
        engine.tick(dt)
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new()
    }
}
