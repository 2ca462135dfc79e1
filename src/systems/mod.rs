//! Application systems
//!
//! Frame timing and rendering, kept out of main.rs so they can be tested
//! without a window.

mod render;
mod simulation;

pub use render::{HeadlessBackend, HeadlessHandles, RenderSystem};
pub use simulation::{SimulationSystem, DEFAULT_MAX_FRAME_TIME};
