//! Rendering interface for thing3d
//!
//! This crate holds everything between the Thing registry and a graphics
//! API, without depending on one.
//!
//! ## Key Components
//!
//! - [`camera::Camera`] - First-person camera with view/projection matrices
//! - [`dispatch::RenderBackend`] - Trait a graphics API implements
//! - [`dispatch::RenderDispatcher`] - Per-kind lazy init and per-Thing draws

pub mod camera;
pub mod dispatch;

pub use camera::Camera;
pub use dispatch::{model_matrix, DrawCall, FrameStats, RenderBackend, RenderDispatcher, RenderError, RenderMatrices};

// Re-export core types for convenience
pub use thing3d_core::{RenderData, RenderKind, Thing, Things};
