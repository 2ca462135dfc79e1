//! thing3d application library
//!
//! Configuration loading, the frame-loop systems and the [`Engine`] context
//! that ties the registry, physics, input and rendering crates together.

pub mod config;
pub mod engine;
pub mod systems;

pub use engine::{Engine, TickReport};
