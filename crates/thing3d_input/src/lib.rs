//! Input handling for thing3d
//!
//! This crate turns raw winit keyboard and mouse events into named actions,
//! and actions into player body velocity.

mod action;
mod bindings;
mod player_controller;

pub use action::Action;
pub use bindings::{Binding, InputSource, KeyBindings, Trigger};
pub use player_controller::{PlayerController, DEFAULT_JUMP_VELOCITY, DEFAULT_MOVE_SPEED};
