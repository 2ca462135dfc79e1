//! Core types for the thing3d engine
//!
//! This crate provides the object model the frame loop drives:
//!
//! - [`Thing`] - A physics body plus what it is drawn as
//! - [`Things`] - Registry of live Things with 16-bit ids and a pending queue
//! - [`RenderKind`] - Closed set of drawable kinds
//! - [`ModelStore`] - Imported models addressed by [`ModelKey`]
//! - [`SceneTemplate`] - Loadable/saveable scene of Thing templates
//! - [`primitives`] - Built-in triangle, square and cube geometry

mod thing;
mod model;
mod registry;
mod scene;
pub mod primitives;

pub use thing::{RenderData, RenderKind, Thing, ThingId};
pub use model::{MeshData, Model, ModelKey, ModelStore};
pub use registry::{Applied, PendingOp, RegistryError, RegistryResult, Things, ID_SPACE};
pub use scene::{RenderTemplate, SceneError, SceneTemplate, ThingTemplate};

// Re-export physics types for convenient access through thing3d_core
pub use thing3d_physics::{Body, BodyStore, PhysicsCategory, PhysicsConfig, PhysicsEvent, PhysicsWorld};
pub use thing3d_math::Vec3;
