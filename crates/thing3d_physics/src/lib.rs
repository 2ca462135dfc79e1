//! Swept-AABB physics for thing3d
//!
//! This crate provides:
//! - Axis-aligned boxes, Minkowski overlap and the ray/box slab test
//! - The `Body` data model (static, dynamic, trigger)
//! - A per-tick update that sweeps dynamic bodies and resolves hits
//! - The `BodyStore` trait the update reads bodies through

pub mod aabb;
pub mod body;
pub mod store;
pub mod world;

// Re-export commonly used types
pub use aabb::{bounds_from_vertices, min_max, minkowski_difference, overlaps, penetration, ray_intersects_aabb, Aabb, Hit, PARALLEL_EPSILON};
pub use body::{Body, PhysicsCategory};
pub use store::BodyStore;
pub use world::{sweep, PhysicsConfig, PhysicsEvent, PhysicsWorld, CONTACT_EPSILON, DEFAULT_GRAVITY};
