//! Thing and render kind types
//!
//! A Thing is one object in the world: a physics body plus what it looks like.

use crate::model::ModelKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use thing3d_math::Vec3;
use thing3d_physics::Body;

/// Registry-assigned identifier of a live Thing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThingId(pub u16);

impl ThingId {
    /// Get the raw id value
    #[inline]
    pub fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a Thing is drawn as
///
/// Independent of the body's physics category: a static square and a
/// dynamic square share the same render kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderKind {
    Triangle,
    Square,
    Cube,
    /// An imported model held in a [`ModelStore`](crate::ModelStore)
    Model(ModelKey),
}

/// Per-Thing render parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderData {
    /// Color as RGBA (each component 0.0-1.0)
    pub color: [f32; 4],
}

impl Default for RenderData {
    fn default() -> Self {
        Self::WHITE
    }
}

impl RenderData {
    /// Create render data with the given RGBA color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { color: [r, g, b, a] }
    }

    /// Opaque color
    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const WHITE: Self = Self { color: [1.0, 1.0, 1.0, 1.0] };
    pub const GRAY: Self = Self { color: [0.5, 0.5, 0.5, 1.0] };
    pub const BLUE: Self = Self { color: [0.0, 0.0, 1.0, 1.0] };
}

/// An object in the world
///
/// Each Thing has:
/// - A physics body (position, extents, velocity, category)
/// - A render kind and render data
/// - A render scale, used for the model matrix
/// - An optional name (for lookup)
/// - An id, set once the registry accepts it
#[derive(Clone, Debug, PartialEq)]
pub struct Thing {
    /// Optional name for this Thing (for lookup)
    pub name: Option<String>,
    /// Physics state
    pub body: Body,
    /// What to draw
    pub render: RenderKind,
    /// How to draw it
    pub data: RenderData,
    /// Per-axis render scale
    pub scale: Vec3,
    id: Option<ThingId>,
}

impl Thing {
    /// Create a new Thing from a body and render kind
    pub fn new(body: Body, render: RenderKind) -> Self {
        Self {
            name: None,
            body,
            render,
            data: RenderData::default(),
            scale: Vec3::ONE,
            id: None,
        }
    }

    /// Set the name of this Thing
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the render data
    pub fn with_data(mut self, data: RenderData) -> Self {
        self.data = data;
        self
    }

    /// Set the render scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Id assigned by the registry, or `None` if never added
    #[inline]
    pub fn id(&self) -> Option<ThingId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Option<ThingId>) {
        self.id = id;
    }
}
