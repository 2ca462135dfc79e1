//! Scene serialization
//!
//! Provides SceneTemplate for loading/saving scenes from RON files.
//! Scenes contain Thing templates, physics settings, and player spawn info.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::model::ModelStore;
use crate::primitives::render_bounds;
use crate::registry::{RegistryError, Things};
use crate::thing::{RenderData, RenderKind, Thing, ThingId};
use thing3d_math::Vec3;
use thing3d_physics::{Body, PhysicsCategory};

/// Serializable render kind; models are referenced by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderTemplate {
    Triangle,
    Square,
    Cube,
    Model { name: String },
}

impl RenderTemplate {
    /// Resolve to a render kind, looking models up by name
    pub fn resolve(&self, models: &ModelStore) -> Result<RenderKind, SceneError> {
        match self {
            RenderTemplate::Triangle => Ok(RenderKind::Triangle),
            RenderTemplate::Square => Ok(RenderKind::Square),
            RenderTemplate::Cube => Ok(RenderKind::Cube),
            RenderTemplate::Model { name } => models
                .key_by_name(name)
                .map(RenderKind::Model)
                .ok_or_else(|| SceneError::UnknownModel(name.clone())),
        }
    }
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

/// Serializable description of one Thing
///
/// When `half_extents` is omitted the box is sized from the render kind's
/// vertices at `scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThingTemplate {
    /// Optional name for this Thing (for lookup)
    #[serde(default)]
    pub name: Option<String>,
    pub render: RenderTemplate,
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub category: PhysicsCategory,
    #[serde(default)]
    pub velocity: Vec3,
    #[serde(default)]
    pub half_extents: Option<Vec3>,
    #[serde(default)]
    pub data: RenderData,
}

impl ThingTemplate {
    /// Create a new Thing template
    pub fn new(render: RenderTemplate, position: Vec3, category: PhysicsCategory) -> Self {
        Self {
            name: None,
            render,
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            category,
            velocity: Vec3::ZERO,
            half_extents: None,
            data: RenderData::default(),
        }
    }

    /// Set the name of this template
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the render scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Override the collision box
    pub fn with_half_extents(mut self, half_extents: Vec3) -> Self {
        self.half_extents = Some(half_extents);
        self
    }

    /// Build the Thing this template describes
    pub fn to_thing(&self, models: &ModelStore) -> Result<Thing, SceneError> {
        let render = self.render.resolve(models)?;
        let half_extents = self
            .half_extents
            .unwrap_or_else(|| render_bounds(&render, self.scale, models));

        let body = Body::new(self.position, half_extents, self.category)
            .with_rotation(self.rotation)
            .with_velocity(self.velocity);

        let mut thing = Thing::new(body, render).with_data(self.data).with_scale(self.scale);
        if let Some(ref name) = self.name {
            thing = thing.with_name(name.clone());
        }
        Ok(thing)
    }
}

/// A serializable scene containing Thing templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTemplate {
    /// Scene name (for display/debugging)
    pub name: String,
    /// Thing templates in this scene
    #[serde(default)]
    pub things: Vec<ThingTemplate>,
    /// Gravity magnitude override for physics
    #[serde(default)]
    pub gravity: Option<f32>,
    /// Player spawn position
    #[serde(default)]
    pub player_spawn: Option<Vec3>,
}

impl SceneTemplate {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            things: Vec::new(),
            gravity: None,
            player_spawn: None,
        }
    }

    /// Parse a scene from RON text
    pub fn from_ron(contents: &str) -> Result<Self, SceneError> {
        Ok(ron::from_str(contents)?)
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let scene = Self::from_ron(&contents)?;
        log::info!("Loaded scene '{}' from {} ({} things)", scene.name, path.display(), scene.things.len());
        Ok(scene)
    }

    /// Serialize to pretty-printed RON
    pub fn to_ron(&self) -> Result<String, SceneError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Add a Thing template to this scene
    pub fn add_thing(&mut self, thing: ThingTemplate) {
        self.things.push(thing);
    }

    /// Set the gravity for this scene
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    /// Set the player spawn position
    pub fn with_player_spawn(mut self, spawn: Vec3) -> Self {
        self.player_spawn = Some(spawn);
        self
    }

    /// Add every Thing in the scene to the registry
    ///
    /// All templates are resolved before anything is added, so an unknown
    /// model leaves the registry untouched.
    pub fn instantiate(&self, things: &mut Things, models: &ModelStore) -> Result<Vec<ThingId>, SceneError> {
        let built = self
            .things
            .iter()
            .map(|t| t.to_thing(models))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ids = Vec::with_capacity(built.len());
        for thing in built {
            ids.push(things.add(thing)?);
        }
        log::info!("Instantiated scene '{}' with {} things", self.name, ids.len());
        Ok(ids)
    }
}

/// Error type for scene operations
#[derive(Debug)]
pub enum SceneError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Serialization error
    Serialize(ron::Error),
    /// The registry refused a Thing
    Registry(RegistryError),
    /// A template names a model that isn't loaded
    UnknownModel(String),
}

impl From<io::Error> for SceneError {
    fn from(e: io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::Parse(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::Serialize(e)
    }
}

impl From<RegistryError> for SceneError {
    fn from(e: RegistryError) -> Self {
        SceneError::Registry(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneError::Serialize(e) => write!(f, "Serialize error: {}", e),
            SceneError::Registry(e) => write!(f, "Registry error: {}", e),
            SceneError::UnknownModel(name) => write!(f, "Unknown model: {}", name),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Io(e) => Some(e),
            SceneError::Parse(e) => Some(e),
            SceneError::Serialize(e) => Some(e),
            SceneError::Registry(e) => Some(e),
            SceneError::UnknownModel(_) => None,
        }
    }
}
