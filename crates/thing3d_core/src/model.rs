//! Imported models and their storage
//!
//! Vertex data comes from an external importer; this module only keeps the
//! positions needed to size a model's bounding box.

use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use thing3d_math::Vec3;
use thing3d_physics::bounds_from_vertices;

new_key_type! {
    /// Generational key of a model in a [`ModelStore`]
    pub struct ModelKey;
}

/// Vertex positions of one mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
}

impl MeshData {
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }
}

/// A model made of one or more meshes
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub meshes: Vec<MeshData>,
}

impl Model {
    /// Create a model from its meshes
    pub fn new(meshes: Vec<MeshData>) -> Self {
        Self { meshes }
    }

    /// Total number of vertices across all meshes
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }

    /// Half-extents of the box around every mesh vertex, scaled per axis
    pub fn half_extents(&self, scale: Vec3) -> Vec3 {
        let all: Vec<Vec3> = self.meshes.iter().flat_map(|m| m.positions.iter().copied()).collect();
        bounds_from_vertices(&all, scale)
    }
}

/// Storage for loaded models, addressable by key or by name
#[derive(Default)]
pub struct ModelStore {
    models: SlotMap<ModelKey, Model>,
    names: HashMap<String, ModelKey>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a model under a name, replacing the name's previous binding
    pub fn insert(&mut self, name: impl Into<String>, model: Model) -> ModelKey {
        let name = name.into();
        let key = self.models.insert(model);
        if let Some(old) = self.names.insert(name.clone(), key) {
            self.models.remove(old);
            log::debug!("Replaced model '{}'", name);
        }
        key
    }

    /// Remove a model and any name bound to it
    pub fn remove(&mut self, key: ModelKey) -> Option<Model> {
        self.names.retain(|_, k| *k != key);
        self.models.remove(key)
    }

    pub fn get(&self, key: ModelKey) -> Option<&Model> {
        self.models.get(key)
    }

    /// Look up a model key by name
    pub fn key_by_name(&self, name: &str) -> Option<ModelKey> {
        self.names.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterate over all models with their keys
    pub fn iter(&self) -> impl Iterator<Item = (ModelKey, &Model)> {
        self.models.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_mesh_model() -> Model {
        Model::new(vec![
            MeshData::new(vec![Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0)]),
            MeshData::new(vec![Vec3::new(0.0, -1.0, 2.0)]),
        ])
    }

    #[test]
    fn test_half_extents_span_all_meshes() {
        let model = two_mesh_model();
        assert_eq!(model.vertex_count(), 3);
        assert_eq!(model.half_extents(Vec3::ONE), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(model.half_extents(Vec3::new(2.0, 1.0, 0.5)), Vec3::new(2.0, 1.0, 0.5));
    }

    #[test]
    fn test_empty_model_is_degenerate() {
        assert_eq!(Model::default().half_extents(Vec3::ONE), Vec3::ZERO);
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = ModelStore::new();
        let key = store.insert("backpack", two_mesh_model());

        assert_eq!(store.len(), 1);
        assert_eq!(store.key_by_name("backpack"), Some(key));
        assert_eq!(store.get(key).map(Model::vertex_count), Some(3));
        assert!(store.key_by_name("missing").is_none());
    }

    #[test]
    fn test_store_rebinding_name_drops_old_model() {
        let mut store = ModelStore::new();
        let old = store.insert("m", Model::default());
        let new = store.insert("m", two_mesh_model());

        assert_eq!(store.len(), 1);
        assert!(store.get(old).is_none());
        assert_eq!(store.key_by_name("m"), Some(new));
    }

    #[test]
    fn test_store_remove() {
        let mut store = ModelStore::new();
        let key = store.insert("m", Model::default());
        assert!(store.remove(key).is_some());
        assert!(store.is_empty());
        assert!(store.key_by_name("m").is_none());
        assert!(store.get(key).is_none());
    }
}
