//! Rendering system
//!
//! Owns the render dispatcher and viewport, and builds the per-frame
//! matrices from the camera. [`HeadlessBackend`] stands in for a graphics
//! API when running without a window.

use std::collections::HashMap;
use thing3d_core::{ModelKey, ModelStore, RenderKind, Things};
use thing3d_render::{
    camera::Camera,
    dispatch::{DrawCall, FrameStats, RenderBackend, RenderDispatcher, RenderError, RenderMatrices},
};

/// Drives the dispatcher once per frame
pub struct RenderSystem<B: RenderBackend> {
    dispatcher: RenderDispatcher<B>,
    aspect: f32,
}

impl<B: RenderBackend> RenderSystem<B> {
    pub fn new(backend: B, aspect: f32) -> Self {
        Self {
            dispatcher: RenderDispatcher::new(backend),
            aspect,
        }
    }

    /// Update the viewport size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn dispatcher(&self) -> &RenderDispatcher<B> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut RenderDispatcher<B> {
        &mut self.dispatcher
    }

    /// Matrices for the current camera and viewport
    pub fn matrices(&self, camera: &Camera) -> RenderMatrices {
        RenderMatrices {
            view: camera.view(),
            projection: camera.projection(self.aspect),
        }
    }

    /// Draw every Thing from the camera's point of view
    pub fn render(&mut self, things: &Things, camera: &Camera) -> FrameStats {
        let matrices = self.matrices(camera);
        self.dispatcher.render_frame(things, &matrices)
    }
}

/// Vertex count prepared for one render kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessHandles {
    pub vertex_count: usize,
}

/// Backend that records draws without a GPU
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    model_vertices: HashMap<ModelKey, usize>,
    draw_count: u64,
    vertices_submitted: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the store's models drawable
    pub fn register_models(&mut self, models: &ModelStore) {
        for (key, model) in models.iter() {
            self.model_vertices.insert(key, model.vertex_count());
        }
    }

    /// Draws issued so far
    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    /// Vertices submitted so far
    pub fn vertices_submitted(&self) -> u64 {
        self.vertices_submitted
    }
}

impl RenderBackend for HeadlessBackend {
    type Handles = HeadlessHandles;

    fn init(&mut self, kind: &RenderKind) -> Result<HeadlessHandles, RenderError> {
        let vertex_count = match kind {
            RenderKind::Model(key) => *self.model_vertices.get(key).ok_or_else(|| RenderError::InitFailed {
                kind: *kind,
                reason: "model not registered".to_string(),
            })?,
            primitive => thing3d_core::primitives::vertices(primitive).map_or(0, |v| v.len()),
        };
        log::debug!("Prepared {:?} with {} vertices", kind, vertex_count);
        Ok(HeadlessHandles { vertex_count })
    }

    fn draw(&mut self, call: DrawCall<'_, HeadlessHandles>) {
        log::trace!(
            "Draw {:?} at {:?} color {:?}",
            call.kind,
            call.body.position,
            call.data.color
        );
        self.draw_count += 1;
        self.vertices_submitted += call.handles.vertex_count as u64;
    }
}
