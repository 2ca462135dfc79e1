//! Render dispatch
//!
//! Graphics APIs stay behind [`RenderBackend`]. The dispatcher asks the
//! backend to set up each [`RenderKind`] once, caches whatever handles it
//! returns, and issues one draw per Thing each frame.

use bytemuck::{Pod, Zeroable};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thing3d_core::{Body, RenderData, RenderKind, Things};
use thing3d_math::{mat4, Mat4, Vec3};

/// View and projection matrices shared by every draw in a frame
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct RenderMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for RenderMatrices {
    fn default() -> Self {
        Self {
            view: mat4::IDENTITY,
            projection: mat4::IDENTITY,
        }
    }
}

/// Model matrix for a body: translate, rotate about X then Y, then scale
///
/// Body rotation is in degrees. Z rotation is not applied.
pub fn model_matrix(body: &Body, scale: Vec3) -> Mat4 {
    let translate = mat4::translation(body.position);
    let rot_x = mat4::axis_rotation(0, body.rotation.x.to_radians());
    let rot_y = mat4::axis_rotation(1, body.rotation.y.to_radians());

    mat4::mul(mat4::mul(mat4::mul(translate, rot_x), rot_y), mat4::scale(scale))
}

/// Everything a backend needs to draw one Thing
pub struct DrawCall<'a, H> {
    pub kind: RenderKind,
    pub data: &'a RenderData,
    pub body: &'a Body,
    /// Precomputed model matrix
    pub model: Mat4,
    pub handles: &'a H,
    pub matrices: &'a RenderMatrices,
}

/// Error type for render backends
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Backend could not prepare resources for a kind
    InitFailed { kind: RenderKind, reason: String },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InitFailed { kind, reason } => {
                write!(f, "Failed to initialize {:?}: {}", kind, reason)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// A graphics backend able to draw every [`RenderKind`]
pub trait RenderBackend {
    /// Per-kind resources (buffers, shaders, ...) created by `init`
    type Handles;

    /// Create resources for a kind; called at most once per kind on success
    fn init(&mut self, kind: &RenderKind) -> Result<Self::Handles, RenderError>;

    /// Draw one Thing
    fn draw(&mut self, call: DrawCall<'_, Self::Handles>);
}

/// Counts from one [`RenderDispatcher::render_frame`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub skipped: usize,
}

/// Draws every Thing through a backend, initializing kinds lazily
pub struct RenderDispatcher<B: RenderBackend> {
    backend: B,
    handles: HashMap<RenderKind, B::Handles>,
    failed: HashSet<RenderKind>,
}

impl<B: RenderBackend> RenderDispatcher<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            handles: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Whether `kind` has been set up
    pub fn is_initialized(&self, kind: &RenderKind) -> bool {
        self.handles.contains_key(kind)
    }

    /// Number of kinds set up so far
    pub fn initialized_count(&self) -> usize {
        self.handles.len()
    }

    /// Whether `kind` failed to initialize and has not succeeded since
    pub fn has_failed(&self, kind: &RenderKind) -> bool {
        self.failed.contains(kind)
    }

    /// Drop cached handles, forcing re-initialization on next use
    pub fn clear_cache(&mut self) {
        self.handles.clear();
        self.failed.clear();
    }

    /// Draw every Thing in the registry
    ///
    /// A Thing whose kind fails to initialize is skipped this frame; its kind
    /// is retried next frame. Only the first failure of a kind is logged as
    /// an error.
    pub fn render_frame(&mut self, things: &Things, matrices: &RenderMatrices) -> FrameStats {
        let mut stats = FrameStats::default();

        for (id, thing) in things.iter() {
            if !self.handles.contains_key(&thing.render) {
                match self.backend.init(&thing.render) {
                    Ok(h) => {
                        log::debug!("Initialized render kind {:?}", thing.render);
                        self.failed.remove(&thing.render);
                        self.handles.insert(thing.render, h);
                    }
                    Err(e) => {
                        if self.failed.insert(thing.render) {
                            log::error!("Skipping thing {}: {}", id, e);
                        } else {
                            log::debug!("Skipping thing {}: {}", id, e);
                        }
                        stats.skipped += 1;
                        continue;
                    }
                }
            }

            let Some(handles) = self.handles.get(&thing.render) else {
                continue;
            };
            self.backend.draw(DrawCall {
                kind: thing.render,
                data: &thing.data,
                body: &thing.body,
                model: model_matrix(&thing.body, thing.scale),
                handles,
                matrices,
            });
            stats.drawn += 1;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thing3d_core::{ModelKey, Thing};

    const EPSILON: f32 = 0.0001;

    /// Records calls instead of drawing
    #[derive(Default)]
    struct RecordingBackend {
        inits: Vec<RenderKind>,
        draws: Vec<(RenderKind, u32, Vec3)>,
        fail_cubes: bool,
        next_handle: u32,
    }

    impl RenderBackend for RecordingBackend {
        type Handles = u32;

        fn init(&mut self, kind: &RenderKind) -> Result<u32, RenderError> {
            if self.fail_cubes && *kind == RenderKind::Cube {
                return Err(RenderError::InitFailed { kind: *kind, reason: "no shader".into() });
            }
            self.inits.push(*kind);
            self.next_handle += 1;
            Ok(self.next_handle)
        }

        fn draw(&mut self, call: DrawCall<'_, u32>) {
            let origin = mat4::transform_point(call.model, Vec3::ZERO);
            self.draws.push((call.kind, *call.handles, origin));
        }
    }

    fn thing(kind: RenderKind, x: f32) -> Thing {
        Thing::new(Body::new_static(Vec3::new(x, 0.0, 0.0), Vec3::ONE), kind)
    }

    #[test]
    fn test_each_kind_initialized_once() {
        let mut things = Things::new();
        for i in 0..3 {
            things.add(thing(RenderKind::Triangle, i as f32)).unwrap();
            things.add(thing(RenderKind::Square, i as f32)).unwrap();
        }

        let mut dispatcher = RenderDispatcher::new(RecordingBackend::default());
        let matrices = RenderMatrices::default();
        for _ in 0..5 {
            let stats = dispatcher.render_frame(&things, &matrices);
            assert_eq!(stats, FrameStats { drawn: 6, skipped: 0 });
        }

        let backend = dispatcher.backend();
        assert_eq!(backend.inits.len(), 2);
        assert_eq!(backend.draws.len(), 30);
        assert_eq!(dispatcher.initialized_count(), 2);
    }

    #[test]
    fn test_draws_receive_cached_handles() {
        let mut things = Things::new();
        things.add(thing(RenderKind::Square, 0.0)).unwrap();
        things.add(thing(RenderKind::Square, 2.0)).unwrap();

        let mut dispatcher = RenderDispatcher::new(RecordingBackend::default());
        dispatcher.render_frame(&things, &RenderMatrices::default());

        let draws = &dispatcher.backend().draws;
        assert!(draws.iter().all(|(kind, handle, _)| *kind == RenderKind::Square && *handle == 1));
    }

    #[test]
    fn test_failed_init_skips_and_retries() {
        let mut things = Things::new();
        things.add(thing(RenderKind::Cube, 0.0)).unwrap();
        things.add(thing(RenderKind::Triangle, 0.0)).unwrap();

        let backend = RecordingBackend { fail_cubes: true, ..Default::default() };
        let mut dispatcher = RenderDispatcher::new(backend);

        let stats = dispatcher.render_frame(&things, &RenderMatrices::default());
        assert_eq!(stats, FrameStats { drawn: 1, skipped: 1 });
        assert!(!dispatcher.is_initialized(&RenderKind::Cube));
        assert!(dispatcher.has_failed(&RenderKind::Cube));
        assert!(!dispatcher.has_failed(&RenderKind::Triangle));

        dispatcher.backend_mut().fail_cubes = false;
        let stats = dispatcher.render_frame(&things, &RenderMatrices::default());
        assert_eq!(stats, FrameStats { drawn: 2, skipped: 0 });
        assert!(dispatcher.is_initialized(&RenderKind::Cube));
        assert!(!dispatcher.has_failed(&RenderKind::Cube));
    }

    #[test]
    fn test_repeated_failures_tracked_once_per_kind() {
        let mut things = Things::new();
        for i in 0..4 {
            things.add(thing(RenderKind::Cube, i as f32)).unwrap();
        }

        let backend = RecordingBackend { fail_cubes: true, ..Default::default() };
        let mut dispatcher = RenderDispatcher::new(backend);
        for _ in 0..3 {
            let stats = dispatcher.render_frame(&things, &RenderMatrices::default());
            assert_eq!(stats, FrameStats { drawn: 0, skipped: 4 });
        }
        assert!(dispatcher.has_failed(&RenderKind::Cube));
        assert_eq!(dispatcher.failed.len(), 1);

        dispatcher.clear_cache();
        assert!(!dispatcher.has_failed(&RenderKind::Cube));
    }

    #[test]
    fn test_models_are_separate_kinds() {
        let mut things = Things::new();
        let a = ModelKey::default();
        things.add(thing(RenderKind::Model(a), 0.0)).unwrap();
        things.add(thing(RenderKind::Model(a), 1.0)).unwrap();

        let mut dispatcher = RenderDispatcher::new(RecordingBackend::default());
        dispatcher.render_frame(&things, &RenderMatrices::default());
        assert_eq!(dispatcher.backend().inits, vec![RenderKind::Model(a)]);

        dispatcher.clear_cache();
        dispatcher.render_frame(&things, &RenderMatrices::default());
        assert_eq!(dispatcher.backend().inits.len(), 2);
    }

    #[test]
    fn test_model_matrix_places_body() {
        let body = Body::new_static(Vec3::new(1.0, 2.0, 3.0), Vec3::ONE).with_rotation(Vec3::new(0.0, 90.0, 0.0));
        let m = model_matrix(&body, Vec3::new(2.0, 1.0, 1.0));

        assert!((mat4::transform_point(m, Vec3::ZERO) - Vec3::new(1.0, 2.0, 3.0)).length() < EPSILON);
        // Scaled to 2 on X, then a quarter turn about Y sends +X to -Z
        let tip = mat4::transform_point(m, Vec3::X);
        assert!((tip - Vec3::new(1.0, 2.0, 1.0)).length() < EPSILON);
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::InitFailed { kind: RenderKind::Cube, reason: "oops".into() };
        assert_eq!(err.to_string(), "Failed to initialize Cube: oops");
    }
}
