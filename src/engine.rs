//! Engine context
//!
//! Everything one frame touches lives in [`Engine`]: the Thing registry,
//! the physics world, loaded models, the camera, input state and the render
//! system. A frame is [`Engine::tick`]:
//!
//! 1. Apply queued registry changes
//! 2. Turn active actions into player velocity
//! 3. Step physics over the registry
//! 4. Move the camera to the player
//! 5. Draw every Thing

use thing3d_core::{
    Body, ModelStore, PhysicsEvent, PhysicsWorld, RegistryError, RenderData, RenderKind, SceneError,
    SceneTemplate, Thing, ThingId, Things,
};
use thing3d_math::Vec3;
use thing3d_input::{Action, KeyBindings, PlayerController};
use thing3d_render::{Camera, FrameStats, RenderBackend};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::config::AppConfig;
use crate::systems::RenderSystem;

/// Name given to the Thing spawned at a scene's player spawn
pub const PLAYER_NAME: &str = "player";
/// Collision half-extents of the player body
pub const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(0.25, 0.9, 0.25);

/// What happened during one [`Engine::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub dt: f32,
    /// Queued registry changes applied (including failed ones)
    pub applied: usize,
    pub collisions: usize,
    pub triggers: usize,
    pub frame: FrameStats,
    pub paused: bool,
}

/// The running engine
pub struct Engine<B: RenderBackend> {
    pub things: Things,
    pub physics: PhysicsWorld<ThingId>,
    pub models: ModelStore,
    pub camera: Camera,
    pub bindings: KeyBindings,
    pub controller: PlayerController,
    pub renderer: RenderSystem<B>,
    player: Option<ThingId>,
    follow_player: bool,
    eye_height: f32,
    paused: bool,
}

impl<B: RenderBackend> Engine<B> {
    /// Create an engine with an empty registry
    pub fn new(config: &AppConfig, backend: B) -> Self {
        let camera = Camera::new()
            .with_position(Vec3::from(config.camera.start_position))
            .with_fov(config.camera.fov)
            .with_sensitivity(config.camera.sensitivity);

        let controller = PlayerController::new()
            .with_move_speed(config.input.move_speed)
            .with_jump_velocity(config.input.jump_velocity);

        Self {
            things: Things::new(),
            physics: PhysicsWorld::with_config(config.physics.to_physics_config()),
            models: ModelStore::new(),
            camera,
            bindings: KeyBindings::default(),
            controller,
            renderer: RenderSystem::new(backend, config.window.aspect_ratio()),
            player: None,
            follow_player: config.camera.follow_player,
            eye_height: config.camera.eye_height,
            paused: false,
        }
    }

    /// Spawn a scene's Things, and a player if the scene has a spawn point
    ///
    /// A scene gravity overrides the configured one.
    pub fn load_scene(&mut self, scene: &SceneTemplate) -> Result<Vec<ThingId>, SceneError> {
        if let Some(gravity) = scene.gravity {
            log::debug!("Scene '{}' sets gravity to {}", scene.name, gravity);
            self.physics.config.gravity = gravity;
        }

        let mut ids = scene.instantiate(&mut self.things, &self.models)?;
        if let Some(spawn) = scene.player_spawn {
            ids.push(self.spawn_player(spawn)?);
        }

        log::info!("Scene '{}' ready with {} things", scene.name, self.things.len());
        Ok(ids)
    }

    /// Add the player body at `position` and make it the controlled Thing
    pub fn spawn_player(&mut self, position: Vec3) -> Result<ThingId, RegistryError> {
        let body = Body::new_dynamic(position, PLAYER_HALF_EXTENTS);
        let player = Thing::new(body, RenderKind::Cube)
            .with_name(PLAYER_NAME)
            .with_scale(PLAYER_HALF_EXTENTS * 2.0)
            .with_data(RenderData::BLUE);

        let id = self.things.add(player)?;
        self.player = Some(id);
        self.sync_camera();
        log::info!("Player {} spawned at {:?}", id, position);
        Ok(id)
    }

    /// The controlled Thing, if any
    pub fn player(&self) -> Option<ThingId> {
        self.player
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Forward a keyboard event to the bindings
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState, repeat: bool) -> bool {
        self.bindings.process_keyboard(key, state, repeat)
    }

    /// Forward a mouse button event to the bindings
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        self.bindings.process_mouse_button(button, state)
    }

    /// Mouse look from an absolute cursor position
    pub fn handle_cursor(&mut self, x: f64, y: f64) {
        if !self.paused {
            self.camera.pan(x, y);
        }
    }

    /// Drop all held input, e.g. on focus loss
    pub fn release_input(&mut self) {
        self.bindings.clear();
        self.camera.reset_pan();
    }

    /// Run one frame
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport { dt, ..Default::default() };

        if self.bindings.consume(Action::PAUSE) {
            self.paused = !self.paused;
            self.camera.reset_pan();
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        report.paused = self.paused;

        report.applied = self.things.apply_pending().len();
        if let Some(id) = self.player {
            if !self.things.contains(id) {
                log::warn!("Player {} was deleted", id);
                self.player = None;
            }
        }

        if !self.paused {
            self.drive_player();
            self.physics.step(&mut self.things, dt);

            for event in self.physics.events() {
                match event {
                    PhysicsEvent::Collision { id, other, hit } => {
                        report.collisions += 1;
                        log::trace!("{} hit {} at t={:.3} normal {:?}", id, other, hit.time, hit.normal);
                    }
                    PhysicsEvent::TriggerOverlap { trigger, body } => {
                        report.triggers += 1;
                        log::debug!("{} inside trigger {}", body, trigger);
                    }
                }
            }
        }

        self.sync_camera();
        report.frame = self.renderer.render(&self.things, &self.camera);
        report
    }

    fn drive_player(&mut self) {
        let Some(thing) = self.player.and_then(|id| self.things.get_mut(id)) else {
            return;
        };
        let (front, right) = (self.camera.front(), self.camera.right());
        self.controller.apply(self.bindings.active(), front, right, &mut thing.body);
    }

    fn sync_camera(&mut self) {
        if !self.follow_player {
            return;
        }
        if let Some(thing) = self.player.and_then(|id| self.things.get(id)) {
            self.camera.position = thing.body.position + Vec3::new(0.0, self.eye_height, 0.0);
        }
    }
}
