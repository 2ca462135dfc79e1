//! Physics world and simulation
//!
//! The world owns no bodies. Each [`PhysicsWorld::step`] walks a
//! [`BodyStore`], integrates every dynamic body and sweeps it against all
//! other bodies. Bodies are updated one after another, so a body moved
//! earlier in the tick is seen at its new position by the ones after it.

use crate::aabb::{overlaps, penetration, ray_intersects_aabb, Hit};
use crate::body::Body;
use crate::store::BodyStore;
use thing3d_math::Vec3;

/// Default downward acceleration in units/s²
pub const DEFAULT_GRAVITY: f32 = 9.8;
/// Gap left between a body and whatever it hit
pub const CONTACT_EPSILON: f32 = 1e-4;
/// Default number of re-sweeps of the leftover displacement after a hit
pub const DEFAULT_MAX_SLIDE_ITERATIONS: u32 = 3;
/// Default distance a grounded body is probed below itself for support
pub const DEFAULT_GROUND_PROBE_DISTANCE: f32 = 0.01;

/// Configuration for the physics simulation
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity magnitude, applied along -Y
    pub gravity: f32,
    /// Gap left along the contact normal after a hit
    pub contact_epsilon: f32,
    /// Sweeps per body per tick, including the first
    pub max_slide_iterations: u32,
    /// How far below a grounded body to look for support
    pub ground_probe_distance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            contact_epsilon: CONTACT_EPSILON,
            max_slide_iterations: DEFAULT_MAX_SLIDE_ITERATIONS,
            ground_probe_distance: DEFAULT_GROUND_PROBE_DISTANCE,
        }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: f32) -> Self {
        Self { gravity, ..Default::default() }
    }

    /// Set the contact gap
    pub fn with_contact_epsilon(mut self, epsilon: f32) -> Self {
        self.contact_epsilon = epsilon;
        self
    }

    /// Set the number of sweeps per tick (at least one)
    pub fn with_max_slide_iterations(mut self, iterations: u32) -> Self {
        self.max_slide_iterations = iterations.max(1);
        self
    }

    /// Set the ground probe distance
    pub fn with_ground_probe_distance(mut self, distance: f32) -> Self {
        self.ground_probe_distance = distance;
        self
    }
}

/// Something that happened during the last step
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhysicsEvent<I> {
    /// Dynamic body `id` was stopped by `other`
    Collision { id: I, other: I, hit: Hit },
    /// Dynamic body `body` ended its move inside trigger volume `trigger`
    TriggerOverlap { trigger: I, body: I },
}

/// Runs the per-tick physics update over a [`BodyStore`]
pub struct PhysicsWorld<I = usize> {
    /// Physics configuration
    pub config: PhysicsConfig,
    scratch_ids: Vec<I>,
    events: Vec<PhysicsEvent<I>>,
}

impl<I: Copy + Eq + std::fmt::Debug> Default for PhysicsWorld<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Copy + Eq + std::fmt::Debug> PhysicsWorld<I> {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            config,
            scratch_ids: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Events produced by the last call to [`step`](Self::step)
    pub fn events(&self) -> &[PhysicsEvent<I>] {
        &self.events
    }

    /// Step the simulation forward by `dt` seconds
    ///
    /// Negative or non-finite `dt` is treated as zero. A zero step moves
    /// nothing and produces no events.
    pub fn step<S>(&mut self, store: &mut S, dt: f32)
    where
        S: BodyStore<Id = I>,
    {
        self.events.clear();

        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("Ignoring invalid physics timestep {}", dt);
            0.0
        };
        if dt == 0.0 {
            return;
        }

        // Snapshot ids so bodies can be written back while iterating
        let mut ids = std::mem::take(&mut self.scratch_ids);
        ids.clear();
        store.collect_ids(&mut ids);

        for &id in &ids {
            let Some(mut body) = store.body(id).copied() else {
                continue;
            };
            if !body.is_dynamic() {
                continue;
            }

            self.advance(store, id, &mut body, dt);

            if let Some(slot) = store.body_mut(id) {
                *slot = body;
            }
        }

        self.scratch_ids = ids;
    }

    /// Integrate, resolve, probe ground and check triggers for one body
    fn advance<S>(&mut self, store: &S, id: I, body: &mut Body, dt: f32)
    where
        S: BodyStore<Id = I>,
    {
        if !body.grounded {
            body.velocity.y -= self.config.gravity * dt;
        }

        if body.is_degenerate() {
            body.position += body.velocity * dt;
        } else {
            self.depenetrate(store, id, body);
            let displacement = body.velocity * dt;
            self.resolve_motion(store, id, body, displacement);

            if body.grounded && !self.has_support(store, id, body) {
                body.grounded = false;
            }
        }

        let events = &mut self.events;
        store.for_each_body(|other_id, other| {
            if other_id != id && other.is_trigger() && overlaps(body, other) {
                events.push(PhysicsEvent::TriggerOverlap { trigger: other_id, body: id });
            }
        });
    }

    /// Push `body` out of any blocking body it starts the tick inside
    ///
    /// Each overlap is left through its shallowest face, ending
    /// `contact_epsilon` outside it. Velocity into that face is dropped.
    fn depenetrate<S>(&mut self, store: &S, id: I, body: &mut Body)
    where
        S: BodyStore<Id = I>,
    {
        let epsilon = self.config.contact_epsilon;
        let events = &mut self.events;

        store.for_each_body(|other_id, other| {
            if other_id == id || other.is_trigger() || other.is_degenerate() {
                return;
            }

            let expanded = other.aabb().expanded_by(body.half_extents());
            let Some((normal, depth)) = penetration(body.position, &expanded) else {
                return;
            };

            body.position += normal * (depth + epsilon);
            let hit = Hit { time: 0.0, position: body.position, normal };
            let axis = hit.axis();
            if body.velocity.axis(axis) * normal.axis(axis) < 0.0 {
                *body.velocity.axis_mut(axis) = 0.0;
            }
            if normal.y > 0.0 {
                body.grounded = true;
            }

            log::debug!("Body {:?} pushed out of {:?} by {} along {:?}", id, other_id, depth, normal);
            events.push(PhysicsEvent::Collision { id, other: other_id, hit });
        });
    }

    /// Move `body` by `displacement`, stopping and sliding at each hit
    fn resolve_motion<S>(&mut self, store: &S, id: I, body: &mut Body, displacement: Vec3)
    where
        S: BodyStore<Id = I>,
    {
        let mut remaining = displacement;

        for _ in 0..self.config.max_slide_iterations.max(1) {
            if remaining == Vec3::ZERO {
                break;
            }

            let Some((other, hit)) = sweep(store, id, body, remaining) else {
                body.position += remaining;
                break;
            };

            let axis = hit.axis();
            *body.velocity.axis_mut(axis) = 0.0;
            if hit.normal.y > 0.0 {
                body.grounded = true;
            }
            body.position = hit.position + hit.normal * self.config.contact_epsilon;

            log::debug!("Body {:?} hit {:?} at t={} normal={:?}", id, other, hit.time, hit.normal);
            self.events.push(PhysicsEvent::Collision { id, other, hit });

            remaining = remaining * (1.0 - hit.time);
            *remaining.axis_mut(axis) = 0.0;
        }
    }

    /// Whether something directly below a grounded body holds it up
    fn has_support<S>(&self, store: &S, id: I, body: &Body) -> bool
    where
        S: BodyStore<Id = I>,
    {
        let probe = Vec3::new(0.0, -self.config.ground_probe_distance, 0.0);
        matches!(sweep(store, id, body, probe), Some((_, hit)) if hit.normal.y > 0.0)
    }
}

/// Earliest hit of `body` moving by `displacement` against every other
/// blocking body in `store`
///
/// Triggers, degenerate bodies and `id` itself are skipped. On equal times
/// the body visited first wins.
pub fn sweep<S>(store: &S, id: S::Id, body: &Body, displacement: Vec3) -> Option<(S::Id, Hit)>
where
    S: BodyStore,
{
    let mut closest: Option<(S::Id, Hit)> = None;

    store.for_each_body(|other_id, other| {
        if other_id == id || other.is_trigger() || other.is_degenerate() {
            return;
        }

        let expanded = other.aabb().expanded_by(body.half_extents());
        if let Some(hit) = ray_intersects_aabb(body.position, displacement, &expanded) {
            if closest.map_or(true, |(_, best)| hit.time < best.time) {
                closest = Some((other_id, hit));
            }
        }
    });

    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;
    const DT: f32 = 1.0 / 60.0;

    fn floor() -> Body {
        // Top face at y = 0
        Body::new_static(Vec3::new(0.0, -1.0, 0.0), Vec3::new(20.0, 1.0, 20.0))
    }

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.gravity, 9.8);
        assert_eq!(config.contact_epsilon, 1e-4);
        assert_eq!(config.max_slide_iterations, 3);
        assert_eq!(config.ground_probe_distance, 0.01);
    }

    #[test]
    fn test_physics_config_custom() {
        let config = PhysicsConfig::new(20.0)
            .with_max_slide_iterations(0)
            .with_ground_probe_distance(0.05);
        assert_eq!(config.gravity, 20.0);
        assert_eq!(config.max_slide_iterations, 1);
        assert_eq!(config.ground_probe_distance, 0.05);
    }

    #[test]
    fn test_gravity_application() {
        let mut bodies = vec![Body::new_dynamic(Vec3::new(0.0, 10.0, 0.0), Vec3::splat(0.5))];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, 0.1);

        assert!((bodies[0].velocity.y - (-0.98)).abs() < EPSILON);
        assert!((bodies[0].position.y - (10.0 - 0.098)).abs() < EPSILON);
    }

    #[test]
    fn test_zero_dt_is_a_no_op() {
        let body = Body::new_dynamic(Vec3::ZERO, Vec3::splat(0.5)).with_velocity(Vec3::X);
        let mut bodies = vec![body];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, 0.0);
        assert_eq!(bodies[0], body);
        assert!(world.events().is_empty());
    }

    #[test]
    fn test_invalid_dt_treated_as_zero() {
        let body = Body::new_dynamic(Vec3::ZERO, Vec3::splat(0.5)).with_velocity(Vec3::X);
        let mut bodies = vec![body];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, -1.0);
        assert_eq!(bodies[0], body);
        world.step(&mut bodies, f32::NAN);
        assert_eq!(bodies[0], body);
    }

    #[test]
    fn test_static_body_does_not_move() {
        let body = Body::new_static(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE).with_velocity(Vec3::X);
        let mut bodies = vec![body];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);
        assert_eq!(bodies[0].position, body.position);
    }

    #[test]
    fn test_lone_body_never_hits_itself() {
        let mut bodies = vec![Body::new_dynamic(Vec3::ZERO, Vec3::ONE).with_velocity(Vec3::new(3.0, 0.0, 0.0))];
        let mut world = PhysicsWorld::new();

        for _ in 0..10 {
            world.step(&mut bodies, DT);
            assert!(world.events().is_empty());
        }
        assert!(bodies[0].position.x > 0.4);
    }

    #[test]
    fn test_falling_body_lands_and_grounds() {
        let mut bodies = vec![floor(), Body::new_dynamic(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(0.5))];
        let mut world = PhysicsWorld::new();

        for _ in 0..120 {
            world.step(&mut bodies, DT);
        }

        let body = &bodies[1];
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
        // Bottom face sits just above the floor top
        let bottom = body.position.y - 0.5;
        assert!(bottom >= 0.0);
        assert!(bottom < 0.001);
    }

    #[test]
    fn test_landing_emits_collision_event() {
        let mut bodies = vec![
            floor(),
            Body::new_dynamic(Vec3::new(0.0, 0.6, 0.0), Vec3::splat(0.5)).with_velocity(Vec3::new(0.0, -12.0, 0.0)),
        ];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);

        match world.events() {
            [PhysicsEvent::Collision { id, other, hit }] => {
                assert_eq!(*id, 1);
                assert_eq!(*other, 0);
                assert_eq!(hit.normal, Vec3::Y);
            }
            events => panic!("expected one collision, got {:?}", events),
        }
    }

    #[test]
    fn test_resting_body_stays_put() {
        let mut bodies = vec![floor(), Body::new_dynamic(Vec3::new(0.0, 0.5 + CONTACT_EPSILON, 0.0), Vec3::splat(0.5)).with_grounded(true)];
        let mut world = PhysicsWorld::new();
        let start = bodies[1].position;

        for _ in 0..300 {
            world.step(&mut bodies, DT);
        }

        assert!(bodies[1].grounded);
        assert!((bodies[1].position - start).length() < EPSILON);
        assert_eq!(bodies[1].velocity, Vec3::ZERO);
    }

    #[test]
    fn test_no_tunnelling_through_thick_wall() {
        // Wall 2 units thick at x in [4, 6]; body would cover 20 units in one tick
        let wall = Body::new_static(Vec3::new(5.0, 0.0, 0.0), Vec3::new(1.0, 5.0, 5.0));
        let mover = Body::new_dynamic(Vec3::ZERO, Vec3::splat(0.5))
            .with_velocity(Vec3::new(1200.0, 0.0, 0.0))
            .with_grounded(true);
        let mut bodies = vec![wall, mover];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);

        let body = &bodies[1];
        assert!(body.position.x + 0.5 <= 4.0);
        assert!(body.position.x > 3.0);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_slides_along_floor_when_landing_diagonally() {
        let mover = Body::new_dynamic(Vec3::new(0.0, 0.6, 0.0), Vec3::splat(0.5))
            .with_velocity(Vec3::new(6.0, -12.0, 0.0));
        let mut bodies = vec![floor(), mover];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);

        let body = &bodies[1];
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.velocity.x, 6.0);
        // Full horizontal travel survives the landing
        assert!((body.position.x - 6.0 * DT).abs() < 0.001);
    }

    #[test]
    fn test_walking_off_ledge_ungrounds() {
        let ledge = Body::new_static(Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let mover = Body::new_dynamic(Vec3::new(0.0, 0.5 + CONTACT_EPSILON, 0.0), Vec3::splat(0.5))
            .with_velocity(Vec3::new(5.0, 0.0, 0.0))
            .with_grounded(true);
        let mut bodies = vec![ledge, mover];
        let mut world = PhysicsWorld::new();

        for _ in 0..60 {
            world.step(&mut bodies, DT);
        }

        let body = &bodies[1];
        assert!(!body.grounded);
        assert!(body.velocity.y < 0.0);
        assert!(body.position.y < 0.0);
    }

    #[test]
    fn test_embedded_body_is_pushed_out_and_walks_both_ways() {
        for vx in [5.0, -5.0] {
            // Sunk 0.01 into the floor
            let mover = Body::new_dynamic(Vec3::new(5.0, 0.49, 0.0), Vec3::splat(0.5))
                .with_velocity(Vec3::new(vx, 0.0, 0.0))
                .with_grounded(true);
            let mut bodies = vec![floor(), mover];
            let mut world = PhysicsWorld::new();

            world.step(&mut bodies, DT);
            assert!(!world.events().is_empty());
            assert!(world
                .events()
                .iter()
                .all(|e| matches!(e, PhysicsEvent::Collision { other: 0, hit, .. } if hit.normal == Vec3::Y)));

            for _ in 0..29 {
                world.step(&mut bodies, DT);
            }

            let body = &bodies[1];
            assert_eq!(body.velocity.x, vx);
            assert!((body.position.x - (5.0 + vx * 0.5)).abs() < 0.001);
            assert!(body.position.y >= 0.5);
            assert!(body.position.y < 0.5 + 0.001);
            assert!(body.grounded);
        }
    }

    #[test]
    fn test_embedded_falling_body_keeps_horizontal_velocity() {
        let mover = Body::new_dynamic(Vec3::new(5.0, 0.49, 0.0), Vec3::splat(0.5))
            .with_velocity(Vec3::new(-5.0, -1.0, 0.0));
        let mut bodies = vec![floor(), mover];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);

        let body = &bodies[1];
        assert!(body.position.y >= 0.5);
        assert_eq!(body.velocity, Vec3::new(-5.0, 0.0, 0.0));
        assert!(body.grounded);
        assert!((body.position.x - (5.0 - 5.0 * DT)).abs() < EPSILON);
    }

    #[test]
    fn test_ceiling_stops_upward_motion() {
        let ceiling = Body::new_static(Vec3::new(0.0, 3.0, 0.0), Vec3::new(5.0, 0.5, 5.0));
        let mover = Body::new_dynamic(Vec3::ZERO, Vec3::splat(0.5)).with_velocity(Vec3::new(0.0, 200.0, 0.0));
        let mut bodies = vec![ceiling, mover];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);

        let body = &bodies[1];
        assert_eq!(body.velocity.y, 0.0);
        assert!(!body.grounded);
        assert!(body.position.y + 0.5 <= 2.5);
    }

    #[test]
    fn test_triggers_do_not_block_but_report() {
        let trigger = Body::new_trigger(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(1.0));
        let mover = Body::new_dynamic(Vec3::ZERO, Vec3::splat(0.5))
            .with_velocity(Vec3::new(60.0, 0.0, 0.0))
            .with_grounded(true);
        let mut bodies = vec![trigger, mover];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);

        assert!((bodies[1].position.x - 1.0).abs() < EPSILON);
        assert_eq!(world.events(), &[PhysicsEvent::TriggerOverlap { trigger: 0, body: 1 }]);

        // Events are cleared each step
        bodies[1].velocity = Vec3::new(600.0, 0.0, 0.0);
        world.step(&mut bodies, DT);
        assert!(world.events().is_empty());
    }

    #[test]
    fn test_degenerate_bodies_neither_block_nor_sweep() {
        let point = Body::new_static(Vec3::new(1.0, 5.0, 0.0), Vec3::ZERO);
        let mover = Body::new_dynamic(Vec3::new(0.0, 5.0, 0.0), Vec3::splat(0.5))
            .with_velocity(Vec3::new(120.0, 0.0, 0.0))
            .with_grounded(true);
        let ghost = Body::new_dynamic(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO).with_velocity(Vec3::new(0.0, -900.0, 0.0));
        let mut bodies = vec![point, mover, floor(), ghost];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);

        assert!((bodies[1].position.x - 2.0).abs() < EPSILON);
        // The degenerate body falls straight through the floor
        assert!(bodies[3].position.y < -1.0);
        assert!(world.events().is_empty());
    }

    #[test]
    fn test_bodies_update_sequentially() {
        // The first body moves into the second body's path before it is swept
        let first = Body::new_dynamic(Vec3::new(3.0, 5.0, 0.0), Vec3::splat(0.5))
            .with_velocity(Vec3::new(-180.0, 0.0, 0.0))
            .with_grounded(true);
        let second = Body::new_dynamic(Vec3::new(0.0, 0.0, 0.0), Vec3::splat(0.5))
            .with_velocity(Vec3::new(0.0, 600.0, 0.0));
        let mut bodies = vec![first, second];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);

        // first ends at x = 0; second stops under it
        assert!((bodies[0].position.x - 0.0).abs() < EPSILON);
        assert!(bodies[1].position.y + 0.5 <= bodies[0].position.y - 0.5);
        assert!(world
            .events()
            .iter()
            .any(|e| matches!(e, PhysicsEvent::Collision { id: 1, other: 0, .. })));
    }

    #[test]
    fn test_sweep_excludes_self_and_picks_earliest() {
        let near = Body::new_static(Vec3::new(3.0, 0.0, 0.0), Vec3::splat(0.5));
        let far = Body::new_static(Vec3::new(6.0, 0.0, 0.0), Vec3::splat(0.5));
        let mover = Body::new_dynamic(Vec3::ZERO, Vec3::splat(0.5));
        let bodies = vec![far, mover, near];

        let (other, hit) = sweep(&bodies, 1, &mover, Vec3::new(10.0, 0.0, 0.0)).expect("should hit");
        assert_eq!(other, 2);
        assert!((hit.time - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_scratch_buffer_reused() {
        let mut bodies = vec![floor(), Body::new_dynamic(Vec3::new(0.0, 2.0, 0.0), Vec3::splat(0.5))];
        let mut world = PhysicsWorld::new();

        world.step(&mut bodies, DT);
        let capacity = world.scratch_ids.capacity();
        world.step(&mut bodies, DT);
        assert_eq!(world.scratch_ids.capacity(), capacity);
    }
}
