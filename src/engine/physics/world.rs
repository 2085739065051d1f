use glam::Vec2;
use rapier2d::parry::shape::Cuboid;
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::body::BodyMut;
use super::collision::{CollisionEvent as GameCollisionEvent, CollisionEventQueue};

/// Obstruction queries the effect spawner needs
///
/// `mask` holds the membership bits of the categories that count as solid.
pub trait GeometryProbe {
    /// True if the straight segment `from -> to` hits anything in `mask`
    fn linecast(&self, from: Vec2, to: Vec2, mask: Group) -> bool;

    /// True if the axis-aligned box around `center` overlaps anything in `mask`
    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: Group) -> bool;
}

/// Owns the rapier sets and pipeline, plus the body to character mapping
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    // Also refreshed on insert and removal so probes see new geometry
    // before the next step
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    collision_event_queue: CollisionEventQueue,
    body_to_entity: HashMap<RigidBodyHandle, u64>,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
            body_to_entity: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    ///
    /// Events accumulate until `drain_collision_events` is called, so the
    /// caller decides when contacts are dispatched.
    pub fn step(&mut self) {
        let event_handler = &self.collision_event_queue;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            event_handler,
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        let handle =
            self.collider_set
                .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set);
        // Queries issued before the next step must already see new geometry
        self.query_pipeline
            .update(&self.rigid_body_set, &self.collider_set);
        handle
    }

    /// Add a fixed body with a single collider, returning the body handle
    pub fn add_static(&mut self, body: RigidBody, collider: Collider) -> RigidBodyHandle {
        let handle = self.add_rigid_body(body);
        self.add_collider(collider, handle);
        handle
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
        self.body_to_entity.remove(&handle);
        self.query_pipeline
            .update(&self.rigid_body_set, &self.collider_set);
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Borrow a body through the glam-facing `MotionBody` view
    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<BodyMut<'_>> {
        self.rigid_body_set.get_mut(handle).map(BodyMut)
    }

    /// Get a reference to a collider
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Associate a game entity ID with a rigid body
    pub fn set_entity_mapping(&mut self, body_handle: RigidBodyHandle, entity_id: u64) {
        self.body_to_entity.insert(body_handle, entity_id);
    }

    /// Get the entity ID associated with a rigid body
    pub fn get_entity_id(&self, body_handle: RigidBodyHandle) -> Option<u64> {
        self.body_to_entity.get(&body_handle).copied()
    }

    /// Entity owning the body a collider is attached to
    pub fn entity_of_collider(&self, handle: ColliderHandle) -> Option<u64> {
        self.collider_set
            .get(handle)
            .and_then(|collider| collider.parent())
            .and_then(|body| self.get_entity_id(body))
    }

    /// Take all collision events reported since the last drain
    pub fn drain_collision_events(&self) -> Vec<GameCollisionEvent> {
        self.collision_event_queue.drain()
    }

    /// Queue an event as if the last step had reported it
    #[cfg(test)]
    pub(crate) fn push_collision_event(&self, event: GameCollisionEvent) {
        self.collision_event_queue.push(event);
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    /// Get the current timestep
    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }

    fn solid_filter(mask: Group) -> QueryFilter<'static> {
        QueryFilter::new()
            .exclude_sensors()
            .groups(InteractionGroups::new(Group::ALL, mask))
    }
}

impl GeometryProbe for PhysicsWorld {
    fn linecast(&self, from: Vec2, to: Vec2, mask: Group) -> bool {
        let delta = to - from;
        if delta.length_squared() <= f32::EPSILON {
            return false;
        }

        // With an unnormalized direction, time of impact 1.0 is the end point
        let ray = Ray::new(point![from.x, from.y], vector![delta.x, delta.y]);
        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                1.0,
                true,
                Self::solid_filter(mask),
            )
            .is_some()
    }

    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: Group) -> bool {
        let shape = Cuboid::new(vector![half_extents.x, half_extents.y]);
        let shape_pos = Isometry::translation(center.x, center.y);
        self.query_pipeline
            .intersection_with_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape,
                Self::solid_filter(mask),
            )
            .is_some()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::body::presets;
    use super::super::collision::CollisionGroups;
    use super::*;

    fn world_with_wall() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        // 1 wide, 10 tall wall centered at x = 5
        world.add_static(
            presets::fixed_body(5.0, 0.0),
            presets::wall_collider(1.0, 10.0),
        );
        world
    }

    #[test]
    fn test_default_gravity() {
        let world = PhysicsWorld::new();
        assert_eq!(world.gravity(), Vec2::new(0.0, -9.81));
        assert!((world.timestep() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_linecast_hits_wall() {
        let world = world_with_wall();
        assert!(world.linecast(Vec2::ZERO, Vec2::new(8.0, 0.0), CollisionGroups::solid()));
        assert!(!world.linecast(Vec2::ZERO, Vec2::new(3.0, 0.0), CollisionGroups::solid()));
    }

    #[test]
    fn test_linecast_respects_mask() {
        let world = world_with_wall();
        assert!(!world.linecast(
            Vec2::ZERO,
            Vec2::new(8.0, 0.0),
            CollisionGroups::Ground.group()
        ));
    }

    #[test]
    fn test_probes_see_geometry_changes_before_any_step() {
        let mut world = PhysicsWorld::new();
        let wall = world.add_static(
            presets::fixed_body(5.0, 0.0),
            presets::wall_collider(1.0, 10.0),
        );
        let to = Vec2::new(8.0, 0.0);
        assert!(world.linecast(Vec2::ZERO, to, CollisionGroups::solid()));

        world.remove_rigid_body(wall);
        assert!(!world.linecast(Vec2::ZERO, to, CollisionGroups::solid()));
    }

    #[test]
    fn test_overlap_box() {
        let world = world_with_wall();
        let half = Vec2::new(0.5, 0.05);
        assert!(world.overlap_box(Vec2::new(5.0, 1.0), half, CollisionGroups::solid()));
        assert!(!world.overlap_box(Vec2::new(2.0, 1.0), half, CollisionGroups::solid()));
    }

    #[test]
    fn test_entity_mapping_follows_collider() {
        let mut world = PhysicsWorld::new();
        let body = world.add_rigid_body(presets::player_body(0.0, 0.0, 0.0, 0.0));
        let collider = world.add_collider(presets::player_collider(1.0, 2.0), body);
        world.set_entity_mapping(body, 42);

        assert_eq!(world.entity_of_collider(collider), Some(42));

        world.remove_rigid_body(body);
        assert_eq!(world.get_entity_id(body), None);
        assert!(world.get_collider(collider).is_none());
    }
}
