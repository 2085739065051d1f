use super::collision::CollisionGroups;
use glam::Vec2;
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// The part of a physics body the movement core reads and writes
///
/// Velocity is owned by the physics engine. The core reads it, changes it
/// within one update and writes it straight back.
pub trait MotionBody {
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn gravity_scale(&self) -> f32;
    fn set_gravity_scale(&mut self, scale: f32);
}

/// Mutable view of a rapier rigid body speaking glam vectors
pub struct BodyMut<'a>(pub &'a mut RigidBody);

impl MotionBody for BodyMut<'_> {
    fn velocity(&self) -> Vec2 {
        let v = self.0.linvel();
        Vec2::new(v.x, v.y)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.0.set_linvel(vector![velocity.x, velocity.y], true);
    }

    fn gravity_scale(&self) -> f32 {
        self.0.gravity_scale()
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.0.set_gravity_scale(scale, true);
    }
}

/// Box collider tagged with a category; every collider reports its contacts
fn tagged_box(width: Real, height: Real, groups: CollisionGroups) -> ColliderBuilder {
    ColliderBuilder::cuboid(width / 2.0, height / 2.0)
        .collision_groups(groups.to_interaction_groups())
        .restitution(0.0)
        .active_events(ActiveEvents::COLLISION_EVENTS)
}

/// Common rigid body configurations for game objects
pub mod presets {
    use super::*;

    /// Create a player character body (dynamic, rotation locked)
    pub fn player_body(x: Real, y: Real, vel_x: Real, vel_y: Real) -> RigidBody {
        RigidBodyBuilder::dynamic()
            .translation(vector![x, y])
            .linvel(vector![vel_x, vel_y])
            .lock_rotations()
            .gravity_scale(1.0)
            .can_sleep(false) // Players should never sleep
            .build()
    }

    /// Create a player character collider (capsule shape)
    pub fn player_collider(width: Real, height: Real) -> Collider {
        let radius = width / 2.0;
        let half_height = (height / 2.0 - radius).max(0.0);

        ColliderBuilder::capsule_y(half_height, radius)
            .collision_groups(CollisionGroups::Player.to_interaction_groups())
            .friction(0.0) // No friction, or wall contact would eat the cling
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution(0.0)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build()
    }

    /// Create a static body for level geometry or a volume
    pub fn fixed_body(x: Real, y: Real) -> RigidBody {
        RigidBodyBuilder::fixed().translation(vector![x, y]).build()
    }

    /// Create a ground collider (box shape)
    pub fn ground_collider(width: Real, height: Real) -> Collider {
        tagged_box(width, height, CollisionGroups::Ground)
            .friction(0.3)
            .build()
    }

    /// Create a clingable wall collider (box shape)
    pub fn wall_collider(width: Real, height: Real) -> Collider {
        tagged_box(width, height, CollisionGroups::Wall)
            .friction(0.0)
            .build()
    }

    /// Create a vortex sensor (detects but doesn't block)
    pub fn vortex_collider(width: Real, height: Real) -> Collider {
        tagged_box(width, height, CollisionGroups::Vortex)
            .sensor(true)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_preset() {
        let body = presets::player_body(10.0, 20.0, 5.0, 0.0);
        let collider = presets::player_collider(1.0, 2.0);

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert_eq!(body.translation().x, 10.0);
        assert_eq!(body.translation().y, 20.0);
        assert_eq!(body.linvel().x, 5.0);
        assert!(body.locked_axes().contains(LockedAxes::ROTATION_LOCKED));
        assert!(!collider.is_sensor());
        assert_eq!(
            CollisionGroups::of(collider.collision_groups()),
            Some(CollisionGroups::Player)
        );
    }

    #[test]
    fn test_fixed_body() {
        let body = presets::fixed_body(1.0, -1.0);
        assert_eq!(body.body_type(), RigidBodyType::Fixed);
        assert_eq!(body.translation().y, -1.0);
    }

    #[test]
    fn test_vortex_preset_is_sensor() {
        let collider = presets::vortex_collider(2.0, 4.0);
        assert!(collider.is_sensor());
        assert_eq!(
            CollisionGroups::of(collider.collision_groups()),
            Some(CollisionGroups::Vortex)
        );
    }

    #[test]
    fn test_wall_preset_category() {
        let collider = presets::wall_collider(1.0, 10.0);
        assert_eq!(
            CollisionGroups::of(collider.collision_groups()),
            Some(CollisionGroups::Wall)
        );
        assert_eq!(collider.friction(), 0.0);
    }

    #[test]
    fn test_body_mut_round_trips_glam() {
        let mut body = presets::player_body(0.0, 0.0, 0.0, 0.0);
        let mut view = BodyMut(&mut body);

        view.set_velocity(Vec2::new(3.0, -4.0));
        view.set_gravity_scale(-2.0);

        assert_eq!(view.velocity(), Vec2::new(3.0, -4.0));
        assert_eq!(view.gravity_scale(), -2.0);
    }
}
