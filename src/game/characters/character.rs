// Character entity and management

use glam::Vec2;

use crate::core::SceneError;
use crate::engine::input::InputSnapshot;
use crate::engine::physics::{
    body::presets, BodyMut, ColliderHandle, PhysicsWorld, RigidBodyHandle,
};
use crate::game::contact::ContactEvent;

use super::state::{CharacterState, CharacterStateMachine, InputOutcome};
use super::stats::CharacterKind;

/// Unique identifier for a character
pub type CharacterId = u32;

/// A playable character: a rapier body plus its movement state machine
#[derive(Debug)]
pub struct Character {
    /// Unique identifier
    pub id: CharacterId,
    /// Which element this character plays as
    pub kind: CharacterKind,

    // Physics
    /// Handle to the character's rigid body in the physics world
    pub body_handle: RigidBodyHandle,
    /// Handle to the character's collider
    pub collider_handle: ColliderHandle,

    /// State machine for character behavior
    pub state_machine: CharacterStateMachine,
}

impl Character {
    /// Create a new character and add it to the physics world
    pub fn new(
        id: CharacterId,
        kind: CharacterKind,
        physics: &mut PhysicsWorld,
        position: Vec2,
        velocity: Vec2,
    ) -> Result<Self, SceneError> {
        let stats = kind.stats();
        stats.validate()?;

        // Create physics body
        let body = presets::player_body(position.x, position.y, velocity.x, velocity.y);
        let default_gravity_scale = body.gravity_scale();
        let body_handle = physics.add_rigid_body(body);

        // Create collider with character dimensions
        let collider = presets::player_collider(stats.width, stats.height);
        let collider_handle = physics.add_collider(collider, body_handle);
        physics.set_entity_mapping(body_handle, u64::from(id));

        Ok(Self {
            id,
            kind,
            body_handle,
            collider_handle,
            state_machine: CharacterStateMachine::new(stats, default_gravity_scale),
        })
    }

    fn body<'a>(&self, physics: &'a mut PhysicsWorld) -> Result<BodyMut<'a>, SceneError> {
        physics
            .body_mut(self.body_handle)
            .ok_or(SceneError::MissingBody(self.id))
    }

    /// Input phase for this frame
    pub fn handle_input(
        &mut self,
        physics: &mut PhysicsWorld,
        input: &InputSnapshot,
    ) -> Result<InputOutcome, SceneError> {
        let mut body = self.body(physics)?;
        let outcome = self.state_machine.handle_input(input, &mut body);
        if outcome.jumped {
            log::debug!("{} character {} jumped", self.kind.name(), self.id);
        }
        Ok(outcome)
    }

    /// Timers, movement and gravity for one fixed step
    pub fn fixed_update(&mut self, physics: &mut PhysicsWorld, dt: f32) -> Result<(), SceneError> {
        let gravity = physics.gravity();
        let mut body = self.body(physics)?;
        self.state_machine.fixed_update(dt, gravity, &mut body);
        Ok(())
    }

    /// Deliver one classified contact
    pub fn apply_contact(
        &mut self,
        physics: &mut PhysicsWorld,
        event: ContactEvent,
    ) -> Result<(), SceneError> {
        let mut body = self.body(physics)?;
        event.apply(&mut self.state_machine, &mut body);
        Ok(())
    }

    /// The live vortex has been removed; an exit if this character was inside
    pub fn notify_volume_destroyed(
        &mut self,
        physics: &mut PhysicsWorld,
    ) -> Result<(), SceneError> {
        let mut body = self.body(physics)?;
        self.state_machine.on_volume_destroyed(&mut body);
        Ok(())
    }

    /// Get character's current position
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.get_rigid_body(self.body_handle).map(|body| {
            let pos = body.translation();
            Vec2::new(pos.x, pos.y)
        })
    }

    /// Get character's current velocity
    pub fn velocity(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.get_rigid_body(self.body_handle).map(|body| {
            let vel = body.linvel();
            Vec2::new(vel.x, vel.y)
        })
    }

    /// Get the current state
    pub fn state(&self) -> CharacterState {
        self.state_machine.state()
    }
}

/// Manages all characters in the game
#[derive(Debug, Default)]
pub struct CharacterManager {
    characters: Vec<Character>,
    next_id: CharacterId,
}

impl CharacterManager {
    pub fn new() -> Self {
        Self {
            characters: Vec::new(),
            next_id: 0,
        }
    }

    /// Spawn a new character
    pub fn spawn_character(
        &mut self,
        kind: CharacterKind,
        physics: &mut PhysicsWorld,
        position: Vec2,
        velocity: Vec2,
    ) -> Result<CharacterId, SceneError> {
        let id = self.next_id;
        let character = Character::new(id, kind, physics, position, velocity)?;
        self.next_id += 1;
        self.characters.push(character);

        log::info!(
            "spawned {} character {} at ({:.2}, {:.2})",
            kind.name(),
            id,
            position.x,
            position.y
        );
        Ok(id)
    }

    /// Get a character by ID
    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Get a mutable character by ID
    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    /// Get all characters
    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    /// Get all characters mutably
    pub fn all_mut(&mut self) -> &mut [Character] {
        &mut self.characters
    }

    /// Remove a character by ID, along with its body
    pub fn remove(&mut self, id: CharacterId, physics: &mut PhysicsWorld) -> Option<Character> {
        let pos = self.characters.iter().position(|c| c.id == id)?;
        let character = self.characters.remove(pos);
        physics.remove_rigid_body(character.body_handle);
        Some(character)
    }

    /// Get the number of characters
    pub fn count(&self) -> usize {
        self.characters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::stats::AIR_STATS;

    #[test]
    fn test_character_manager_new() {
        let manager = CharacterManager::new();
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_spawn_registers_body() {
        let mut physics = PhysicsWorld::new();
        let mut manager = CharacterManager::new();

        let id = manager
            .spawn_character(CharacterKind::Fire, &mut physics, Vec2::new(1.0, 2.0), Vec2::ZERO)
            .unwrap();
        let character = manager.get(id).unwrap();

        assert_eq!(character.kind, CharacterKind::Fire);
        assert_eq!(character.position(&physics), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(
            physics.entity_of_collider(character.collider_handle),
            Some(u64::from(id))
        );
        assert_eq!(character.state(), CharacterState::Airborne);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut physics = PhysicsWorld::new();
        let mut manager = CharacterManager::new();
        let a = manager
            .spawn_character(CharacterKind::Air, &mut physics, Vec2::ZERO, Vec2::ZERO)
            .unwrap();
        let b = manager
            .spawn_character(CharacterKind::Fire, &mut physics, Vec2::ZERO, Vec2::ZERO)
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(manager.count(), 2);
    }

    #[test]
    fn test_fixed_update_drives_rapier_body() {
        let mut physics = PhysicsWorld::new();
        let mut manager = CharacterManager::new();
        let id = manager
            .spawn_character(CharacterKind::Air, &mut physics, Vec2::ZERO, Vec2::ZERO)
            .unwrap();
        let character = manager.get_mut(id).unwrap();

        character
            .handle_input(&mut physics, &InputSnapshot::axis(1.0))
            .unwrap();
        character.fixed_update(&mut physics, 1.0 / 60.0).unwrap();

        let velocity = character.velocity(&physics).unwrap();
        assert_eq!(velocity.x, AIR_STATS.air_speed);
    }

    #[test]
    fn test_remove_drops_body() {
        let mut physics = PhysicsWorld::new();
        let mut manager = CharacterManager::new();
        let id = manager
            .spawn_character(CharacterKind::Air, &mut physics, Vec2::ZERO, Vec2::ZERO)
            .unwrap();

        let mut removed = manager.remove(id, &mut physics).unwrap();
        assert!(manager.get(id).is_none());
        assert!(physics.get_rigid_body(removed.body_handle).is_none());
        assert!(matches!(
            removed.fixed_update(&mut physics, 1.0 / 60.0),
            Err(SceneError::MissingBody(_))
        ));
    }
}
