//! Scene orchestration
//!
//! Owns the physics world, the characters and the vortex spawner, and runs
//! them in a fixed order. Input is handled once per frame. Each fixed step
//! then:
//!
//! 1. dispatches the contacts reported by the previous physics step,
//! 2. expires the vortex and notifies the characters inside it,
//! 3. runs every character's timers, movement and gravity,
//! 4. steps the physics world.
//!
//! A contact therefore always lands before a timer due in the same step.

use std::collections::HashMap;

use glam::Vec2;

use crate::core::SceneError;
use crate::engine::game_loop::FixedStepper;
use crate::engine::input::{Action, InputSnapshot, PlayerInput};
use crate::engine::physics::{body::presets, PhysicsWorld, RigidBodyHandle};
use crate::game::characters::{
    Character, CharacterId, CharacterKind, CharacterManager, InputOutcome,
};
use crate::game::contact;
use crate::game::effects::{EffectVolumeInstance, SpawnOutcome, VolumeId, VortexSpawner};

/// One playable level: static geometry, the active character and its vortex
pub struct Scene {
    physics: PhysicsWorld,
    characters: CharacterManager,
    spawner: VortexSpawner,
    stepper: FixedStepper,
    /// Character the camera follows and input drives
    active: CharacterId,
    /// Sensor bodies of live vortices
    vortex_bodies: HashMap<VolumeId, RigidBodyHandle>,
}

impl Scene {
    /// Create a scene with one character of `kind` standing at `spawn`
    pub fn new(kind: CharacterKind, spawn: Vec2) -> Result<Self, SceneError> {
        let mut physics = PhysicsWorld::new();
        let mut characters = CharacterManager::new();
        let active = characters.spawn_character(kind, &mut physics, spawn, Vec2::ZERO)?;

        Ok(Self {
            physics,
            characters,
            spawner: VortexSpawner::new(kind.vortex())?,
            stepper: FixedStepper::new(),
            active,
            vortex_bodies: HashMap::new(),
        })
    }

    /// Add a floor or platform; `size` is the full width and height
    pub fn add_ground(&mut self, center: Vec2, size: Vec2) -> RigidBodyHandle {
        self.physics.add_static(
            presets::fixed_body(center.x, center.y),
            presets::ground_collider(size.x, size.y),
        )
    }

    /// Add a clingable wall; `size` is the full width and height
    pub fn add_wall(&mut self, center: Vec2, size: Vec2) -> RigidBodyHandle {
        self.physics.add_static(
            presets::fixed_body(center.x, center.y),
            presets::wall_collider(size.x, size.y),
        )
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn spawner(&self) -> &VortexSpawner {
        &self.spawner
    }

    pub fn stepper(&self) -> &FixedStepper {
        &self.stepper
    }

    pub fn stepper_mut(&mut self) -> &mut FixedStepper {
        &mut self.stepper
    }

    /// Character the camera should follow
    pub fn followed(&self) -> CharacterId {
        self.active
    }

    pub fn active_character(&self) -> Option<&Character> {
        self.characters.get(self.active)
    }

    pub fn characters(&self) -> &CharacterManager {
        &self.characters
    }

    /// Run one rendered frame: switches, input, then the fixed steps it owes
    ///
    /// Returns the number of fixed steps taken.
    pub fn frame(&mut self, input: &PlayerInput, frame_time: f32) -> u32 {
        let switch = if input.just_pressed(Action::SwitchAir) {
            Some(CharacterKind::Air)
        } else if input.just_pressed(Action::SwitchFire) {
            Some(CharacterKind::Fire)
        } else {
            None
        };
        if let Some(kind) = switch {
            if let Err(err) = self.switch_character(kind) {
                log::warn!("character switch failed: {}", err);
            }
        }

        self.handle_input(&input.snapshot());

        let steps = self.stepper.begin_frame(frame_time);
        let dt = self.stepper.fixed_timestep();
        for _ in 0..steps {
            self.fixed_step(dt);
        }
        steps
    }

    /// Input phase for the active character
    pub fn handle_input(&mut self, input: &InputSnapshot) -> InputOutcome {
        let Some(character) = self.characters.get_mut(self.active) else {
            log::warn!("{}", SceneError::UnknownCharacter(self.active));
            return InputOutcome::default();
        };

        let outcome = match character.handle_input(&mut self.physics, input) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("{}", err);
                return InputOutcome::default();
            }
        };

        if outcome.spawn_requested {
            self.spawn_vortex();
        }
        outcome
    }

    /// Throw a vortex from the active character
    pub fn spawn_vortex(&mut self) -> Option<SpawnOutcome> {
        let character = self.characters.get(self.active)?;
        let origin = character.position(&self.physics)?;
        let facing = character.state_machine.motion().facing;

        let outcome = self
            .spawner
            .spawn(origin, facing, character.id, &self.physics);

        if let SpawnOutcome::Spawned { id, position, .. } = outcome {
            let config = self.spawner.config();
            let handle = self.physics.add_static(
                presets::fixed_body(position.x, position.y),
                presets::vortex_collider(config.width, config.height),
            );
            self.vortex_bodies.insert(id, handle);
        }
        Some(outcome)
    }

    /// Advance the simulation by one fixed step
    pub fn fixed_step(&mut self, dt: f32) {
        // Contacts from the previous physics step
        for event in self.physics.drain_collision_events() {
            for (id, contact) in contact::classify(&self.physics, &event) {
                let Some(character) = self.characters.get_mut(id) else {
                    continue;
                };
                if let Err(err) = character.apply_contact(&mut self.physics, contact) {
                    log::warn!("{}", err);
                }
            }
        }

        if let Some(expired) = self.spawner.advance(dt) {
            self.despawn_vortex(expired);
        }

        for character in self.characters.all_mut() {
            if let Err(err) = character.fixed_update(&mut self.physics, dt) {
                log::warn!("{}", err);
            }
        }

        self.physics.set_timestep(dt);
        self.physics.step();
    }

    /// Remove a vortex and tell every character it is gone
    ///
    /// Rapier's stop event for a removed sensor cannot be classified, so
    /// this is the only exit the occupants get. The owner may have been
    /// switched out by now; whoever is inside gets the exit either way.
    fn despawn_vortex(&mut self, volume: EffectVolumeInstance) {
        if let Some(handle) = self.vortex_bodies.remove(&volume.id) {
            self.physics.remove_rigid_body(handle);
        }
        if self.characters.get(volume.owner).is_none() {
            log::debug!("vortex {} outlived its owner {}", volume.id, volume.owner);
        }

        for character in self.characters.all_mut() {
            if let Err(err) = character.notify_volume_destroyed(&mut self.physics) {
                log::warn!("{}", err);
            }
        }
    }

    /// Replace the active character with one of `kind` at the same spot
    ///
    /// Velocity carries over. Switching to the kind already active does
    /// nothing.
    pub fn switch_character(&mut self, kind: CharacterKind) -> Result<CharacterId, SceneError> {
        let current = self
            .characters
            .get(self.active)
            .ok_or(SceneError::UnknownCharacter(self.active))?;
        if current.kind == kind {
            return Ok(self.active);
        }

        let position = current
            .position(&self.physics)
            .ok_or(SceneError::MissingBody(current.id))?;
        let velocity = current.velocity(&self.physics).unwrap_or(Vec2::ZERO);
        let outgoing = current.id;

        self.spawner.set_config(kind.vortex())?;
        self.characters.remove(outgoing, &mut self.physics);
        let incoming = self
            .characters
            .spawn_character(kind, &mut self.physics, position, velocity)?;
        self.active = incoming;

        log::info!(
            "switched character {} -> {} ({})",
            outgoing,
            incoming,
            kind.name()
        );
        Ok(incoming)
    }
}
