// Vortex spawner
//
// At most one vortex exists at a time. A spawn picks a spot ahead of and
// above the character, pulls it back toward the character while the path
// or the spot itself is blocked, then runs the vortex's lifetime on the
// effect-lifetime timer slot.

use glam::Vec2;

use crate::core::math::retract_x;
use crate::core::ConfigError;
use crate::engine::physics::{CollisionGroups, GeometryProbe};
use crate::game::characters::state::Facing;
use crate::game::characters::timers::{TimerArena, TimerSlot};
use crate::game::characters::CharacterId;

/// Identifier of a spawned vortex
pub type VolumeId = u32;

/// Placement and lifetime tuning for vortices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VortexConfig {
    /// Horizontal offset ahead of the character
    pub spawn_distance: f32,
    /// Vertical offset above the character
    pub vertical_offset: f32,
    /// How far each retraction moves the candidate back
    pub retract_step: f32,
    /// Seconds before the vortex disappears
    pub lifetime: f32,
    pub width: f32,
    pub height: f32,
    /// Height of the overlap probe box
    pub probe_height: f32,
    /// Extra width added to the overlap probe box
    pub probe_margin: f32,
}

/// Vortex thrown by the base character
pub const AIR_VORTEX: VortexConfig = VortexConfig {
    spawn_distance: 3.0,
    vertical_offset: 3.0,
    retract_step: 0.1,
    lifetime: 5.0,
    width: 1.0,
    height: 4.0,
    probe_height: 0.1,
    probe_margin: 0.1,
};

/// Closer, shorter-lived vortex of the wall-jump character
pub const FIRE_VORTEX: VortexConfig = VortexConfig {
    spawn_distance: 2.0,
    lifetime: 3.0,
    ..AIR_VORTEX
};

impl Default for VortexConfig {
    fn default() -> Self {
        AIR_VORTEX
    }
}

impl VortexConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("spawn_distance", self.spawn_distance)?;
        ConfigError::finite("vertical_offset", self.vertical_offset)?;
        ConfigError::positive("retract_step", self.retract_step)?;
        ConfigError::positive("lifetime", self.lifetime)?;
        ConfigError::positive("width", self.width)?;
        ConfigError::positive("height", self.height)?;
        ConfigError::positive("probe_height", self.probe_height)?;
        ConfigError::non_negative("probe_margin", self.probe_margin)?;
        Ok(())
    }

    /// Number of retractions a spawn may spend
    pub fn retract_budget(&self) -> u32 {
        (self.spawn_distance / self.retract_step).round() as u32
    }

    fn probe_half_extents(&self) -> Vec2 {
        Vec2::new(self.width + self.probe_margin, self.probe_height) * 0.5
    }
}

/// A live (or just expired) vortex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectVolumeInstance {
    pub id: VolumeId,
    pub position: Vec2,
    pub lifetime: f32,
    pub active: bool,
    /// Character to notify when the vortex goes away
    pub owner: CharacterId,
}

/// Result of a spawn request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnOutcome {
    Spawned {
        id: VolumeId,
        position: Vec2,
        /// The retraction budget ran out before the spot was clear
        obstructed: bool,
    },
    /// A vortex is already active; nothing happened
    Busy,
}

/// Places vortices and tracks the single active one
#[derive(Debug)]
pub struct VortexSpawner {
    config: VortexConfig,
    active: Option<EffectVolumeInstance>,
    timers: TimerArena,
    next_id: VolumeId,
}

impl VortexSpawner {
    pub fn new(config: VortexConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            active: None,
            timers: TimerArena::new(),
            next_id: 0,
        })
    }

    pub fn config(&self) -> &VortexConfig {
        &self.config
    }

    /// Use different tuning for future spawns; a live vortex keeps its own
    pub fn set_config(&mut self, config: VortexConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&EffectVolumeInstance> {
        self.active.as_ref()
    }

    /// Time left on the active vortex
    pub fn remaining(&self) -> Option<f32> {
        self.timers.remaining(TimerSlot::EffectLifetime)
    }

    /// Find where a vortex thrown from `origin` toward `facing` would land
    ///
    /// Returns the position and whether it is still blocked after spending
    /// the whole retraction budget.
    pub fn placement(
        &self,
        origin: Vec2,
        facing: Facing,
        probe: &impl GeometryProbe,
    ) -> (Vec2, bool) {
        let config = &self.config;
        let mask = CollisionGroups::solid();
        let half_extents = config.probe_half_extents();

        let blocked = |candidate: Vec2| {
            probe.linecast(origin, candidate, mask)
                || probe.overlap_box(candidate, half_extents, mask)
        };

        let mut candidate = origin
            + Vec2::new(
                facing.sign() * config.spawn_distance,
                config.vertical_offset,
            );

        let mut budget = config.retract_budget();
        let mut obstructed = blocked(candidate);
        while obstructed && budget > 0 {
            candidate = retract_x(candidate, origin.x, config.retract_step);
            budget -= 1;
            obstructed = blocked(candidate);
        }

        (candidate, obstructed)
    }

    /// Spawn a vortex for `owner` unless one is already active
    pub fn spawn(
        &mut self,
        origin: Vec2,
        facing: Facing,
        owner: CharacterId,
        probe: &impl GeometryProbe,
    ) -> SpawnOutcome {
        if self.is_active() {
            log::info!("vortex already active, spawn skipped");
            return SpawnOutcome::Busy;
        }

        let (position, obstructed) = self.placement(origin, facing, probe);
        if obstructed {
            log::warn!(
                "no clear vortex position within budget, placing at ({:.2}, {:.2})",
                position.x,
                position.y
            );
        }

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        self.active = Some(EffectVolumeInstance {
            id,
            position,
            lifetime: self.config.lifetime,
            active: true,
            owner,
        });
        self.timers
            .start(TimerSlot::EffectLifetime, self.config.lifetime);

        log::info!(
            "vortex {} spawned at ({:.2}, {:.2}) for character {}",
            id,
            position.x,
            position.y,
            owner
        );

        SpawnOutcome::Spawned {
            id,
            position,
            obstructed,
        }
    }

    /// Count down the active vortex, handing it back once it expires
    pub fn advance(&mut self, dt: f32) -> Option<EffectVolumeInstance> {
        if !self.timers.advance(dt).contains(&TimerSlot::EffectLifetime) {
            return None;
        }

        let mut expired = self.active.take()?;
        expired.active = false;
        log::info!("vortex {} expired", expired.id);
        Some(expired)
    }

    /// Remove the active vortex immediately, without waiting for expiry
    #[cfg(test)]
    pub(crate) fn dismiss(&mut self) -> Option<EffectVolumeInstance> {
        self.timers.cancel(TimerSlot::EffectLifetime);
        let mut dismissed = self.active.take()?;
        dismissed.active = false;
        Some(dismissed)
    }
}
