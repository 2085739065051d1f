// Character tuning and capability profiles
//
// The two playable elements share one state machine. They differ only in
// the numbers below and in the three `MovementProfile` switches.

use crate::core::ConfigError;
use crate::game::effects::{VortexConfig, AIR_VORTEX, FIRE_VORTEX};

/// Normal component above which a contact counts as standing support
pub const GROUND_NORMAL_THRESHOLD: f32 = 0.5;

/// How long gravity stays boosted after leaving a vortex
pub const GRAVITY_BOOST_DURATION: f32 = 2.0;

/// Gravity multiplier applied while the boost is live
pub const GRAVITY_BOOST_MULTIPLIER: f32 = 2.0;

/// Which elemental character a body plays as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterKind {
    /// Base variant: speed-gated wall cling, no wall-jump
    Air,
    /// Wall-jump variant with the one-shot latch
    Fire,
}

impl CharacterKind {
    /// Tuning preset for this kind
    pub fn stats(self) -> CharacterStats {
        match self {
            Self::Air => AIR_STATS,
            Self::Fire => FIRE_STATS,
        }
    }

    /// Vortex this kind throws
    pub fn vortex(self) -> VortexConfig {
        match self {
            Self::Air => AIR_VORTEX,
            Self::Fire => FIRE_VORTEX,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Fire => "fire",
        }
    }
}

/// Capability switches that separate the variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovementProfile {
    /// Wall-jump pushes off the wall and may only happen once per grounding
    pub wall_jump_latch: bool,
    /// Leaving a `Ground` surface clears `grounded`
    pub ground_exit_clears_grounded: bool,
    /// Pushing away from the clung wall ends the cling early
    pub wall_exit_on_reversal: bool,
}

/// Numeric tuning for one character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterStats {
    // Movement
    /// Horizontal speed while grounded (units/second)
    pub ground_speed: f32,
    /// Horizontal speed while airborne (units/second)
    pub air_speed: f32,
    /// Vertical velocity set by a jump
    pub jump_force: f32,

    // Jump shaping
    /// Extra gravity while falling
    pub fall_multiplier: f32,
    /// Extra gravity while rising without holding jump
    pub low_jump_multiplier: f32,

    // Wall cling
    /// Minimum |velocity.x| for a wall contact to start a cling
    pub wall_speed_threshold: f32,
    /// How long a cling lasts without being cancelled
    pub wall_state_duration: f32,

    // Vortex
    /// Gravity scale applied while inside a vortex (negative lifts)
    pub vortex_gravity_scale: f32,

    // Dimensions (for physics collider)
    /// Character width in world units
    pub width: f32,
    /// Character height in world units
    pub height: f32,

    pub profile: MovementProfile,
}

/// Base variant, tuned as shipped
pub const AIR_STATS: CharacterStats = CharacterStats {
    ground_speed: 15.0,
    air_speed: 8.0,
    jump_force: 15.0,

    fall_multiplier: 4.0,
    low_jump_multiplier: 1.2,

    wall_speed_threshold: 0.0,
    wall_state_duration: 3.0,

    vortex_gravity_scale: -2.0,

    width: 1.0,
    height: 2.0,

    profile: MovementProfile {
        wall_jump_latch: false,
        ground_exit_clears_grounded: false,
        wall_exit_on_reversal: false,
    },
};

/// Wall-jump variant: same numbers, different switches
pub const FIRE_STATS: CharacterStats = CharacterStats {
    profile: MovementProfile {
        wall_jump_latch: true,
        ground_exit_clears_grounded: true,
        wall_exit_on_reversal: true,
    },
    ..AIR_STATS
};

impl Default for CharacterStats {
    fn default() -> Self {
        AIR_STATS
    }
}

impl CharacterStats {
    /// Horizontal speed for the current support
    pub fn speed(&self, grounded: bool) -> f32 {
        if grounded {
            self.ground_speed
        } else {
            self.air_speed
        }
    }

    /// Check every field a running character relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::positive("ground_speed", self.ground_speed)?;
        ConfigError::non_negative("air_speed", self.air_speed)?;
        ConfigError::positive("jump_force", self.jump_force)?;
        ConfigError::multiplier("fall_multiplier", self.fall_multiplier)?;
        ConfigError::multiplier("low_jump_multiplier", self.low_jump_multiplier)?;
        ConfigError::non_negative("wall_speed_threshold", self.wall_speed_threshold)?;
        ConfigError::positive("wall_state_duration", self.wall_state_duration)?;
        ConfigError::finite("vortex_gravity_scale", self.vortex_gravity_scale)?;
        ConfigError::positive("width", self.width)?;
        ConfigError::positive("height", self.height)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = CharacterStats::default();
        assert_eq!(stats.ground_speed, 15.0);
        assert_eq!(stats.air_speed, 8.0);
        assert_eq!(stats.wall_state_duration, 3.0);
        assert!(!stats.profile.wall_jump_latch);
    }

    #[test]
    fn test_presets_differ_only_in_profile() {
        let air = CharacterKind::Air.stats();
        let fire = CharacterKind::Fire.stats();

        assert_eq!(air.jump_force, fire.jump_force);
        assert_eq!(air.vortex_gravity_scale, fire.vortex_gravity_scale);
        assert_ne!(air.profile, fire.profile);
        assert!(fire.profile.wall_jump_latch);
        assert!(fire.profile.ground_exit_clears_grounded);
        assert!(
            CharacterKind::Air.vortex().spawn_distance
                > CharacterKind::Fire.vortex().spawn_distance
        );
    }

    #[test]
    fn test_speed_by_support() {
        let stats = AIR_STATS;
        assert_eq!(stats.speed(true), 15.0);
        assert_eq!(stats.speed(false), 8.0);
    }

    #[test]
    fn test_presets_validate() {
        assert!(AIR_STATS.validate().is_ok());
        assert!(FIRE_STATS.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_weak_fall() {
        let stats = CharacterStats {
            fall_multiplier: 0.5,
            ..AIR_STATS
        };
        assert_eq!(
            stats.validate(),
            Err(ConfigError::MultiplierBelowOne {
                field: "fall_multiplier",
                value: 0.5
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_cling() {
        let stats = CharacterStats {
            wall_state_duration: 0.0,
            ..FIRE_STATS
        };
        assert!(stats.validate().is_err());
    }
}
