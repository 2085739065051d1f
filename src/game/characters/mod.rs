// Character system
//
// This module contains everything related to playable characters:
// - Character data structure and management
// - Tuning presets and capability profiles
// - Movement state machine and its timed reversions

pub mod character;
pub mod state;
pub mod stats;
pub mod timers;

// Re-export commonly used types
pub use character::{Character, CharacterId, CharacterManager};
pub use state::{
    CharacterMotionState, CharacterState, CharacterStateMachine, Facing, GravityAuthority,
    InputOutcome,
};
pub use stats::{CharacterKind, CharacterStats, MovementProfile, AIR_STATS, FIRE_STATS};
pub use timers::{TimerArena, TimerSlot};
