// Character movement state machine
//
// Flags (grounded, on wall, in vortex) drive horizontal speed, jump
// eligibility and the jump-arc gravity rules. Gravity scale is never
// written piecemeal: every mutation ends in `resolve_gravity`, which picks
// exactly one authority in the order wall > vortex > boost > default.

use glam::Vec2;

use crate::core::math::unit_intent;
use crate::engine::input::InputSnapshot;
use crate::engine::physics::MotionBody;
use crate::game::contact::SurfaceTag;

use super::stats::{
    CharacterStats, GRAVITY_BOOST_DURATION, GRAVITY_BOOST_MULTIPLIER, GROUND_NORMAL_THRESHOLD,
};
use super::timers::{TimerArena, TimerSlot};

/// Horizontal facing, taken from the last nonzero input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, 1 for right
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Facing implied by a horizontal value, `None` for zero
    pub fn from_x(x: f32) -> Option<Self> {
        if x > 0.0 {
            Some(Self::Right)
        } else if x < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }
}

/// Which state currently owns the gravity scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GravityAuthority {
    /// Clinging: no gravity at all
    WallCling,
    /// Inside a vortex: the vortex gravity scale
    EffectVolume,
    /// Just left a vortex: default doubled
    Boost,
    /// Nothing special going on
    Default,
}

/// Coarse state, derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterState {
    Grounded,
    Airborne,
    OnWall,
    InVortex,
}

impl CharacterState {
    pub fn is_grounded(self) -> bool {
        self == Self::Grounded
    }

    pub fn is_airborne(self) -> bool {
        matches!(self, Self::Airborne | Self::InVortex)
    }
}

/// Per-character flags the movement rules read and write
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterMotionState {
    pub grounded: bool,
    pub on_wall: bool,
    /// Set by a wall-jump, cleared only by landing
    pub has_wall_jumped: bool,
    pub in_effect_volume: bool,
    pub facing: Facing,
    /// Captured once from the body; every reversion returns here
    pub default_gravity_scale: f32,
    pub current_gravity_scale: f32,
    pub authority: GravityAuthority,
}

impl CharacterMotionState {
    fn new(default_gravity_scale: f32) -> Self {
        Self {
            grounded: false,
            on_wall: false,
            has_wall_jumped: false,
            in_effect_volume: false,
            facing: Facing::Right,
            default_gravity_scale,
            current_gravity_scale: default_gravity_scale,
            authority: GravityAuthority::Default,
        }
    }
}

/// What the input phase did, for the caller to act on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub jumped: bool,
    /// The vortex action fired; the scene owns the spawner
    pub spawn_requested: bool,
    /// Facing flipped (presentation only)
    pub turned: bool,
}

/// State machine that handles character movement and timed reversions
#[derive(Debug)]
pub struct CharacterStateMachine {
    stats: CharacterStats,
    motion: CharacterMotionState,
    timers: TimerArena,
    /// Unit horizontal intent from the last input phase
    intent: f32,
    /// Any rise input held during the last input phase
    jump_held: bool,
    /// Side of the character the clung wall is on
    wall_face: Facing,
}

impl CharacterStateMachine {
    /// Create a machine for a body whose current gravity scale is the default
    pub fn new(stats: CharacterStats, default_gravity_scale: f32) -> Self {
        Self {
            stats,
            motion: CharacterMotionState::new(default_gravity_scale),
            timers: TimerArena::new(),
            intent: 0.0,
            jump_held: false,
            wall_face: Facing::Right,
        }
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn motion(&self) -> &CharacterMotionState {
        &self.motion
    }

    pub fn timers(&self) -> &TimerArena {
        &self.timers
    }

    pub fn intent(&self) -> f32 {
        self.intent
    }

    /// Get the current state
    pub fn state(&self) -> CharacterState {
        if self.motion.on_wall {
            CharacterState::OnWall
        } else if self.motion.in_effect_volume {
            CharacterState::InVortex
        } else if self.motion.grounded {
            CharacterState::Grounded
        } else {
            CharacterState::Airborne
        }
    }

    fn log_transition(&self, before: CharacterState, cause: &str) {
        let after = self.state();
        if before != after {
            log::debug!("{:?} -> {:?} ({})", before, after, cause);
        }
    }

    /// Input phase, once per rendered frame
    pub fn handle_input(
        &mut self,
        input: &InputSnapshot,
        body: &mut impl MotionBody,
    ) -> InputOutcome {
        let mut outcome = InputOutcome::default();

        self.intent = unit_intent(input.horizontal);
        self.jump_held = input.jump_held;

        if let Some(facing) = Facing::from_x(self.intent) {
            if facing != self.motion.facing {
                self.motion.facing = facing;
                outcome.turned = true;
            }
        }

        if input.jump_pressed {
            if self.motion.grounded || self.motion.on_wall {
                outcome.jumped = self.jump(body);
            } else {
                log::trace!("jump ignored: no support");
            }
        }

        outcome.spawn_requested = input.action_pressed;
        outcome
    }

    /// Jump from the ground or off a wall
    ///
    /// Returns false, changing nothing, when the character has no support
    /// (or, with the wall-jump latch, already used its wall-jump).
    pub fn jump(&mut self, body: &mut impl MotionBody) -> bool {
        let before = self.state();
        let mut velocity = body.velocity();

        if self.stats.profile.wall_jump_latch {
            if self.motion.on_wall && !self.motion.has_wall_jumped {
                // Push away from the wall
                velocity = Vec2::new(
                    self.wall_face.opposite().sign() * self.stats.ground_speed,
                    self.stats.jump_force,
                );
                self.motion.has_wall_jumped = true;
            } else if self.motion.grounded {
                velocity.y = self.stats.jump_force;
                self.motion.has_wall_jumped = false;
            } else {
                log::trace!("jump ignored: wall-jump already used");
                return false;
            }
        } else if self.motion.grounded || self.motion.on_wall {
            velocity.y = self.stats.jump_force;
        } else {
            log::trace!("jump ignored: no support");
            return false;
        }

        body.set_velocity(velocity);
        self.motion.grounded = false;
        self.motion.on_wall = false;
        self.timers.cancel(TimerSlot::WallCling);
        self.restore_default_gravity(body);
        self.log_transition(before, "jump");
        true
    }

    /// Fixed-timestep update: timers first, then movement, then gravity
    pub fn fixed_update(&mut self, dt: f32, gravity: Vec2, body: &mut impl MotionBody) {
        self.advance_timers(dt, body);

        let mut velocity = body.velocity();
        if self.motion.on_wall {
            // Full stick: no slide, no drift
            velocity = Vec2::ZERO;
        } else {
            velocity.x = self.intent * self.stats.speed(self.motion.grounded);

            if velocity.y < 0.0 {
                velocity.y += gravity.y * (self.stats.fall_multiplier - 1.0) * dt;
            } else if velocity.y > 0.0 && !self.jump_held && !self.motion.in_effect_volume {
                velocity.y += gravity.y * (self.stats.low_jump_multiplier - 1.0) * dt;
            }
        }
        body.set_velocity(velocity);

        self.resolve_gravity(body);
    }

    fn advance_timers(&mut self, dt: f32, body: &mut impl MotionBody) {
        if self.stats.profile.wall_exit_on_reversal
            && self.motion.on_wall
            && !self.motion.has_wall_jumped
            && Facing::from_x(self.intent) == Some(self.wall_face.opposite())
        {
            let before = self.state();
            self.timers.exit_early(TimerSlot::WallCling);
            self.motion.on_wall = false;
            self.restore_default_gravity(body);
            self.log_transition(before, "pushed off wall");
        }

        for slot in self.timers.advance(dt) {
            match slot {
                TimerSlot::WallCling => self.on_wall_timer(body),
                TimerSlot::GravityBoost => {
                    log::debug!("gravity boost over");
                    self.resolve_gravity(body);
                }
                // Volume lifetimes belong to the spawner
                TimerSlot::EffectLifetime => {}
            }
        }
    }

    fn on_wall_timer(&mut self, body: &mut impl MotionBody) {
        let latched = self.stats.profile.wall_jump_latch && self.motion.has_wall_jumped;
        if !self.motion.on_wall || latched {
            log::trace!("wall timer fired on a finished cling");
            return;
        }

        let before = self.state();
        self.motion.on_wall = false;
        self.restore_default_gravity(body);
        self.log_transition(before, "cling expired");
    }

    /// A physical contact began
    ///
    /// `normal` points from the surface toward the character.
    pub fn on_contact_enter(&mut self, normal: Vec2, tag: SurfaceTag, body: &mut impl MotionBody) {
        let before = self.state();

        if normal.y > GROUND_NORMAL_THRESHOLD {
            if self.motion.in_effect_volume {
                log::trace!("ground contact ignored inside vortex");
            } else {
                self.land(body);
            }
        } else if tag == SurfaceTag::Wall {
            self.try_cling(normal, body);
        }

        self.log_transition(before, "contact");
    }

    fn land(&mut self, body: &mut impl MotionBody) {
        self.motion.grounded = true;
        if self.stats.profile.wall_jump_latch {
            self.motion.has_wall_jumped = false;
        }
        if self.motion.on_wall {
            self.timers.cancel(TimerSlot::WallCling);
            self.motion.on_wall = false;
            self.restore_default_gravity(body);
        }
    }

    fn try_cling(&mut self, normal: Vec2, body: &mut impl MotionBody) {
        if self.motion.grounded {
            log::trace!("wall contact ignored while grounded");
            return;
        }
        if self.stats.profile.wall_jump_latch && self.motion.has_wall_jumped {
            log::trace!("wall contact ignored: wall-jump already used");
            return;
        }
        if body.velocity().x.abs() < self.stats.wall_speed_threshold {
            log::trace!("wall contact too slow to cling");
            return;
        }

        self.timers
            .start(TimerSlot::WallCling, self.stats.wall_state_duration);
        self.motion.on_wall = true;
        // The normal points away from the wall
        self.wall_face = Facing::from_x(-normal.x).unwrap_or(self.motion.facing);
        body.set_velocity(Vec2::ZERO);
        self.resolve_gravity(body);
    }

    /// A physical contact ended
    pub fn on_contact_exit(&mut self, tag: SurfaceTag, body: &mut impl MotionBody) {
        let before = self.state();

        match tag {
            SurfaceTag::Ground if self.stats.profile.ground_exit_clears_grounded => {
                self.motion.grounded = false;
            }
            SurfaceTag::Wall => {
                self.timers.cancel(TimerSlot::WallCling);
                self.motion.on_wall = false;
                self.restore_default_gravity(body);
            }
            _ => {}
        }

        self.log_transition(before, "contact exit");
    }

    /// Started overlapping a vortex
    pub fn on_volume_enter(&mut self, body: &mut impl MotionBody) {
        let before = self.state();

        self.motion.in_effect_volume = true;
        self.motion.grounded = false;
        if self.timers.cancel(TimerSlot::GravityBoost) {
            log::debug!("gravity boost cancelled by vortex re-entry");
        }
        self.resolve_gravity(body);

        self.log_transition(before, "vortex enter");
    }

    /// Stopped overlapping a vortex: boost gravity for a while
    pub fn on_volume_exit(&mut self, body: &mut impl MotionBody) {
        if !self.motion.in_effect_volume {
            log::trace!("vortex exit ignored: not inside");
            return;
        }
        let before = self.state();

        self.motion.in_effect_volume = false;
        self.timers
            .start(TimerSlot::GravityBoost, GRAVITY_BOOST_DURATION);
        self.resolve_gravity(body);

        self.log_transition(before, "vortex exit");
    }

    /// The live vortex is gone; counts as an exit only when inside
    pub fn on_volume_destroyed(&mut self, body: &mut impl MotionBody) {
        if self.motion.in_effect_volume {
            self.on_volume_exit(body);
        }
    }

    fn restore_default_gravity(&mut self, body: &mut impl MotionBody) {
        self.timers.cancel(TimerSlot::GravityBoost);
        self.resolve_gravity(body);
    }

    /// Recompute gravity authority from the flags and write the scale
    pub fn resolve_gravity(&mut self, body: &mut impl MotionBody) {
        let default = self.motion.default_gravity_scale;

        let (authority, scale) = if self.motion.on_wall {
            (GravityAuthority::WallCling, 0.0)
        } else if self.motion.in_effect_volume {
            (
                GravityAuthority::EffectVolume,
                self.stats.vortex_gravity_scale,
            )
        } else if self.timers.is_live(TimerSlot::GravityBoost) {
            (GravityAuthority::Boost, default * GRAVITY_BOOST_MULTIPLIER)
        } else {
            (GravityAuthority::Default, default)
        };

        self.motion.authority = authority;
        self.motion.current_gravity_scale = scale;
        body.set_gravity_scale(scale);
    }
}
