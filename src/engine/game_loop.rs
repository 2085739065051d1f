//! Fixed timestep driver
//!
//! Converts variable frame time into a bounded number of fixed physics
//! steps. The host feeds it each frame's elapsed time; nothing here reads
//! the wall clock, so a scripted run replays identically.

use crate::core::ConfigError;

/// Target physics/update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Maximum number of physics steps per frame to prevent spiral of death
pub const MAX_PHYSICS_STEPS: u32 = 5;

/// Fixed-step accumulator state
#[derive(Debug)]
pub struct FixedStepper {
    /// Accumulated time for fixed timestep updates
    accumulator: f32,

    /// Length of one fixed step
    step: f32,

    /// Whether the simulation is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,

    /// Total simulated time
    simulated: f32,
}

impl FixedStepper {
    /// Create a stepper running at `FIXED_TIMESTEP`
    pub fn new() -> Self {
        Self::from_valid_step(FIXED_TIMESTEP)
    }

    /// Create a stepper with a custom step length
    ///
    /// The step must be positive and finite, or the accumulator could
    /// never drain.
    pub fn with_step(step: f32) -> Result<Self, ConfigError> {
        ConfigError::positive("step", step)?;
        Ok(Self::from_valid_step(step))
    }

    fn from_valid_step(step: f32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            paused: false,
            frame_count: 0,
            update_count: 0,
            simulated: 0.0,
        }
    }

    /// Begin a new frame, returns the number of fixed updates to run
    pub fn begin_frame(&mut self, frame_time: f32) -> u32 {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused || !frame_time.is_finite() || frame_time <= 0.0 {
            return 0;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= self.step && updates < MAX_PHYSICS_STEPS {
            self.accumulator -= self.step;
            updates += 1;
        }

        // Drop the backlog instead of carrying it into the next frame
        if updates == MAX_PHYSICS_STEPS && self.accumulator >= self.step {
            log::debug!(
                "dropping {:.3}s of simulation backlog",
                self.accumulator - self.accumulator % self.step
            );
            self.accumulator %= self.step;
        }

        self.update_count += updates as u64;
        self.simulated += updates as f32 * self.step;
        updates
    }

    /// Get the fixed timestep for physics updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        self.step
    }

    /// Interpolation alpha between the last two physics steps
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Total number of frames begun
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated time in seconds
    pub fn simulated_secs(&self) -> f32 {
        self.simulated
    }

    /// Check if the simulation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the simulation
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    /// Resume the simulation
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = 0.0;
            log::info!("Simulation resumed");
        }
    }
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new()
    }
}
