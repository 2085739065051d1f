// Cancellable delayed state reversions
//
// Each slot holds at most one pending timer. Starting a slot that is still
// live replaces the old timer; cancelling only stops the scheduled action,
// the caller applies whatever compensating state change it needs.

/// Remaining time at or below this counts as elapsed
pub const TIMER_EPSILON: f32 = 1e-4;

/// Which reversion a timer performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    /// Ends a wall cling
    WallCling,
    /// Restores default gravity after the post-vortex boost
    GravityBoost,
    /// Destroys an effect volume
    EffectLifetime,
}

impl TimerSlot {
    pub const COUNT: usize = 3;

    /// Every slot, in firing order
    pub const ALL: [TimerSlot; Self::COUNT] = [
        TimerSlot::WallCling,
        TimerSlot::GravityBoost,
        TimerSlot::EffectLifetime,
    ];

    fn index(self) -> usize {
        match self {
            Self::WallCling => 0,
            Self::GravityBoost => 1,
            Self::EffectLifetime => 2,
        }
    }
}

/// How a timer left the scheduled state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEnd {
    /// Ran to completion; its action must run
    Fired,
    /// Stopped by an explicit cancel or replaced by a restart
    Cancelled,
    /// Stopped because its owner's exit condition held
    EarlyExit,
}

/// A live timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingTimer {
    pub slot: TimerSlot,
    pub remaining: f32,
    /// Bumped on every start so a restarted slot is distinguishable
    pub generation: u32,
}

/// Fixed arena of timers indexed by slot
#[derive(Debug, Default)]
pub struct TimerArena {
    slots: [Option<PendingTimer>; TimerSlot::COUNT],
    generation: u32,
}

impl TimerArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `slot` to fire after `duration`, replacing a live timer
    ///
    /// Returns the generation of the new timer.
    pub fn start(&mut self, slot: TimerSlot, duration: f32) -> u32 {
        if self.stop(slot, TimerEnd::Cancelled).is_some() {
            log::debug!("{:?} timer superseded", slot);
        }

        self.generation = self.generation.wrapping_add(1);
        self.slots[slot.index()] = Some(PendingTimer {
            slot,
            remaining: duration.max(0.0),
            generation: self.generation,
        });
        self.generation
    }

    /// Cancel a live timer. Its action will not run.
    pub fn cancel(&mut self, slot: TimerSlot) -> bool {
        self.stop(slot, TimerEnd::Cancelled).is_some()
    }

    /// Stop a live timer because its exit condition held
    pub fn exit_early(&mut self, slot: TimerSlot) -> bool {
        self.stop(slot, TimerEnd::EarlyExit).is_some()
    }

    fn stop(&mut self, slot: TimerSlot, end: TimerEnd) -> Option<PendingTimer> {
        let timer = self.slots[slot.index()].take()?;
        log::trace!("{:?} timer ended: {:?}", slot, end);
        Some(timer)
    }

    /// Whether `slot` has a timer waiting to fire
    pub fn is_live(&self, slot: TimerSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// The live timer in `slot`, if any
    pub fn get(&self, slot: TimerSlot) -> Option<&PendingTimer> {
        self.slots[slot.index()].as_ref()
    }

    /// Time left before `slot` fires
    pub fn remaining(&self, slot: TimerSlot) -> Option<f32> {
        self.get(slot).map(|timer| timer.remaining)
    }

    /// Count down every live timer by `dt`
    ///
    /// Timers that elapse are removed and returned in slot order; each one
    /// is returned exactly once.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerSlot> {
        let mut fired = Vec::new();

        for slot in TimerSlot::ALL {
            let Some(timer) = self.slots[slot.index()].as_mut() else {
                continue;
            };

            timer.remaining -= dt;
            if timer.remaining <= TIMER_EPSILON {
                self.slots[slot.index()] = None;
                log::trace!("{:?} timer ended: {:?}", slot, TimerEnd::Fired);
                fired.push(slot);
            }
        }

        fired
    }
}
