// Per-player input state management

use super::action::Action;
use std::collections::HashSet;

/// One frame of input as the movement core consumes it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Horizontal axis in [-1, 1]
    pub horizontal: f32,
    /// A rise action went down this frame
    pub jump_pressed: bool,
    /// Any rise action is currently held
    pub jump_held: bool,
    /// The vortex action went down this frame
    pub action_pressed: bool,
}

impl InputSnapshot {
    /// Snapshot with only a horizontal axis, nothing pressed
    pub fn axis(horizontal: f32) -> Self {
        Self {
            horizontal: horizontal.clamp(-1.0, 1.0),
            ..Self::default()
        }
    }
}

/// Represents the input state for a single player
#[derive(Debug)]
pub struct PlayerInput {
    /// Player ID
    player_id: usize,

    /// Actions that are currently pressed this frame
    pressed: HashSet<Action>,

    /// Actions that were just pressed this frame (press events)
    just_pressed: HashSet<Action>,

    /// Actions that were just released this frame (release events)
    just_released: HashSet<Action>,
}

impl PlayerInput {
    /// Create a new player input state
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    /// Get the player ID
    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Update input state for a new frame
    /// Call this once per frame after the snapshot was consumed
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Raw horizontal axis from the two movement actions
    pub fn horizontal(&self) -> f32 {
        let mut horizontal = 0.0;

        if self.is_pressed(Action::MoveLeft) {
            horizontal -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            horizontal += 1.0;
        }

        horizontal
    }

    /// Collapse this frame's state into what the movement core reads
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            horizontal: self.horizontal(),
            jump_pressed: self.just_pressed.iter().any(|action| action.is_rise()),
            jump_held: self.pressed.iter().any(|action| action.is_rise()),
            action_pressed: self.just_pressed(Action::SpawnVortex),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_input_creation() {
        let input = PlayerInput::new(0);
        assert_eq!(input.player_id(), 0);
        assert!(!input.is_pressed(Action::Jump));
    }

    #[test]
    fn test_press_action() {
        let mut input = PlayerInput::new(0);
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        assert!(input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_release_action() {
        let mut input = PlayerInput::new(0);
        input.press(Action::Jump);
        input.update();
        input.release(Action::Jump);
        assert!(!input.is_pressed(Action::Jump));
        assert!(input.just_released(Action::Jump));
    }

    #[test]
    fn test_just_pressed_cleared_on_update() {
        let mut input = PlayerInput::new(0);
        input.press(Action::Jump);
        input.update();
        assert!(input.is_pressed(Action::Jump));
        assert!(!input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_release_unpressed_action() {
        let mut input = PlayerInput::new(0);
        input.release(Action::Jump);
        assert!(!input.just_released(Action::Jump));
    }

    #[test]
    fn test_horizontal_cancels_out() {
        let mut input = PlayerInput::new(0);
        input.press(Action::MoveLeft);
        assert_eq!(input.horizontal(), -1.0);
        input.press(Action::MoveRight);
        assert_eq!(input.horizontal(), 0.0);
    }

    #[test]
    fn test_snapshot_edges_and_holds() {
        let mut input = PlayerInput::new(0);
        input.press(Action::MoveRight);
        input.press(Action::Ascend);
        input.press(Action::SpawnVortex);

        let snapshot = input.snapshot();
        assert_eq!(snapshot.horizontal, 1.0);
        assert!(snapshot.jump_pressed);
        assert!(snapshot.jump_held);
        assert!(snapshot.action_pressed);

        input.update();
        let snapshot = input.snapshot();
        assert!(!snapshot.jump_pressed);
        assert!(snapshot.jump_held, "holding up still counts as rising");
        assert!(!snapshot.action_pressed);
    }

    #[test]
    fn test_reset() {
        let mut input = PlayerInput::new(0);
        input.press(Action::Jump);
        input.reset();
        assert_eq!(input.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_axis_snapshot_clamps() {
        assert_eq!(InputSnapshot::axis(3.0).horizontal, 1.0);
        assert!(!InputSnapshot::axis(0.5).jump_pressed);
    }
}
