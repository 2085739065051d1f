// Input handling system
//
// Polling the keyboard or a gamepad is the host's business. The host calls
// `PlayerInput::press`/`release` for whatever it polled, then takes one
// `InputSnapshot` per frame and hands it to the movement core.
//
// ## Usage Example
//
// ```rust
// use vortex_runner::engine::input::{Action, PlayerInput};
//
// let mut player = PlayerInput::new(0);
// player.press(Action::MoveRight);
// player.press(Action::Jump);
//
// let snapshot = player.snapshot();
// assert!(snapshot.jump_pressed);
//
// // End of frame: edges are cleared, holds survive
// player.update();
// ```

pub mod action;
pub mod player;

// Re-export commonly used types
pub use action::Action;
pub use player::{InputSnapshot, PlayerInput};
