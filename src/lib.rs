// Movement and timed-state core for a 2D elemental platformer

pub mod core;
pub mod engine;
pub mod game;
