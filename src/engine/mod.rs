// Engine modules: physics, input, fixed-step timing

pub mod game_loop;
pub mod input;
pub mod physics;
