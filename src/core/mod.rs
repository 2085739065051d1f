// Shared helpers and error types

pub mod error;
pub mod math;

pub use error::{ConfigError, SceneError};
