// Error types for configuration and scene setup
//
// The running simulation never fails: ignored inputs, a busy spawner or a
// stale timer target are local outcomes. Errors only exist at setup time.

use thiserror::Error;

use crate::game::characters::CharacterId;

/// Invalid tuning values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be zero or greater, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be at least 1.0, got {value}")]
    MultiplierBelowOne { field: &'static str, value: f32 },
}

impl ConfigError {
    /// Reject NaN and infinities
    pub fn finite(field: &'static str, value: f32) -> Result<f32, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NotFinite { field, value })
        }
    }

    /// Require a strictly positive, finite value
    pub fn positive(field: &'static str, value: f32) -> Result<f32, Self> {
        if Self::finite(field, value)? > 0.0 {
            Ok(value)
        } else {
            Err(Self::NotPositive { field, value })
        }
    }

    /// Require a finite value that is not negative
    pub fn non_negative(field: &'static str, value: f32) -> Result<f32, Self> {
        if Self::finite(field, value)? >= 0.0 {
            Ok(value)
        } else {
            Err(Self::Negative { field, value })
        }
    }

    /// Require a gravity multiplier that never weakens gravity
    pub fn multiplier(field: &'static str, value: f32) -> Result<f32, Self> {
        if Self::finite(field, value)? >= 1.0 {
            Ok(value)
        } else {
            Err(Self::MultiplierBelowOne { field, value })
        }
    }
}

/// Failures while building or rewiring a scene
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("character {0} has no physics body")]
    MissingBody(CharacterId),

    #[error("no character with id {0}")]
    UnknownCharacter(CharacterId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_accepts_and_rejects() {
        assert_eq!(ConfigError::positive("speed", 2.0), Ok(2.0));
        assert_eq!(
            ConfigError::positive("speed", 0.0),
            Err(ConfigError::NotPositive {
                field: "speed",
                value: 0.0
            })
        );
    }

    #[test]
    fn test_finite_rejects_nan() {
        assert!(matches!(
            ConfigError::finite("gravity", f32::NAN),
            Err(ConfigError::NotFinite { field: "gravity", .. })
        ));
    }

    #[test]
    fn test_multiplier_floor() {
        assert!(ConfigError::multiplier("fall", 1.0).is_ok());
        assert!(ConfigError::multiplier("fall", 0.9).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::non_negative("threshold", -1.0).unwrap_err();
        assert_eq!(err.to_string(), "threshold must be zero or greater, got -1");

        let err = SceneError::MissingBody(7);
        assert_eq!(err.to_string(), "character 7 has no physics body");
    }
}
