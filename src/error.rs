//! Error types.
//!
//! None of these are fatal to the simulation. Steering errors leave the bias at
//! zero, field errors skip one body for one tick, and config errors are reported
//! to whoever loads the settings.

use bevy::prelude::*;
use thiserror::Error;

/// Errors returned by the steering adapter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringError {
    /// The device has no orientation sensor.
    #[error("device orientation sensor is not available")]
    SensorUnavailable,

    /// A permission request was already made. Requests are one-shot.
    #[error("orientation permission was already requested (status: {status:?})")]
    PermissionAlreadyRequested {
        /// Status at the time of the repeated request.
        status: crate::steering::SensorStatus,
    },

    /// A permission result arrived while no request was pending.
    #[error("no orientation permission request is pending")]
    NoPendingRequest,
}

/// Errors produced while evaluating the force field for a body.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FieldError {
    /// The physics engine reported a NaN or infinite position.
    #[error("body position {position} is not finite")]
    NonFinitePosition {
        /// The offending position.
        position: Vec3,
    },
}

/// Errors produced while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings document could not be parsed.
    #[error("failed to parse field settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A parameter is outside its valid range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the parameter.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_message_names_field() {
        let err = ConfigError::invalid("force_multiplier", "must be finite");
        assert_eq!(
            err.to_string(),
            "invalid value for `force_multiplier`: must be finite"
        );
    }

    #[test]
    fn parse_error_converts() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
