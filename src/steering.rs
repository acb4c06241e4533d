//! Steering signals from pointer and device orientation.
//!
//! The [`SteeringAdapter`] resource collects raw input from the host (cursor
//! position, orientation readings, sensor availability and permission) and
//! turns it into at most one normalized [`Steering`] per frame. Missing or
//! refused sensors never produce an error on the per-frame path; they just
//! mean no bias.

use bevy::prelude::*;

use crate::config::SteeringConfig;
use crate::error::SteeringError;

/// Where a steering signal came from. Selects the gain.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringSource {
    Pointer,
    Orientation,
}

/// A normalized steering direction.
///
/// Both components are in `[-1, 1]`. Construction clamps out-of-range values
/// and replaces NaN or infinite components with zero.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    direction: Vec2,
    source: SteeringSource,
}

impl Steering {
    pub fn new(direction: Vec2, source: SteeringSource) -> Self {
        Self {
            direction: Vec2::new(unit_clamp(direction.x), unit_clamp(direction.y)),
            source,
        }
    }

    /// Horizontal (x) and vertical (y) components.
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    #[inline]
    pub fn source(&self) -> SteeringSource {
        self.source
    }
}

fn unit_clamp(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Availability of the orientation sensor.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorStatus {
    /// No sensor, or not yet reported by the host.
    #[default]
    Unsupported,
    /// Sensor present but the platform wants a user-initiated permission request.
    PermissionRequired,
    /// Request made, answer not in yet.
    PermissionPending,
    /// User refused.
    Denied,
    /// Readings may be used.
    Granted,
}

impl SensorStatus {
    /// Whether orientation readings may drive steering.
    #[inline]
    pub fn is_usable(self) -> bool {
        self == SensorStatus::Granted
    }
}

/// One device-orientation reading, in degrees.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationReading {
    /// Front-back tilt. Positive tilts the top of the device away from the user.
    pub beta: f32,
    /// Left-right tilt. Positive tilts the device to the right.
    pub gamma: f32,
    /// Compass heading. Recorded but not used for the bias.
    pub alpha: f32,
}

impl OrientationReading {
    pub fn new(beta: f32, gamma: f32, alpha: f32) -> Self {
        Self { beta, gamma, alpha }
    }

    /// Normalized direction: `gamma` drives x, `beta` (relative to the neutral
    /// pitch) drives y. Each angle is clamped to `±clamp_degrees` first.
    pub fn direction(&self, config: &SteeringConfig) -> Vec2 {
        let limit = if config.clamp_degrees.is_finite() && config.clamp_degrees > 0.0 {
            config.clamp_degrees
        } else {
            SteeringConfig::default().clamp_degrees
        };
        let normalize = |degrees: f32| {
            if degrees.is_finite() {
                degrees.clamp(-limit, limit) / limit
            } else {
                0.0
            }
        };
        Vec2::new(
            normalize(self.gamma),
            normalize(self.beta - config.neutral_pitch_degrees),
        )
    }
}

/// Host-facing input collector for steering.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use floating_field::prelude::*;
///
/// let config = SteeringConfig::default();
/// let mut adapter = SteeringAdapter::detect(true, true);
/// assert_eq!(adapter.status(), SensorStatus::PermissionRequired);
///
/// // From a click handler:
/// adapter.request_permission().unwrap();
/// // A second click does not ask again.
/// assert!(adapter.request_permission().is_err());
///
/// adapter.resolve_permission(true).unwrap();
/// adapter.set_orientation(OrientationReading::new(0.0, 35.0, 0.0));
/// let steering = adapter.resolve(&config).unwrap();
/// assert_eq!(steering.direction(), Vec2::new(1.0, 0.0));
/// ```
#[derive(Resource, Reflect, Debug, Clone, Default)]
#[reflect(Resource)]
pub struct SteeringAdapter {
    status: SensorStatus,
    orientation: Option<OrientationReading>,
    pointer: Option<Vec2>,
}

impl SteeringAdapter {
    /// Adapter initialised from startup feature detection.
    pub fn detect(sensor_present: bool, needs_permission: bool) -> Self {
        let status = match (sensor_present, needs_permission) {
            (false, _) => SensorStatus::Unsupported,
            (true, true) => SensorStatus::PermissionRequired,
            (true, false) => SensorStatus::Granted,
        };
        info!(?status, "orientation sensor detected");
        Self {
            status,
            ..default()
        }
    }

    #[inline]
    pub fn status(&self) -> SensorStatus {
        self.status
    }

    /// Ask for sensor permission. Call from a user gesture.
    ///
    /// Only the first call on a sensor that needs permission does anything.
    pub fn request_permission(&mut self) -> Result<(), SteeringError> {
        match self.status {
            SensorStatus::Unsupported => Err(SteeringError::SensorUnavailable),
            SensorStatus::PermissionRequired => {
                self.status = SensorStatus::PermissionPending;
                debug!("orientation permission requested");
                Ok(())
            }
            status => Err(SteeringError::PermissionAlreadyRequested { status }),
        }
    }

    /// Record the answer to a pending permission request.
    pub fn resolve_permission(&mut self, granted: bool) -> Result<SensorStatus, SteeringError> {
        if self.status != SensorStatus::PermissionPending {
            return Err(SteeringError::NoPendingRequest);
        }
        self.status = if granted {
            SensorStatus::Granted
        } else {
            SensorStatus::Denied
        };
        info!(status = ?self.status, "orientation permission resolved");
        Ok(self.status)
    }

    /// Latest orientation reading from the host.
    pub fn set_orientation(&mut self, reading: OrientationReading) {
        self.orientation = Some(reading);
    }

    pub fn clear_orientation(&mut self) {
        self.orientation = None;
    }

    /// Latest pointer position, screen-normalized to `[-1, 1]` with y up.
    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = Some(position);
    }

    /// The pointer left the surface.
    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Orientation reading, only if the sensor may be used.
    pub fn orientation(&self) -> Option<OrientationReading> {
        self.orientation.filter(|_| self.status.is_usable())
    }

    /// The steering signal for this frame, or `None` for no bias.
    pub fn resolve(&self, config: &SteeringConfig) -> Option<Steering> {
        if !config.enabled {
            return None;
        }

        let orientation = self
            .orientation()
            .map(|reading| Steering::new(reading.direction(config), SteeringSource::Orientation));
        let pointer = self
            .pointer
            .map(|position| Steering::new(position, SteeringSource::Pointer));

        if config.prefer_orientation {
            orientation.or(pointer)
        } else {
            pointer.or(orientation)
        }
    }
}
