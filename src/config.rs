//! Field configuration.
//!
//! Scene-level constants for the force field, the steering bias, and scene
//! population. Everything is a flat set of named numbers with documented
//! defaults. The structs are Bevy resources (and [`ForceFieldConfig`] is also a
//! component, to override the scene values on a single body), and can be
//! loaded from JSON through [`FieldSettings`].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters of the per-body force field.
///
/// Used as a resource for the whole scene. Insert it as a component on a body
/// to give that body its own parameters.
#[derive(Component, Resource, Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[reflect(Component, Resource)]
#[serde(default)]
pub struct ForceFieldConfig {
    /// Gain of the centering spring (`force = -position * force_multiplier`).
    pub force_multiplier: f32,

    /// Oscillation amplitude per axis.
    pub osc_amplitude: Vec3,

    /// Oscillation angular frequency per axis (radians/second).
    pub osc_frequency: Vec3,

    /// Amplitude of the tumbling torque on every axis.
    pub torque_amplitude: f32,

    /// Magnitude of the radial impulse fired on a trigger.
    pub impulse_magnitude: f32,
}

impl Default for ForceFieldConfig {
    fn default() -> Self {
        Self {
            force_multiplier: 0.4,
            osc_amplitude: Vec3::new(0.3, 0.5, 0.2),
            osc_frequency: Vec3::new(0.6, 0.8, 0.5),
            torque_amplitude: 0.05,
            impulse_magnitude: 4.0,
        }
    }
}

impl ForceFieldConfig {
    /// Slow drift with a soft spring.
    pub fn calm() -> Self {
        Self {
            force_multiplier: 0.2,
            osc_amplitude: Vec3::new(0.15, 0.25, 0.1),
            osc_frequency: Vec3::new(0.3, 0.4, 0.25),
            torque_amplitude: 0.02,
            impulse_magnitude: 2.0,
        }
    }

    /// Stiffer spring, faster bobbing, stronger clicks.
    pub fn lively() -> Self {
        Self {
            force_multiplier: 0.8,
            osc_amplitude: Vec3::new(0.6, 1.0, 0.4),
            osc_frequency: Vec3::new(1.2, 1.5, 1.0),
            torque_amplitude: 0.1,
            impulse_magnitude: 8.0,
        }
    }

    /// Builder: set the centering gain.
    pub fn with_force_multiplier(mut self, multiplier: f32) -> Self {
        self.force_multiplier = multiplier;
        self
    }

    /// Builder: set oscillation amplitude and frequency per axis.
    pub fn with_oscillation(mut self, amplitude: Vec3, frequency: Vec3) -> Self {
        self.osc_amplitude = amplitude;
        self.osc_frequency = frequency;
        self
    }

    /// Builder: set torque amplitude.
    pub fn with_torque_amplitude(mut self, amplitude: f32) -> Self {
        self.torque_amplitude = amplitude;
        self
    }

    /// Builder: set trigger impulse magnitude.
    pub fn with_impulse_magnitude(mut self, magnitude: f32) -> Self {
        self.impulse_magnitude = magnitude;
        self
    }

    /// Reject non-finite or negative gains.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("force_multiplier", self.force_multiplier)?;
        finite_vec("osc_amplitude", self.osc_amplitude)?;
        finite_vec("osc_frequency", self.osc_frequency)?;
        finite("torque_amplitude", self.torque_amplitude)?;
        non_negative("impulse_magnitude", self.impulse_magnitude)?;
        Ok(())
    }
}

/// A world axis a steering component can be mapped onto.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldAxis {
    X,
    Y,
    Z,
}

impl WorldAxis {
    /// Unit vector along this axis.
    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            WorldAxis::X => Vec3::X,
            WorldAxis::Y => Vec3::Y,
            WorldAxis::Z => Vec3::Z,
        }
    }
}

/// How the two steering components map onto world directions.
///
/// With the default mapping a rightward tilt or pointer offset pulls bodies
/// toward +X, and a forward tilt or upward pointer offset toward +Y. The
/// inversion flags flip a component before it is mapped.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringMapping {
    /// World axis driven by the horizontal component.
    pub horizontal: WorldAxis,
    /// World axis driven by the vertical component.
    pub vertical: WorldAxis,
    /// Negate the horizontal component.
    pub invert_horizontal: bool,
    /// Negate the vertical component.
    pub invert_vertical: bool,
}

impl Default for SteeringMapping {
    fn default() -> Self {
        Self {
            horizontal: WorldAxis::X,
            vertical: WorldAxis::Y,
            invert_horizontal: false,
            invert_vertical: false,
        }
    }
}

impl SteeringMapping {
    /// Horizontal axis inverted: tilting right pushes bodies left.
    pub fn mirrored() -> Self {
        Self {
            invert_horizontal: true,
            ..default()
        }
    }

    /// Map a normalized steering direction to a world-space direction.
    pub fn to_world(&self, direction: Vec2) -> Vec3 {
        let h = if self.invert_horizontal { -direction.x } else { direction.x };
        let v = if self.invert_vertical { -direction.y } else { direction.y };
        self.horizontal.unit() * h + self.vertical.unit() * v
    }
}

/// Steering bias parameters.
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct SteeringConfig {
    /// Master switch. When false the field never sees a steering signal.
    pub enabled: bool,

    /// Gain applied to pointer steering.
    pub pointer_strength: f32,

    /// Gain applied to device-orientation steering.
    pub gyro_strength: f32,

    /// Raw tilt angles are clamped to `±clamp_degrees` and then divided by it.
    pub clamp_degrees: f32,

    /// Front-back tilt treated as neutral (degrees). Phones are rarely held flat.
    pub neutral_pitch_degrees: f32,

    /// Use orientation over pointer when both are available.
    pub prefer_orientation: bool,

    /// Axis mapping and sign policy.
    pub mapping: SteeringMapping,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pointer_strength: 1.5,
            gyro_strength: 2.0,
            clamp_degrees: 35.0,
            neutral_pitch_degrees: 0.0,
            prefer_orientation: true,
            mapping: SteeringMapping::default(),
        }
    }
}

impl SteeringConfig {
    /// Steering turned off entirely.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..default()
        }
    }

    /// Builder: set pointer and orientation gains.
    pub fn with_strengths(mut self, pointer: f32, gyro: f32) -> Self {
        self.pointer_strength = pointer;
        self.gyro_strength = gyro;
        self
    }

    /// Builder: set the tilt clamp.
    pub fn with_clamp_degrees(mut self, degrees: f32) -> Self {
        self.clamp_degrees = degrees;
        self
    }

    /// Builder: set the neutral front-back tilt.
    pub fn with_neutral_pitch(mut self, degrees: f32) -> Self {
        self.neutral_pitch_degrees = degrees;
        self
    }

    /// Builder: set the axis mapping.
    pub fn with_mapping(mut self, mapping: SteeringMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("pointer_strength", self.pointer_strength)?;
        non_negative("gyro_strength", self.gyro_strength)?;
        finite("neutral_pitch_degrees", self.neutral_pitch_degrees)?;
        if !(self.clamp_degrees > 0.0 && self.clamp_degrees <= 90.0) {
            return Err(ConfigError::invalid(
                "clamp_degrees",
                format!("must be in (0, 90], got {}", self.clamp_degrees),
            ));
        }
        Ok(())
    }
}

/// Scene population parameters.
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of bodies spawned at startup.
    pub body_count: usize,

    /// Half-extents of the spawn volume, centered on the origin.
    pub spread: Vec3,

    /// Collider radius handed to the physics backend.
    pub body_radius: f32,

    /// Every n-th body gets the next accent colour. 0 disables accents.
    pub accent_every: usize,

    /// RNG seed. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            body_count: 12,
            spread: Vec3::new(4.0, 3.0, 2.0),
            body_radius: 0.5,
            accent_every: 3,
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Builder: set body count.
    pub fn with_body_count(mut self, count: usize) -> Self {
        self.body_count = count;
        self
    }

    /// Builder: set spawn half-extents.
    pub fn with_spread(mut self, spread: Vec3) -> Self {
        self.spread = spread;
        self
    }

    /// Builder: use a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        finite_vec("spread", self.spread)?;
        if self.spread.min_element() < 0.0 {
            return Err(ConfigError::invalid("spread", "half-extents must be non-negative"));
        }
        if !(self.body_radius > 0.0 && self.body_radius.is_finite()) {
            return Err(ConfigError::invalid(
                "body_radius",
                format!("must be positive, got {}", self.body_radius),
            ));
        }
        Ok(())
    }
}

/// All settings of a floating field scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub field: ForceFieldConfig,
    pub steering: SteeringConfig,
    pub scene: SceneConfig,
    /// Evaluate the field every n-th fixed tick (1 = every tick).
    pub tick_every: u32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            field: ForceFieldConfig::default(),
            steering: SteeringConfig::default(),
            scene: SceneConfig::default(),
            tick_every: 1,
        }
    }
}

impl FieldSettings {
    /// Parse settings from JSON. Missing keys keep their defaults.
    ///
    /// ```rust
    /// use floating_field::config::FieldSettings;
    ///
    /// let settings = FieldSettings::from_json(r#"{ "field": { "force_multiplier": 0.6 } }"#).unwrap();
    /// assert_eq!(settings.field.force_multiplier, 0.6);
    /// assert_eq!(settings.tick_every, 1);
    /// ```
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.field.validate()?;
        self.steering.validate()?;
        self.scene.validate()?;
        if self.tick_every == 0 {
            return Err(ConfigError::invalid("tick_every", "must be at least 1"));
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::invalid(field, format!("must be non-negative, got {value}")));
    }
    Ok(())
}

fn finite_vec(field: &'static str, value: Vec3) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_field_config_is_valid() {
        assert!(ForceFieldConfig::default().validate().is_ok());
        assert!(ForceFieldConfig::calm().validate().is_ok());
        assert!(ForceFieldConfig::lively().validate().is_ok());
    }

    #[test]
    fn lively_is_stiffer_than_calm() {
        assert!(ForceFieldConfig::lively().force_multiplier > ForceFieldConfig::calm().force_multiplier);
    }

    #[test]
    fn negative_gain_rejected() {
        let config = ForceFieldConfig::default().with_force_multiplier(-1.0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "force_multiplier", .. }));
    }

    #[test]
    fn nan_amplitude_rejected() {
        let config = ForceFieldConfig::default().with_oscillation(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ONE);
        assert!(config.validate().is_err());
    }

    #[test]
    fn mapping_default_is_identity_on_xy() {
        let mapping = SteeringMapping::default();
        assert_eq!(mapping.to_world(Vec2::new(0.5, -0.25)), Vec3::new(0.5, -0.25, 0.0));
    }

    #[test]
    fn mapping_mirrored_flips_horizontal() {
        let mapping = SteeringMapping::mirrored();
        assert_eq!(mapping.to_world(Vec2::new(1.0, 1.0)), Vec3::new(-1.0, 1.0, 0.0));
    }

    #[test]
    fn mapping_vertical_onto_z() {
        let mapping = SteeringMapping {
            vertical: WorldAxis::Z,
            invert_vertical: true,
            ..default()
        };
        assert_eq!(mapping.to_world(Vec2::new(0.0, 1.0)), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn clamp_degrees_out_of_range_rejected() {
        assert!(SteeringConfig::default().with_clamp_degrees(0.0).validate().is_err());
        assert!(SteeringConfig::default().with_clamp_degrees(120.0).validate().is_err());
        assert!(SteeringConfig::default().with_clamp_degrees(45.0).validate().is_ok());
    }

    #[test]
    fn scene_config_rejects_zero_radius() {
        let config = SceneConfig {
            body_radius: 0.0,
            ..default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn settings_from_partial_json_keeps_defaults() {
        let settings = FieldSettings::from_json(
            r#"{
                "steering": { "mapping": { "invert_horizontal": true } },
                "scene": { "body_count": 3, "seed": 7 },
                "tick_every": 2
            }"#,
        )
        .unwrap();

        assert!(settings.steering.mapping.invert_horizontal);
        assert_eq!(settings.steering.mapping.horizontal, WorldAxis::X);
        assert_eq!(settings.scene.body_count, 3);
        assert_eq!(settings.scene.seed, Some(7));
        assert_eq!(settings.tick_every, 2);
        assert_eq!(settings.field, ForceFieldConfig::default());
    }

    #[test]
    fn settings_reject_zero_cadence() {
        let err = FieldSettings::from_json(r#"{ "tick_every": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tick_every", .. }));
    }

    #[test]
    fn settings_reject_malformed_json() {
        let err = FieldSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
