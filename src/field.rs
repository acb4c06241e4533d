//! The per-body force field.
//!
//! Pure math, no ECS access. Given the simulation time, a body's position and
//! phase, and the frame's steering signal, [`field_forces`] returns the force
//! and torque for this tick. [`evaluate`] adds the one-shot trigger impulse on
//! top, driven by the body's [`TriggerTracker`].
//!
//! ```text
//! force_i  = -p_i * force_multiplier
//!          + osc_amplitude_i * trig_i(osc_frequency_i * t + phase_i)
//!          + bias_i
//! torque_i = torque_amplitude * trig_i(t + phase_i)
//!
//! trig_x = sin, trig_y = cos, trig_z = sin
//! ```
//!
//! Mixing `cos` into the y axis keeps the three axes out of step, so bodies
//! trace loops instead of moving along a line.

use bevy::prelude::*;

use crate::body::PhaseOffsets;
use crate::config::{ForceFieldConfig, SteeringConfig};
use crate::error::FieldError;
use crate::steering::{Steering, SteeringSource};
use crate::trigger::TriggerTracker;

/// Inputs for one body on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldInput {
    /// Simulation time in seconds.
    pub time: f32,
    /// Position read from the physics engine this tick.
    pub position: Vec3,
    /// The body's fixed phase offsets.
    pub phase: PhaseOffsets,
    /// Steering for this frame, if any.
    pub steering: Option<Steering>,
    /// Trigger count snapshot for this frame.
    pub trigger_count: u64,
}

/// Result of evaluating the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOutput {
    /// Continuous force for this tick.
    pub force: Vec3,
    /// Continuous torque for this tick.
    pub torque: Vec3,
    /// One-shot impulse, present only on the tick a trigger is observed.
    pub impulse: Option<Vec3>,
}

/// Restoring spring toward the origin.
#[inline]
pub fn centering(position: Vec3, force_multiplier: f32) -> Vec3 {
    -position * force_multiplier
}

/// Per-axis sinusoidal drift.
#[inline]
pub fn oscillation(config: &ForceFieldConfig, time: f32, phase: PhaseOffsets) -> Vec3 {
    let phase = phase.get();
    let arg = config.osc_frequency * time + phase;
    config.osc_amplitude * Vec3::new(arg.x.sin(), arg.y.cos(), arg.z.sin())
}

/// Tumbling torque. Same axis pairing as the oscillation, not scaled by frequency.
#[inline]
pub fn tumble(torque_amplitude: f32, time: f32, phase: PhaseOffsets) -> Vec3 {
    let arg = Vec3::splat(time) + phase.get();
    torque_amplitude * Vec3::new(arg.x.sin(), arg.y.cos(), arg.z.sin())
}

/// World-space bias for a steering signal.
///
/// Each axis is clamped to `[-gain, gain]` where the gain depends on the
/// signal's source.
pub fn steering_bias(steering: Steering, config: &SteeringConfig) -> Vec3 {
    let gain = match steering.source() {
        SteeringSource::Pointer => config.pointer_strength,
        SteeringSource::Orientation => config.gyro_strength,
    }
    .abs();
    let world = config.mapping.to_world(steering.direction()) * gain;
    world.clamp(Vec3::splat(-gain), Vec3::splat(gain))
}

/// Radial impulse pushing the body away from the origin.
///
/// `None` at the origin, where there is no outward direction.
#[inline]
pub fn trigger_impulse(position: Vec3, impulse_magnitude: f32) -> Option<Vec3> {
    position.try_normalize().map(|dir| dir * impulse_magnitude)
}

/// Continuous force and torque, without touching trigger state.
///
/// Deterministic in its arguments.
pub fn field_forces(
    field: &ForceFieldConfig,
    steering_config: &SteeringConfig,
    input: &FieldInput,
) -> Result<(Vec3, Vec3), FieldError> {
    if !input.position.is_finite() {
        return Err(FieldError::NonFinitePosition {
            position: input.position,
        });
    }

    let base = centering(input.position, field.force_multiplier)
        + oscillation(field, input.time, input.phase);

    let force = match input.steering {
        Some(steering) if steering_config.enabled => base + steering_bias(steering, steering_config),
        _ => base,
    };

    let torque = tumble(field.torque_amplitude, input.time, input.phase);
    Ok((force, torque))
}

/// Full evaluation for one body on one tick.
///
/// Updates `tracker` and attaches the trigger impulse when the count
/// increased. On error the tracker is left untouched, so the trigger is still
/// pending on the next good tick.
pub fn evaluate(
    field: &ForceFieldConfig,
    steering_config: &SteeringConfig,
    input: &FieldInput,
    tracker: &mut TriggerTracker,
) -> Result<FieldOutput, FieldError> {
    let (force, torque) = field_forces(field, steering_config, input)?;

    let impulse = if tracker.observe(input.trigger_count) {
        trigger_impulse(input.position, field.impulse_magnitude)
    } else {
        None
    };

    Ok(FieldOutput {
        force,
        torque,
        impulse,
    })
}
