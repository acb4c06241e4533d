//! Per-body components.
//!
//! A floating body carries its phase offsets, its trigger tracker, and a force
//! accumulator. Display attributes ride along in [`BodyAppearance`] but the
//! field never reads them.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::trigger::TriggerTracker;

/// Per-axis phase offsets, each in `[0, 2π)`.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseOffsets(Vec3);

impl PhaseOffsets {
    /// All phases zero.
    pub const ZERO: Self = Self(Vec3::ZERO);

    /// Wrap arbitrary angles into `[0, 2π)`.
    pub fn new(phase: Vec3) -> Self {
        Self(Vec3::new(wrap(phase.x), wrap(phase.y), wrap(phase.z)))
    }

    /// Draw each axis uniformly from `[0, 2π)`.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self(Vec3::new(
            rng.random_range(0.0..TAU),
            rng.random_range(0.0..TAU),
            rng.random_range(0.0..TAU),
        ))
    }

    #[inline]
    pub fn get(&self) -> Vec3 {
        self.0
    }
}

fn wrap(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Marker and phase record for a body driven by the force field.
///
/// The phase is fixed at construction. There is no way to change it on a live
/// body; respawn the body instead.
///
/// Spawning it alone adds a tracker starting at count 0, which fires once if
/// clicks already happened. Use [`FloatingBodyBundle`] to start at the current
/// count.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
#[require(TriggerTracker, FieldForces)]
pub struct FloatingBody {
    phase: PhaseOffsets,
}

impl FloatingBody {
    pub fn new(phase: PhaseOffsets) -> Self {
        Self { phase }
    }

    /// The body's phase offsets.
    #[inline]
    pub fn phase(&self) -> PhaseOffsets {
        self.phase
    }
}

/// Display attributes. Ignored by the field.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct BodyAppearance {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for BodyAppearance {
    fn default() -> Self {
        Self {
            color: Color::srgb(0.9, 0.9, 0.92),
            roughness: 0.4,
            metalness: 0.1,
        }
    }
}

impl BodyAppearance {
    /// Builder: set colour.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Force and torque accumulated by the field systems during one tick.
///
/// Backends that share the engine's force accumulator with other code add into
/// this component, and push the total to the engine at the end of the tick.
/// Next tick the previous total is subtracted again, so forces written by
/// other systems survive untouched.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct FieldForces {
    force: Vec3,
    torque: Vec3,
    applied_force: Vec3,
    applied_torque: Vec3,
    impulse: Option<Vec3>,
}

impl FieldForces {
    /// Accumulate a force for this tick.
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Accumulate a torque for this tick.
    pub fn add_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Park a trigger impulse until the impulse systems run.
    pub fn set_impulse(&mut self, impulse: Vec3) {
        self.impulse = Some(impulse);
    }

    /// Take the parked impulse, leaving none.
    pub fn take_impulse(&mut self) -> Option<Vec3> {
        self.impulse.take()
    }

    /// Force accumulated so far this tick.
    pub fn pending_force(&self) -> Vec3 {
        self.force
    }

    /// Torque accumulated so far this tick.
    pub fn pending_torque(&self) -> Vec3 {
        self.torque
    }

    /// Force pushed to the engine on the last evaluated tick.
    pub fn applied_force(&self) -> Vec3 {
        self.applied_force
    }

    /// Torque pushed to the engine on the last evaluated tick.
    pub fn applied_torque(&self) -> Vec3 {
        self.applied_torque
    }

    /// Start a new tick. Returns what was applied last tick, to be removed
    /// from the engine, and clears everything.
    pub fn prepare_new_frame(&mut self) -> (Vec3, Vec3) {
        let previous = (self.applied_force, self.applied_torque);
        *self = Self::default();
        previous
    }

    /// End the tick. Returns the accumulated totals, to be added to the
    /// engine, and remembers them for the next [`prepare_new_frame`](Self::prepare_new_frame).
    pub fn finalize_frame(&mut self) -> (Vec3, Vec3) {
        self.applied_force = self.force;
        self.applied_torque = self.torque;
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
        (self.applied_force, self.applied_torque)
    }
}

/// Components every floating body needs, apart from physics.
#[derive(Bundle, Default)]
pub struct FloatingBodyBundle {
    pub body: FloatingBody,
    pub tracker: TriggerTracker,
    pub forces: FieldForces,
    pub appearance: BodyAppearance,
}

impl FloatingBodyBundle {
    /// Bundle for a body spawned while the trigger counter reads `trigger_count`.
    pub fn new(phase: PhaseOffsets, trigger_count: u64) -> Self {
        Self {
            body: FloatingBody::new(phase),
            tracker: TriggerTracker::starting_at(trigger_count),
            forces: FieldForces::default(),
            appearance: BodyAppearance::default(),
        }
    }

    /// Builder: set display attributes.
    pub fn with_appearance(mut self, appearance: BodyAppearance) -> Self {
        self.appearance = appearance;
        self
    }
}
