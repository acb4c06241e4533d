//! Per-tick field systems.
//!
//! These run in `FixedUpdate`, in the order given by
//! [`FloatingFieldSet`](crate::FloatingFieldSet). They are generic over the
//! physics backend.

use bevy::prelude::*;

use crate::backend::FieldPhysicsBackend;
use crate::body::{FieldForces, FloatingBody};
use crate::config::{ForceFieldConfig, SteeringConfig};
use crate::field::{self, FieldInput};
use crate::steering::{Steering, SteeringAdapter};
use crate::trigger::{TriggerCounter, TriggerTracker};

/// Steering and trigger count as they stood when the tick started.
///
/// Every body in the tick sees the same values, even if input arrives while
/// the tick is running.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSnapshot {
    pub steering: Option<Steering>,
    pub trigger_count: u64,
}

/// Copy the shared inputs into [`FrameSnapshot`].
pub fn capture_frame_snapshot(
    adapter: Option<Res<SteeringAdapter>>,
    config: Option<Res<SteeringConfig>>,
    counter: Option<Res<TriggerCounter>>,
    mut snapshot: ResMut<FrameSnapshot>,
) {
    let config = config.map(|c| *c).unwrap_or_default();
    *snapshot = FrameSnapshot {
        steering: adapter.and_then(|adapter| adapter.resolve(&config)),
        trigger_count: counter.map(|c| c.count()).unwrap_or(0),
    };
}

/// Evaluate the force field for every floating body.
///
/// Positions are read through the backend on every call. A body with its own
/// [`ForceFieldConfig`] component uses that instead of the scene resource.
/// Trigger impulses are parked in [`FieldForces`] for
/// [`apply_trigger_impulses`].
pub fn apply_force_field<B: FieldPhysicsBackend>(world: &mut World) {
    let time = world
        .get_resource::<Time>()
        .map(|t| t.elapsed_secs())
        .unwrap_or(0.0);
    let scene_field = world
        .get_resource::<ForceFieldConfig>()
        .copied()
        .unwrap_or_default();
    let steering_config = world
        .get_resource::<SteeringConfig>()
        .copied()
        .unwrap_or_default();
    let snapshot = world
        .get_resource::<FrameSnapshot>()
        .copied()
        .unwrap_or_default();

    let bodies: Vec<(Entity, FloatingBody, ForceFieldConfig, TriggerTracker)> = world
        .query::<(
            Entity,
            &FloatingBody,
            Option<&ForceFieldConfig>,
            &TriggerTracker,
        )>()
        .iter(world)
        .map(|(e, body, config, tracker)| (e, *body, config.copied().unwrap_or(scene_field), *tracker))
        .collect();

    for (entity, body, config, mut tracker) in bodies {
        let input = FieldInput {
            time,
            position: B::get_position(world, entity),
            phase: body.phase(),
            steering: snapshot.steering,
            trigger_count: snapshot.trigger_count,
        };
        let last_seen = tracker.last_seen();

        let output = match field::evaluate(&config, &steering_config, &input, &mut tracker) {
            Ok(output) => output,
            Err(err) => {
                warn!(?entity, %err, "skipping floating body this tick");
                continue;
            }
        };

        B::apply_force(world, entity, output.force);
        B::apply_torque(world, entity, output.torque);

        let mut entity_mut = world.entity_mut(entity);
        if let Some(mut stored) = entity_mut.get_mut::<TriggerTracker>() {
            if *stored != tracker {
                *stored = tracker;
            }
        }

        match output.impulse {
            Some(impulse) => {
                if let Some(mut forces) = entity_mut.get_mut::<FieldForces>() {
                    forces.set_impulse(impulse);
                }
            }
            None if tracker.last_seen() > last_seen => {
                debug!(?entity, "trigger skipped for body at the origin");
            }
            None => {}
        }
    }
}

/// Apply parked trigger impulses, scaled by mass so they act as a velocity change.
pub fn apply_trigger_impulses<B: FieldPhysicsBackend>(world: &mut World) {
    let pending: Vec<(Entity, Vec3)> = world
        .query::<(Entity, &mut FieldForces)>()
        .iter_mut(world)
        .filter_map(|(e, mut forces)| forces.take_impulse().map(|impulse| (e, impulse)))
        .collect();

    for (entity, impulse) in pending {
        let mass = B::get_mass(world, entity);
        B::apply_impulse(world, entity, impulse * mass);
        debug!(?entity, ?impulse, "trigger impulse applied");
    }
}
