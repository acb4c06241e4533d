//! Physics backend abstraction.
//!
//! The field systems never talk to a physics engine directly. They read
//! positions and hand out forces, torques and impulses through this trait, so
//! the same controller runs on Rapier, another engine, or a test double.

use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;

/// Trait for physics backend implementations.
///
/// All methods are associated functions taking the [`World`], so the field
/// systems can run as exclusive systems and stay generic over the backend.
///
/// See the `rapier` module's `Rapier3dBackend` for a full implementation.
pub trait FieldPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    ///
    /// The plugin is expected to clear last tick's forces in
    /// [`FloatingFieldSet::Preparation`](crate::FloatingFieldSet::Preparation)
    /// and push the accumulated ones in
    /// [`FloatingFieldSet::FinalApplication`](crate::FloatingFieldSet::FinalApplication).
    fn plugin() -> impl Plugin;

    /// Current position of an entity, as integrated by the engine.
    fn get_position(world: &World, entity: Entity) -> Vec3;

    /// Apply a force over the coming physics step.
    fn apply_force(world: &mut World, entity: Entity, force: Vec3);

    /// Apply a torque over the coming physics step.
    fn apply_torque(world: &mut World, entity: Entity, torque: Vec3);

    /// Apply an instantaneous change in momentum.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3);

    /// Mass of an entity.
    ///
    /// Trigger impulses are specified as velocity changes and multiplied by
    /// this before being applied.
    fn get_mass(_world: &World, _entity: Entity) -> f32 {
        1.0
    }

    /// Attach the engine components a newly populated body needs.
    fn insert_body_physics(_entity: &mut EntityCommands, _radius: f32) {}
}
