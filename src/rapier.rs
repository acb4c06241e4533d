//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::FieldPhysicsBackend;
use crate::body::FieldForces;
use crate::FloatingFieldSet;

/// Rapier3D physics backend for the floating field.
///
/// Forces and torques are accumulated in [`FieldForces`] and written into
/// Rapier's `ExternalForce` once per tick, so forces other systems put there
/// are left alone. Impulses go straight into `ExternalImpulse`.
pub struct Rapier3dBackend;

impl FieldPhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn get_position(world: &World, entity: Entity) -> Vec3 {
        world
            .get::<Transform>(entity)
            .map(|t| t.translation)
            .or_else(|| {
                world
                    .get::<GlobalTransform>(entity)
                    .map(|t| t.translation())
            })
            .unwrap_or(Vec3::ZERO)
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3) {
        if let Some(mut forces) = world.get_mut::<FieldForces>(entity) {
            forces.add_force(force);
        }
    }

    fn apply_torque(world: &mut World, entity: Entity, torque: Vec3) {
        if let Some(mut forces) = world.get_mut::<FieldForces>(entity) {
            forces.add_torque(torque);
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec3) {
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            ext_impulse.impulse += impulse;
        } else if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            // No ExternalImpulse component: treat it as a velocity change.
            vel.linvel += impulse;
        }
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        // Rapier fills this in after the first step; until then it reads zero.
        world
            .get::<ReadMassProperties>(entity)
            .map(|props| props.mass)
            .filter(|mass| *mass > 0.0 && mass.is_finite())
            .unwrap_or(1.0)
    }

    fn insert_body_physics(entity: &mut EntityCommands, radius: f32) {
        entity.insert((Rapier3dFieldBundle::new(), Collider::ball(radius)));
    }
}

/// Plugin that sets up the Rapier3D-specific systems for the floating field.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            clear_field_forces.in_set(FloatingFieldSet::Preparation),
        );
        app.add_systems(
            FixedUpdate,
            apply_field_forces.in_set(FloatingFieldSet::FinalApplication),
        );
    }
}

/// Remove the forces the field applied last tick from `ExternalForce`.
pub fn clear_field_forces(mut q: Query<(&mut ExternalForce, &mut FieldForces)>) {
    for (mut ext_force, mut forces) in &mut q {
        let (force, torque) = forces.prepare_new_frame();
        ext_force.force -= force;
        ext_force.torque -= torque;
    }
}

/// Add this tick's accumulated field forces to `ExternalForce`.
pub fn apply_field_forces(mut q: Query<(&mut ExternalForce, &mut FieldForces)>) {
    for (mut ext_force, mut forces) in &mut q {
        let (force, torque) = forces.finalize_frame();
        ext_force.force += force;
        ext_force.torque += torque;
    }
}

/// Rapier components for a floating body.
///
/// Gravity is off: the centering spring is what holds the bodies in place.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use floating_field::prelude::*;
///
/// fn spawn_body(mut commands: Commands, counter: Res<TriggerCounter>) {
///     commands.spawn((
///         Transform::from_xyz(1.0, 0.5, 0.0),
///         FloatingBodyBundle::new(PhaseOffsets::random(&mut rand::rng()), counter.count()),
///         Rapier3dFieldBundle::new().with_restitution(0.9),
///         Collider::cuboid(0.4, 0.4, 0.4),
///     ));
/// }
/// ```
#[derive(Bundle)]
pub struct Rapier3dFieldBundle {
    /// Should be [`RigidBody::Dynamic`] for the field to have any effect.
    pub rigid_body: RigidBody,
    pub velocity: Velocity,
    /// Written by [`apply_field_forces`].
    pub external_force: ExternalForce,
    /// Receives trigger impulses.
    pub external_impulse: ExternalImpulse,
    pub damping: Damping,
    pub gravity_scale: GravityScale,
    pub restitution: Restitution,
    /// Read by the backend to turn trigger velocity changes into impulses.
    pub mass_properties: ReadMassProperties,
}

impl Default for Rapier3dFieldBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rapier3dFieldBundle {
    /// Dynamic body, no gravity, moderate damping, bouncy.
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_force: ExternalForce::default(),
            external_impulse: ExternalImpulse::default(),
            damping: Damping {
                linear_damping: 0.8,
                angular_damping: 0.6,
            },
            gravity_scale: GravityScale(0.0),
            restitution: Restitution::coefficient(0.7),
            mass_properties: ReadMassProperties::default(),
        }
    }

    /// Set the rigid body type.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }

    /// Set linear and angular damping.
    ///
    /// Low damping lets the oscillation build up into wide swings; high
    /// damping keeps bodies close to their spring equilibrium.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.damping = Damping {
            linear_damping: linear,
            angular_damping: angular,
        };
        self
    }

    /// Set the bounce coefficient.
    pub fn with_restitution(mut self, coefficient: f32) -> Self {
        self.restitution = Restitution::coefficient(coefficient);
        self
    }
}
