//! # `floating_field`
//!
//! A physics-driven ambient scene: a handful of rigid bodies held near the
//! origin by a gentle spring, kept moving by per-body oscillating forces and
//! a slow tumble, nudged by a steering input and kicked outwards on click.
//!
//! The crate provides:
//! - A pure force law ([`field`]) combining centering, oscillation, tumble,
//!   steering bias and trigger impulses
//! - Edge-triggered impulses driven by a shared counter ([`trigger`])
//! - Steering from a pointer or a device orientation sensor with a one-shot
//!   permission flow ([`steering`])
//! - Seeded scene population with rotating accent colours ([`scene`])
//! - An evaluation cadence for running the field every n-th fixed tick
//! - Physics backend abstraction (Rapier3D included)
//!
//! ## Architecture
//!
//! Every fixed tick, in [`FloatingFieldSet`] order:
//! 1. The backend removes last tick's field forces and the frame's steering
//!    and trigger count are snapshotted
//! 2. The field is evaluated per body from its position, phase and the clock
//! 3. Pending trigger impulses are applied
//! 4. The backend pushes the accumulated forces to the engine
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use floating_field::prelude::*;
//!
//! let settings = FieldSettings {
//!     field: ForceFieldConfig::lively(),
//!     scene: SceneConfig::default().with_body_count(20).with_seed(7),
//!     ..default()
//! };
//! assert!(settings.validate().is_ok());
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod body;
pub mod cadence;
pub mod config;
pub mod error;
pub mod field;
pub mod input;
pub mod scene;
pub mod steering;
pub mod systems;
pub mod trigger;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::FieldPhysicsBackend;
    pub use crate::body::{BodyAppearance, FieldForces, FloatingBody, FloatingBodyBundle, PhaseOffsets};
    pub use crate::cadence::TickCadence;
    pub use crate::config::{
        FieldSettings, ForceFieldConfig, SceneConfig, SteeringConfig, SteeringMapping, WorldAxis,
    };
    pub use crate::error::{ConfigError, FieldError, SteeringError};
    pub use crate::input::PointerInputPlugin;
    pub use crate::scene::AccentPalette;
    pub use crate::steering::{
        OrientationReading, SensorStatus, Steering, SteeringAdapter, SteeringSource,
    };
    pub use crate::trigger::{TriggerCounter, TriggerTracker};
    pub use crate::{FloatingFieldPlugin, FloatingFieldSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dFieldBundle};
}

/// System sets for the per-tick pipeline, run in this order in `FixedUpdate`.
///
/// All four are skipped together on ticks the [`cadence::TickCadence`] rejects.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FloatingFieldSet {
    /// Backend clears last tick's forces; shared inputs are snapshotted.
    Preparation,
    /// Force and torque evaluation.
    Forces,
    /// Trigger impulses.
    Impulses,
    /// Backend pushes accumulated forces to the engine.
    FinalApplication,
}

/// Main plugin for the floating field.
///
/// This plugin is generic over a physics backend `B` which reads positions
/// and applies forces.
///
/// # Examples
///
/// With Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use floating_field::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule())
///     .add_plugins(FloatingFieldPlugin::<Rapier3dBackend>::default())
///     .add_plugins(PointerInputPlugin::default())
///     .run();
/// ```
pub struct FloatingFieldPlugin<B: backend::FieldPhysicsBackend> {
    settings: config::FieldSettings,
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::FieldPhysicsBackend> Default for FloatingFieldPlugin<B> {
    fn default() -> Self {
        Self::new(config::FieldSettings::default())
    }
}

impl<B: backend::FieldPhysicsBackend> FloatingFieldPlugin<B> {
    pub fn new(settings: config::FieldSettings) -> Self {
        Self {
            settings,
            _marker: std::marker::PhantomData,
        }
    }

    /// Builder: replace the settings.
    pub fn with_settings(mut self, settings: config::FieldSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Settings the plugin will install, after validation.
    ///
    /// Invalid settings are logged and replaced by the defaults.
    pub fn effective_settings(&self) -> config::FieldSettings {
        match self.settings.validate() {
            Ok(()) => self.settings,
            Err(err) => {
                warn!(%err, "invalid floating field settings, falling back to defaults");
                config::FieldSettings::default()
            }
        }
    }
}

impl<B: backend::FieldPhysicsBackend> Plugin for FloatingFieldPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ForceFieldConfig>();
        app.register_type::<config::SteeringConfig>();
        app.register_type::<config::SceneConfig>();
        app.register_type::<body::FloatingBody>();
        app.register_type::<body::BodyAppearance>();
        app.register_type::<body::FieldForces>();
        app.register_type::<trigger::TriggerCounter>();
        app.register_type::<trigger::TriggerTracker>();
        app.register_type::<steering::SteeringAdapter>();
        app.register_type::<cadence::TickCadence>();

        let settings = self.effective_settings();
        app.insert_resource(settings.field);
        app.insert_resource(settings.steering);
        app.insert_resource(settings.scene);
        app.insert_resource(cadence::TickCadence::every_nth(settings.tick_every));

        app.init_resource::<steering::SteeringAdapter>();
        app.init_resource::<trigger::TriggerCounter>();
        app.init_resource::<systems::FrameSnapshot>();
        app.init_resource::<scene::AccentPalette>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (
                FloatingFieldSet::Preparation,
                FloatingFieldSet::Forces,
                FloatingFieldSet::Impulses,
                FloatingFieldSet::FinalApplication,
            )
                .chain(),
        );
        for set in [
            FloatingFieldSet::Preparation,
            FloatingFieldSet::Forces,
            FloatingFieldSet::Impulses,
            FloatingFieldSet::FinalApplication,
        ] {
            app.configure_sets(FixedUpdate, set.run_if(cadence::cadence_allows));
        }

        app.add_systems(
            FixedUpdate,
            (
                cadence::advance_cadence.before(FloatingFieldSet::Preparation),
                systems::capture_frame_snapshot.in_set(FloatingFieldSet::Preparation),
                systems::apply_force_field::<B>.in_set(FloatingFieldSet::Forces),
                systems::apply_trigger_impulses::<B>.in_set(FloatingFieldSet::Impulses),
            ),
        );

        app.add_systems(Startup, scene::populate_scene::<B>);
    }
}
