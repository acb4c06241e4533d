//! Window input adapter.
//!
//! Feeds the primary window's cursor into the [`SteeringAdapter`] and turns
//! clicks or taps into trigger events. Headless apps can skip this plugin and
//! drive the adapter and [`TriggerCounter`] directly.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::steering::SteeringAdapter;
use crate::trigger::TriggerCounter;

/// Mouse button that fires the trigger.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerButton(pub MouseButton);

impl Default for TriggerButton {
    fn default() -> Self {
        Self(MouseButton::Left)
    }
}

/// Plugin wiring window input into steering and triggers.
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use floating_field::input::PointerInputPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(PointerInputPlugin::default().with_trigger_button(MouseButton::Right))
///     .run();
/// ```
#[derive(Default)]
pub struct PointerInputPlugin {
    trigger_button: TriggerButton,
}

impl PointerInputPlugin {
    /// Builder: choose the trigger button.
    pub fn with_trigger_button(mut self, button: MouseButton) -> Self {
        self.trigger_button = TriggerButton(button);
        self
    }
}

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.trigger_button);
        app.init_resource::<SteeringAdapter>();
        app.init_resource::<TriggerCounter>();
        app.add_systems(Update, (track_pointer, count_triggers));
    }
}

/// Map a cursor position in logical pixels (origin top-left) to `[-1, 1]`
/// with y pointing up. `None` for a degenerate window.
pub fn pointer_from_cursor(cursor: Vec2, window_size: Vec2) -> Option<Vec2> {
    if !(window_size.x > 0.0 && window_size.y > 0.0) {
        return None;
    }
    let normalized = Vec2::new(
        cursor.x / window_size.x * 2.0 - 1.0,
        1.0 - cursor.y / window_size.y * 2.0,
    );
    Some(normalized.clamp(Vec2::NEG_ONE, Vec2::ONE))
}

/// Copy the primary window cursor into the steering adapter.
pub fn track_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut adapter: ResMut<SteeringAdapter>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    match window
        .cursor_position()
        .and_then(|cursor| pointer_from_cursor(cursor, window.size()))
    {
        Some(position) => adapter.set_pointer(position),
        None if adapter.pointer().is_some() => adapter.clear_pointer(),
        None => {}
    }
}

/// Fire the trigger on a button press edge or a new touch.
pub fn count_triggers(
    button: Res<TriggerButton>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    mut counter: ResMut<TriggerCounter>,
) {
    let clicked = mouse.is_some_and(|mouse| mouse.just_pressed(button.0));
    let tapped = touches.is_some_and(|touches| touches.any_just_pressed());

    if clicked || tapped {
        counter.fire();
        debug!(count = counter.count(), "trigger fired");
    }
}
