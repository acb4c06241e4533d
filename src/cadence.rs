//! Tick decimation.
//!
//! Evaluating the field on every fixed tick is the default. On slow devices
//! it can run on every n-th tick instead; the engine keeps the last applied
//! force in between.

use bevy::prelude::*;

/// Which fixed ticks evaluate the field.
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Resource)]
pub struct TickCadence {
    every: u32,
    tick: Option<u64>,
}

impl Default for TickCadence {
    fn default() -> Self {
        Self::every_tick()
    }
}

impl TickCadence {
    /// Evaluate on every tick.
    pub fn every_tick() -> Self {
        Self::every_nth(1)
    }

    /// Evaluate on every `n`-th tick. `0` is treated as `1`.
    pub fn every_nth(n: u32) -> Self {
        Self {
            every: n.max(1),
            tick: None,
        }
    }

    #[inline]
    pub fn every(&self) -> u32 {
        self.every
    }

    /// Index of the current tick. The first advance makes it 0.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick.unwrap_or(0)
    }

    /// Whether the current tick evaluates the field.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.tick.is_none_or(|tick| tick % u64::from(self.every) == 0)
    }

    pub(crate) fn advance(&mut self) {
        self.tick = Some(self.tick.map_or(0, |tick| tick.wrapping_add(1)));
    }
}

/// Move the cadence to the next tick.
pub fn advance_cadence(mut cadence: ResMut<TickCadence>) {
    cadence.advance();
}

/// Run condition for the field system sets.
pub fn cadence_allows(cadence: Option<Res<TickCadence>>) -> bool {
    cadence.is_none_or(|c| c.is_active())
}
