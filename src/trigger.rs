//! One-shot impulse triggers.
//!
//! A click (or any discrete event) increments the shared [`TriggerCounter`].
//! Each body keeps a [`TriggerTracker`] holding the last count it saw, so an
//! increase fires exactly one impulse per body no matter how often the systems
//! run in between.

use bevy::prelude::*;

/// Monotonic count of trigger events for the scene.
///
/// # Example
///
/// ```rust
/// use floating_field::prelude::*;
///
/// let mut counter = TriggerCounter::default();
/// counter.fire();
/// counter.fire();
/// assert_eq!(counter.count(), 2);
/// ```
#[derive(Resource, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Resource)]
pub struct TriggerCounter {
    count: u64,
}

impl TriggerCounter {
    /// Record one trigger event.
    pub fn fire(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Current count.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Per-body edge detector for the trigger counter.
///
/// Two states: the impulse for the last seen count has been applied, or a
/// higher count has arrived and the impulse is due. [`observe`](Self::observe)
/// returns `true` on that transition only.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct TriggerTracker {
    last_seen: u64,
}

impl TriggerTracker {
    /// Tracker that treats `count` as already handled.
    ///
    /// Bodies spawned mid-scene start at the current count so they do not
    /// replay earlier clicks.
    pub fn starting_at(count: u64) -> Self {
        Self { last_seen: count }
    }

    /// Last count this body observed.
    #[inline]
    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }

    /// Feed the current count. Returns `true` when it increased since the
    /// previous call.
    ///
    /// Several increments between two calls still fire once. A lower count is
    /// recorded without firing, so the next increase from there fires again.
    pub fn observe(&mut self, count: u64) -> bool {
        let fired = count > self.last_seen;
        self.last_seen = count;
        fired
    }
}
