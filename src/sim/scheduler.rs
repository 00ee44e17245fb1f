//! Deferred actions on the simulation clock
//!
//! Countdown steps and pickup respawns fire at a virtual time checked once
//! per tick, which keeps sessions deterministic and testable without
//! wall-clock waits.

use serde::{Deserialize, Serialize};

/// Timer slot. Scheduling into an occupied slot replaces the pending timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKey {
    Countdown,
    PickupRespawn,
}

/// What happens when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Show countdown number `n`
    CountdownStep(u8),
    /// Countdown finished, start the run
    CountdownFinished,
    /// Place a new pickup
    SpawnPickup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    key: TimerKey,
    fire_at: f32,
    action: TimerAction,
}

/// Pending timers, at most one per key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` at `fire_at`, replacing any pending timer for `key`
    pub fn schedule(&mut self, key: TimerKey, fire_at: f32, action: TimerAction) {
        self.cancel(key);
        self.timers.push(Timer {
            key,
            fire_at,
            action,
        });
    }

    pub fn cancel(&mut self, key: TimerKey) {
        self.timers.retain(|t| t.key != key);
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.timers.iter().any(|t| t.key == key)
    }

    /// Fire time of the pending timer for `key`
    pub fn due_at(&self, key: TimerKey) -> Option<f32> {
        self.timers.iter().find(|t| t.key == key).map(|t| t.fire_at)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Remove and return every action due at or before `now`, earliest first
    pub fn pop_due(&mut self, now: f32) -> Vec<TimerAction> {
        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.fire_at <= now {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at));
        due.into_iter().map(|t| t.action).collect()
    }
}
