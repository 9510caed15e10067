//! Follower potential and the probing hill climber.

use tether_topology::{ConnectionTable, WalkGate};

use crate::{Motion, DEAD_TIME_TICKS, D_TARGET};

/// Σ (distance - D_TARGET) over links one hop closer to the root.
pub fn potential(table: &ConnectionTable, gradient: u8) -> f32 {
    table
        .parents_of(gradient)
        .map(|c| f32::from(c.distance) - f32::from(D_TARGET))
        .sum()
}

/// The gate a follower hears from its parents, if it has any.
pub fn relayed_gate(table: &ConnectionTable, gradient: u8) -> Option<WalkGate> {
    table.parents_of(gradient).next().map(|c| c.gate)
}

/// Minimum-tracking probe controller.
///
/// The error it minimises is |V|. It has no directional sensing: it commits
/// to forward motion when the error improved since the last tick and turns
/// otherwise, only re-committing once the dead-time budget is spent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HillClimber {
    best_error: f32,
    bad_steps: u8,
    dead_time: u8,
    motion: Motion,
}

impl Default for HillClimber {
    fn default() -> Self {
        Self {
            best_error: f32::MAX,
            bad_steps: 0,
            dead_time: 0,
            motion: Motion::Stop,
        }
    }
}

impl HillClimber {
    /// Error recorded on the previous step.
    pub fn best_error(&self) -> f32 {
        self.best_error
    }

    /// Consecutive steps that failed to improve.
    pub fn bad_steps(&self) -> u8 {
        self.bad_steps
    }

    /// Remaining dead-time budget.
    pub fn dead_time(&self) -> u8 {
        self.dead_time
    }

    /// Advance one tick. `fresh_go` is true on the first Go tick after a Wait.
    pub fn step(&mut self, error: f32, fresh_go: bool) -> Motion {
        if fresh_go {
            self.bad_steps = 0;
            self.dead_time = DEAD_TIME_TICKS;
            self.motion = Motion::Stop;
        } else {
            let budget_ready = self.dead_time == 0 || self.dead_time == DEAD_TIME_TICKS;
            if error < self.best_error && budget_ready {
                self.bad_steps = 0;
                self.dead_time = DEAD_TIME_TICKS;
                self.motion = Motion::Forward;
            } else {
                self.dead_time = self.dead_time.saturating_sub(1);
                self.bad_steps = self.bad_steps.saturating_add(1);
                self.motion = Motion::Left;
            }
        }
        self.best_error = error;
        self.motion
    }
}
