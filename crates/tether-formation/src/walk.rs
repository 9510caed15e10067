//! Undirected random walk.

use rand::Rng;

use crate::{Motion, WALK_INTERVAL_MIN, WALK_INTERVAL_SPAN};

/// Holds one random motion for a random number of ticks, then draws another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomWalk {
    last_change: u32,
    interval: u32,
}

impl RandomWalk {
    /// Start at a random phase with a random hold interval.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            last_change: rng.gen_range(0..WALK_INTERVAL_SPAN),
            interval: Self::draw_interval(rng),
        }
    }

    fn draw_interval<R: Rng + ?Sized>(rng: &mut R) -> u32 {
        WALK_INTERVAL_MIN + rng.gen_range(0..WALK_INTERVAL_SPAN)
    }

    /// Ticks the current motion is held for.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Returns a new motion once the hold interval has elapsed, `None` otherwise.
    pub fn step<R: Rng + ?Sized>(&mut self, now: u32, rng: &mut R) -> Option<Motion> {
        if now <= self.last_change.saturating_add(self.interval) {
            return None;
        }
        self.last_change = now;
        self.interval = Self::draw_interval(rng);

        Some(match rng.gen_range(0..4u8) {
            0 => Motion::Forward,
            1 => Motion::Left,
            2 => Motion::Right,
            _ => Motion::Stop,
        })
    }
}
