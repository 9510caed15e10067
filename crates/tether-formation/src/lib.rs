//! Tether Formation Control
//!
//! Turns an agent's role, gradient and neighbor distances into motion.
//!
//! # Accordion Gait
//!
//! A group moves like an accordion. The leader wanders at random while every
//! direct subordinate stays within [`D_MAX`]; as soon as one falls behind, it
//! broadcasts [`WalkGate::Wait`](tether_topology::WalkGate::Wait) and stops
//! until all of them are back within [`D_MIN`] + [`REGROUP_MARGIN`].
//!
//! Followers relay the gate they hear from their parents. While it reads Go,
//! each follower descends the potential
//!
//! ```text
//! V = Σ_{parents} (distance - D_TARGET)
//! ```
//!
//! It cannot sense the direction of the gradient of V, so it probes: drive
//! forward while |V| keeps shrinking, turn when it does not, with a dead-time
//! budget between decisions to avoid chattering.

mod controller;
mod follower;
mod motion;
mod walk;

pub use controller::{Directive, FormationContext, FormationController};
pub use follower::{potential, relayed_gate, HillClimber};
pub use motion::{Color, Motion};
pub use walk::RandomWalk;

/// Near bound (mm).
pub const D_MIN: u16 = 45;

/// Far bound (mm). A subordinate beyond this makes the leader wait.
pub const D_MAX: u16 = 65;

/// Desired parent-child separation (mm).
pub const D_TARGET: u16 = D_MIN + 5;

/// Leader resumes once every subordinate is within `D_MIN + REGROUP_MARGIN`.
pub const REGROUP_MARGIN: u16 = 10;

/// A follower with |V| below this is in band and holds still.
pub const IN_BAND_TOLERANCE: f32 = 5.0;

/// Hill-climb dead-time budget (ticks).
pub const DEAD_TIME_TICKS: u8 = 20;

/// Shortest random-walk hold (ticks).
pub const WALK_INTERVAL_MIN: u32 = 32;

/// Random-walk hold is `WALK_INTERVAL_MIN + uniform(0..WALK_INTERVAL_SPAN)`.
pub const WALK_INTERVAL_SPAN: u32 = 64;

const _: () = assert!(D_MIN < D_TARGET && D_TARGET < D_MAX);
const _: () = assert!(D_MIN + REGROUP_MARGIN <= D_MAX);
