//! Leader Election and Gradient Propagation
//!
//! No agent ever sees more than its own neighbor table, yet every connected
//! group must agree on one leader and every member must know its hop distance
//! (gradient) from that leader.
//!
//! # Rule Table
//!
//! Each tick, the agent's prior role, leader id and gradient are matched
//! against its current neighbors by an ordered list of [`Rule`]s. The first
//! rule that matches applies its update and ends the pass; the last rule,
//! [`Rule::Propagate`], always matches. The order is [`RULE_ORDER`] and is part
//! of the contract: reordering changes which groups absorb which.
//!
//! # Convergence
//!
//! Disagreement is expected and transient:
//! - Two lone agents break symmetry by identifier in a single exchange.
//! - Competing groups settle on the numerically lowest leader id.
//! - Two leaders in contact only resolve after [`LEADER_CONFLICT_TICKS`]
//!   consecutive sightings, so one lost message never flips a leader.
//! - Stale neighbor data ages out of the connection table and the remaining
//!   neighbors re-derive the gradient.

mod election;
mod rules;

pub use election::{elect, ElectionState};
pub use rules::{Rule, LEADER_CONFLICT_TICKS, RULE_ORDER};
