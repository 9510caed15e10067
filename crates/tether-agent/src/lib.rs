//! Tether Agent
//!
//! One swarm member: its own state, the staged inbound broadcast and the
//! per-tick driver that runs ingestion, election, formation and aging.
//!
//! The agent never talks to hardware directly. The radio hands it bytes via
//! [`Agent::on_message_received`] and polls [`Agent::produce_next_payload`];
//! drive and indicator output go through an [`Actuator`]; raw radio readings
//! become distances through a [`DistanceEstimator`].
//!
//! ```
//! use tether_agent::{Agent, Actuator, RawMeasurement};
//! use tether_formation::{Color, Motion};
//! use tether_topology::AgentId;
//!
//! struct Wheels;
//! impl Actuator for Wheels {
//!     fn set_motion(&mut self, _: Motion) {}
//!     fn set_indicator(&mut self, _: Color) {}
//! }
//!
//! let mut agent = Agent::new(AgentId(2), 7);
//! let peer = Agent::new(AgentId(5), 8);
//!
//! agent.on_message_received(&peer.produce_next_payload(), RawMeasurement(60)).unwrap();
//! let report = agent.tick(&|raw: RawMeasurement| raw.0, &mut Wheels);
//! assert!(report.admission.is_some());
//! ```

mod agent;
mod collaborators;

pub use agent::{Agent, AgentStatus, TickReport};
pub use collaborators::{Actuator, DistanceEstimator, RawMeasurement};

/// Nominal control rate.
pub const TICKS_PER_SECOND: u32 = 32;
