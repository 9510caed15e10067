//! Tether Swarm Simulation
//!
//! Runs many tether agents against each other over a simulated radio and
//! records what they do.
//!
//! # Architecture
//!
//! - **Config**: `TETHER_*` environment variables with defaults
//! - **Simulation**: Lossy one-hop broadcast, latest-wins staging, kinematics
//! - **Events**: Timeline of connections, role changes and gate flips
//!
//! # Usage
//!
//! ```no_run
//! use tether_sim::{Simulation, SimulationConfig};
//!
//! let mut sim = Simulation::new(SimulationConfig::from_env()?)?;
//! sim.run();
//! println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod events;
mod simulation;

pub use config::{ConfigError, SimulationConfig};
pub use events::{AgentState, Pose, SwarmEvent, SwarmSnapshot};
pub use simulation::{Body, Simulation};
