//! Tether Swarm Topology
//!
//! Who an agent is, who it may bind to, and who it is currently bound to.
//!
//! # Structural Links
//!
//! Every agent carries an immutable [`AgentType`] assigned from its identifier
//! at startup. A static [`BindingPolicy`] matrix decides whether a link between
//! two types is structurally valid and how many links of each type an agent may
//! hold. The matrix encodes the topology class of the swarm (for the default
//! deployment: alternating Alpha/Beta chains with fan-out 2).
//!
//! # Connection Table
//!
//! Each agent keeps at most [`MAX_CONNECTIONS`] neighbors. A neighbor is
//! admitted on first contact if the policy, its per-type capacity and the
//! bind radius all allow it; afterwards every message from it refreshes the
//! slot and resets its age. Slots that go [`CONNECTION_TIMEOUT`] ticks without
//! a refresh are evicted. There is no other way for a link to disappear.

mod agent;
mod binding;
mod connection;

pub use agent::{AgentId, AgentType, BotRole, CodeError, WalkGate};
pub use binding::{BindingPolicy, DEFAULT_BINDING_MATRIX};
pub use connection::{Admission, Connection, ConnectionTable, NeighborSnapshot, RejectReason};

/// Number of connection slots per agent.
pub const MAX_CONNECTIONS: usize = 6;

/// Ticks without refresh after which a connection is evicted (~1.5 s at 32 Hz).
///
/// A slot is evicted once its age *exceeds* this value.
pub const CONNECTION_TIMEOUT: u8 = 48;

/// Maximum measured distance (mm) at which a new connection may be admitted.
pub const BIND_RADIUS: u16 = 100;

/// Number of distinct agent types.
pub const AGENT_TYPES: usize = 4;

// The timeout must leave room for the age counter to pass it without wrapping.
const _: () = assert!(CONNECTION_TIMEOUT < u8::MAX);
