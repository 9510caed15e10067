//! Swarm events and snapshots for the simulation timeline.

use serde::{Deserialize, Serialize};
use tether_agent::AgentStatus;
use tether_formation::{Color, Motion};
use tether_topology::{AgentId, BotRole, WalkGate};

/// Position and pose of one simulated body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// mm
    pub x: f64,
    /// mm
    pub y: f64,
    /// radians, counter-clockwise from +x
    pub heading: f64,
}

impl Pose {
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// State of an agent at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    #[serde(flatten)]
    pub status: AgentStatus,
    pub pose: Pose,
    pub motion: Motion,
    pub indicator: Color,
}

/// Events that occur while the swarm organises itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SwarmEvent {
    /// An agent admitted a neighbor into its table
    ConnectionFormed {
        agent: AgentId,
        neighbor: AgentId,
        distance_mm: f64,
        frame: u64,
    },

    /// A neighbor aged out of an agent's table
    ConnectionLost {
        agent: AgentId,
        neighbor: AgentId,
        frame: u64,
    },

    /// The derived role changed over a tick
    RoleChanged {
        agent: AgentId,
        from: BotRole,
        to: BotRole,
        leader: AgentId,
        gradient: u8,
        frame: u64,
    },

    /// The walk gate changed over a tick
    GateChanged {
        agent: AgentId,
        from: WalkGate,
        to: WalkGate,
        frame: u64,
    },
}

impl SwarmEvent {
    /// Get the frame number for this event.
    pub fn frame(&self) -> u64 {
        match self {
            SwarmEvent::ConnectionFormed { frame, .. } => *frame,
            SwarmEvent::ConnectionLost { frame, .. } => *frame,
            SwarmEvent::RoleChanged { frame, .. } => *frame,
            SwarmEvent::GateChanged { frame, .. } => *frame,
        }
    }

    /// The agent the event happened to.
    pub fn agent(&self) -> AgentId {
        match self {
            SwarmEvent::ConnectionFormed { agent, .. }
            | SwarmEvent::ConnectionLost { agent, .. }
            | SwarmEvent::RoleChanged { agent, .. }
            | SwarmEvent::GateChanged { agent, .. } => *agent,
        }
    }
}

/// A snapshot of the swarm at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmSnapshot {
    pub frame: u64,
    pub agents: Vec<AgentState>,
    pub agent_count: usize,
    pub leader_count: usize,
    pub single_count: usize,
    /// Directed table entries summed over all agents
    pub link_count: usize,
}

impl SwarmSnapshot {
    /// Build a snapshot, deriving the summary counts from the agent list.
    pub fn new(frame: u64, agents: Vec<AgentState>) -> Self {
        let count = |role| agents.iter().filter(|a| a.status.role == role).count();
        let leader_count = count(BotRole::Leader);
        let single_count = count(BotRole::Single);
        let link_count = agents.iter().map(|a| a.status.connections.len()).sum();

        Self {
            frame,
            agent_count: agents.len(),
            leader_count,
            single_count,
            link_count,
            agents,
        }
    }

    /// Look up an agent by identifier.
    pub fn agent(&self, id: AgentId) -> Option<&AgentState> {
        self.agents.iter().find(|a| a.status.id == id)
    }
}
