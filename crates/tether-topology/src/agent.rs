//! Agent identity and the per-agent enumerations shared by every layer.
//!
//! The wire format carries these as small integer codes; conversion to and
//! from those codes lives here so the codec never deals in raw discriminants.

use std::fmt;

use thiserror::Error;

/// A one-byte agent identifier.
///
/// Every byte value is a valid identifier. Free connection slots are modelled
/// with `Option`, not with a reserved id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u8);

impl AgentId {
    /// Raw byte value.
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role-by-manufacture. Immutable for the lifetime of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentType {
    Alpha = 0,
    Beta = 1,
    Gamma = 2,
    Delta = 3,
}

impl AgentType {
    /// All types in matrix order.
    pub const ALL: [AgentType; 4] = [
        AgentType::Alpha,
        AgentType::Beta,
        AgentType::Gamma,
        AgentType::Delta,
    ];

    /// Assign a type from an identifier at startup.
    ///
    /// Pairs of ids alternate between Alpha and Beta for the first eight
    /// agents; everything beyond that is Alpha.
    pub const fn assign(id: AgentId) -> Self {
        match id.0 {
            0 | 1 | 4 | 5 => AgentType::Alpha,
            2 | 3 | 6 | 7 => AgentType::Beta,
            _ => AgentType::Alpha,
        }
    }

    /// Row/column index into a binding matrix.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for AgentType {
    type Error = CodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AgentType::Alpha),
            1 => Ok(AgentType::Beta),
            2 => Ok(AgentType::Gamma),
            3 => Ok(AgentType::Delta),
            other => Err(CodeError::AgentType(other)),
        }
    }
}

/// Position of an agent within its group. Derived every tick, never authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BotRole {
    /// No live connections.
    #[default]
    Single = 0,
    /// Has connections and is its own leader.
    Leader = 1,
    /// Has connections and follows someone else.
    Follower = 2,
}

impl BotRole {
    /// Derive the role from connection presence and leader identity.
    pub const fn derive(has_connections: bool, leads_itself: bool) -> Self {
        if !has_connections {
            BotRole::Single
        } else if leads_itself {
            BotRole::Leader
        } else {
            BotRole::Follower
        }
    }

    /// Two-bit wire code.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for BotRole {
    type Error = CodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(BotRole::Single),
            1 => Ok(BotRole::Leader),
            2 => Ok(BotRole::Follower),
            other => Err(CodeError::Role(other)),
        }
    }
}

/// Phase signal broadcast by a group's leader and relayed by its followers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalkGate {
    /// Followers hold still.
    Wait = 0,
    /// Followers may track their parents.
    Go = 1,
}

impl WalkGate {
    /// One-bit wire code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode from a single bit; only the lowest bit is inspected.
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 0x01 == 0 {
            WalkGate::Wait
        } else {
            WalkGate::Go
        }
    }
}

/// An integer code that names no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("unknown agent type code {0}")]
    AgentType(u8),

    #[error("unknown role code {0}")]
    Role(u8),
}
