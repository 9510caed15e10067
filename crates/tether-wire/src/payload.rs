//! The five-byte state broadcast.

use bytes::{Buf, BufMut};
use tether_topology::{AgentId, AgentType, BotRole, NeighborSnapshot, WalkGate};

use crate::{Result, WireError, PAYLOAD_LEN};

/// Bits 0-1 of the flags byte carry the role.
pub const FLAG_ROLE_MASK: u8 = 0b0000_0011;

/// Bit 2 of the flags byte carries the walk gate.
pub const FLAG_GATE: u8 = 0b0000_0100;

/// One agent's advertised state.
///
/// Layout (5 bytes):
/// - type: 1 byte (AgentType code)
/// - id: 1 byte
/// - gradient: 1 byte
/// - leader_id: 1 byte
/// - flags: 1 byte (bits 0-1 role, bit 2 gate, bits 3-7 zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Payload {
    /// Sender's type
    pub agent_type: AgentType,
    /// Sender's identifier
    pub id: AgentId,
    /// Sender's hop count from its leader
    pub gradient: u8,
    /// Leader the sender follows (itself when leading)
    pub leader_id: AgentId,
    /// Sender's role
    pub role: BotRole,
    /// Sender's walk gate
    pub gate: WalkGate,
}

impl Payload {
    /// Pack into a fixed-size frame.
    pub fn encode(&self) -> [u8; PAYLOAD_LEN] {
        let mut out = [0u8; PAYLOAD_LEN];
        self.write_to(&mut &mut out[..]);
        out
    }

    /// Append the encoded payload to a buffer.
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.agent_type.code());
        buf.put_u8(self.id.value());
        buf.put_u8(self.gradient);
        buf.put_u8(self.leader_id.value());
        buf.put_u8(self.flags());
    }

    /// Unpack a received frame. Bytes past the payload are ignored.
    pub fn decode(mut bytes: &[u8]) -> Result<Self> {
        if bytes.len() < PAYLOAD_LEN {
            return Err(WireError::TooShort {
                needed: PAYLOAD_LEN,
                actual: bytes.len(),
            });
        }

        let agent_type = AgentType::try_from(bytes.get_u8())?;
        let id = AgentId(bytes.get_u8());
        let gradient = bytes.get_u8();
        let leader_id = AgentId(bytes.get_u8());
        let flags = bytes.get_u8();

        Ok(Self {
            agent_type,
            id,
            gradient,
            leader_id,
            role: BotRole::try_from(flags & FLAG_ROLE_MASK)?,
            gate: WalkGate::from_bit((flags & FLAG_GATE) >> 2),
        })
    }

    /// The flags byte: role in bits 0-1, gate in bit 2.
    pub fn flags(&self) -> u8 {
        (self.role.code() & FLAG_ROLE_MASK) | (self.gate.code() << 2)
    }

    /// The fields a receiver stores in its connection slot.
    pub fn snapshot(&self) -> NeighborSnapshot {
        NeighborSnapshot {
            gradient: self.gradient,
            leader_id: self.leader_id,
            role: self.role,
            gate: self.gate,
        }
    }
}
