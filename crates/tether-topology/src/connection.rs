//! Fixed-capacity neighbor registry with liveness aging.
//!
//! # Invariants
//!
//! - At most one occupied slot per neighbor identifier.
//! - Never more than [`MAX_CONNECTIONS`] occupied slots.
//! - Never more links to a type than the binding matrix allows.
//! - Age is 0 right after admission or refresh and grows by one per
//!   [`ConnectionTable::age_and_evict`] pass; a slot whose age exceeds
//!   [`CONNECTION_TIMEOUT`] is freed in that same pass.

use crate::{
    AgentId, AgentType, BindingPolicy, BotRole, WalkGate, BIND_RADIUS, CONNECTION_TIMEOUT,
    MAX_CONNECTIONS,
};

/// The remote fields a neighbor advertises in every broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeighborSnapshot {
    pub gradient: u8,
    pub leader_id: AgentId,
    pub role: BotRole,
    pub gate: WalkGate,
}

/// One known neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection {
    /// Neighbor identifier
    pub id: AgentId,
    /// Neighbor type (fixed at admission)
    pub agent_type: AgentType,
    /// Last-known hop count from the neighbor's leader
    pub gradient: u8,
    /// Last-known leader the neighbor follows
    pub leader_id: AgentId,
    /// Last-known role
    pub role: BotRole,
    /// Last-known walk gate
    pub gate: WalkGate,
    /// Last distance estimate (mm)
    pub distance: u16,
    /// Ticks since last refresh
    pub age: u8,
}

impl Connection {
    fn new(id: AgentId, agent_type: AgentType, snapshot: NeighborSnapshot, distance: u16) -> Self {
        Self {
            id,
            agent_type,
            gradient: snapshot.gradient,
            leader_id: snapshot.leader_id,
            role: snapshot.role,
            gate: snapshot.gate,
            distance,
            age: 0,
        }
    }

    fn refresh(&mut self, snapshot: NeighborSnapshot, distance: u16) {
        self.gradient = snapshot.gradient;
        self.leader_id = snapshot.leader_id;
        self.role = snapshot.role;
        self.gate = snapshot.gate;
        self.distance = distance;
        self.age = 0;
    }

    /// The remote fields as last advertised.
    pub fn snapshot(&self) -> NeighborSnapshot {
        NeighborSnapshot {
            gradient: self.gradient,
            leader_id: self.leader_id,
            role: self.role,
            gate: self.gate,
        }
    }
}

/// What happened to an incoming contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Sender already held a slot; its fields were updated and age reset.
    Refreshed,
    /// Sender was given a fresh slot.
    Admitted,
    /// No link formed this time.
    Rejected(RejectReason),
}

/// Why a new contact was not admitted. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The binding matrix forbids this type pair in both directions.
    IncompatibleType,
    /// Already holding as many links of this type as the own row allows.
    CapacityExceeded,
    /// Measured distance is not within the bind radius.
    OutOfRange,
    /// Every slot is occupied.
    TableFull,
}

/// An agent's neighbor table.
#[derive(Debug, Clone)]
pub struct ConnectionTable {
    own_type: AgentType,
    policy: BindingPolicy,
    slots: [Option<Connection>; MAX_CONNECTIONS],
}

impl ConnectionTable {
    /// Create an empty table for an agent of `own_type`.
    pub fn new(own_type: AgentType, policy: BindingPolicy) -> Self {
        Self {
            own_type,
            policy,
            slots: [None; MAX_CONNECTIONS],
        }
    }

    /// The binding policy used for admission.
    pub fn policy(&self) -> &BindingPolicy {
        &self.policy
    }

    /// Refresh the sender's slot, or admit it if every admission rule holds.
    pub fn admit_or_refresh(
        &mut self,
        sender_id: AgentId,
        sender_type: AgentType,
        snapshot: NeighborSnapshot,
        distance: u16,
    ) -> Admission {
        if let Some(conn) = self.slots.iter_mut().flatten().find(|c| c.id == sender_id) {
            conn.refresh(snapshot, distance);
            return Admission::Refreshed;
        }

        if !self.policy.is_valid_binding(self.own_type, sender_type) {
            return Admission::Rejected(RejectReason::IncompatibleType);
        }
        if !self
            .policy
            .can_bind(self.own_type, sender_type, self.count_of_type(sender_type))
        {
            return Admission::Rejected(RejectReason::CapacityExceeded);
        }
        if distance >= BIND_RADIUS {
            return Admission::Rejected(RejectReason::OutOfRange);
        }

        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(slot) => {
                *slot = Some(Connection::new(sender_id, sender_type, snapshot, distance));
                Admission::Admitted
            }
            None => Admission::Rejected(RejectReason::TableFull),
        }
    }

    /// Age every occupied slot by one tick and free the ones past the timeout.
    ///
    /// Returns the identifiers evicted on this pass.
    pub fn age_and_evict(&mut self) -> Vec<AgentId> {
        let mut evicted = Vec::new();
        for slot in self.slots.iter_mut() {
            if let Some(conn) = slot {
                conn.age = conn.age.saturating_add(1);
                if conn.age > CONNECTION_TIMEOUT {
                    evicted.push(conn.id);
                    *slot = None;
                }
            }
        }
        evicted
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.slots.iter().flatten()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True when no neighbor is held.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Look up a neighbor by identifier.
    pub fn get(&self, id: AgentId) -> Option<&Connection> {
        self.iter().find(|c| c.id == id)
    }

    /// Is this neighbor currently held.
    pub fn contains(&self, id: AgentId) -> bool {
        self.get(id).is_some()
    }

    /// How many held links go to agents of type `t`.
    pub fn count_of_type(&self, t: AgentType) -> usize {
        self.iter().filter(|c| c.agent_type == t).count()
    }

    /// Links one hop closer to the root than `gradient`.
    pub fn parents_of(&self, gradient: u8) -> impl Iterator<Item = &Connection> {
        let parent = gradient.checked_sub(1);
        self.iter().filter(move |c| Some(c.gradient) == parent)
    }

    /// Links one hop further from the root than `gradient`.
    pub fn children_of(&self, gradient: u8) -> impl Iterator<Item = &Connection> {
        let child = gradient.checked_add(1);
        self.iter().filter(move |c| Some(c.gradient) == child)
    }
}
