//! Per-tick election pass.

use tether_topology::{AgentId, BotRole, ConnectionTable};

use crate::rules::{Rule, RULE_ORDER};

/// The part of an agent's state the election reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectionState {
    /// This agent's identifier
    pub id: AgentId,
    /// Role as of the end of the last pass
    pub role: BotRole,
    /// Leader this agent believes roots its group
    pub leader_id: AgentId,
    /// Hops from that leader
    pub gradient: u8,
    /// Consecutive ticks a lower-id rival leader has been seen
    pub conflict_count: u8,
}

impl ElectionState {
    /// Fresh state: alone, leading itself, gradient 0.
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            role: BotRole::Single,
            leader_id: id,
            gradient: 0,
            conflict_count: 0,
        }
    }

    /// Recompute the role from connection presence and leader identity.
    ///
    /// A leader always sits at gradient 0.
    pub fn rederive_role(&mut self, table: &ConnectionTable) {
        self.role = BotRole::derive(!table.is_empty(), self.leader_id == self.id);
        if self.role == BotRole::Leader {
            self.gradient = 0;
        }
    }

    pub(crate) fn lead(&mut self) {
        self.role = BotRole::Leader;
        self.leader_id = self.id;
        self.gradient = 0;
    }

    pub(crate) fn follow(&mut self, leader: AgentId, gradient: u8) {
        self.role = BotRole::Follower;
        self.leader_id = leader;
        self.gradient = gradient;
    }
}

/// Run the rule cascade once against the current neighbor table.
///
/// Matching uses the role held from the previous pass; the role is re-derived
/// afterwards so it always agrees with the leader id and connection presence.
/// Returns the rule that fired.
pub fn elect(state: &mut ElectionState, table: &ConnectionTable) -> Rule {
    let fired = RULE_ORDER
        .into_iter()
        .find(|rule| rule.apply(state, table))
        .unwrap_or(Rule::Propagate);
    state.rederive_role(table);
    fired
}
