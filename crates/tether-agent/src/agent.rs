//! Agent state and the tick driver.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tether_consensus::{elect, ElectionState, Rule};
use tether_formation::{relayed_gate, Color, FormationContext, FormationController, Motion};
use tether_topology::{
    Admission, AgentId, AgentType, BindingPolicy, BotRole, ConnectionTable, WalkGate,
    AGENT_TYPES,
};
use tether_wire::{Payload, WireError, PAYLOAD_LEN};
use tracing::{debug, trace};

use crate::{Actuator, DistanceEstimator, RawMeasurement};

/// What one tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Tick counter value this report belongs to
    pub tick: u32,
    /// Sender of the ingested message and what the table made of it
    pub admission: Option<(AgentId, Admission)>,
    /// Election rule that fired
    pub rule: Rule,
    pub role_before: BotRole,
    pub role_after: BotRole,
    /// Gate held at the end of the tick
    pub gate: WalkGate,
    /// Motion command issued, if any
    pub motion: Option<Motion>,
    /// Neighbors evicted by aging
    pub evicted: Vec<AgentId>,
}

/// Read-only view of an agent for display and logging.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentStatus {
    pub id: AgentId,
    pub agent_type: AgentType,
    pub role: BotRole,
    pub gradient: u8,
    pub leader_id: AgentId,
    pub gate: WalkGate,
    pub best_error: f32,
    pub connections: Vec<AgentId>,
    /// Held links per type, in [`AgentType::ALL`] order
    pub type_counts: [usize; AGENT_TYPES],
}

/// One swarm member.
#[derive(Debug, Clone)]
pub struct Agent {
    agent_type: AgentType,
    election: ElectionState,
    gate: WalkGate,
    prev_gate: WalkGate,
    table: ConnectionTable,
    formation: FormationController,
    staged: Option<(Payload, RawMeasurement)>,
    ticks: u32,
    rng: StdRng,
}

impl Agent {
    /// Create an agent with the default binding policy.
    pub fn new(id: AgentId, seed: u64) -> Self {
        Self::with_policy(id, BindingPolicy::default(), seed)
    }

    /// Create an agent with an explicit binding policy.
    ///
    /// The type is assigned from the id. `seed` drives the random walk.
    pub fn with_policy(id: AgentId, policy: BindingPolicy, seed: u64) -> Self {
        let agent_type = AgentType::assign(id);
        let mut rng = StdRng::seed_from_u64(seed);
        let formation = FormationController::new(&mut rng);

        Self {
            agent_type,
            election: ElectionState::new(id),
            gate: WalkGate::Go,
            prev_gate: WalkGate::Wait,
            table: ConnectionTable::new(agent_type, policy),
            formation,
            staged: None,
            ticks: 0,
            rng,
        }
    }

    /// Power-on output: hold still and show the type colour.
    pub fn setup<A: Actuator + ?Sized>(&self, actuator: &mut A) {
        actuator.set_motion(Motion::Stop);
        actuator.set_indicator(Color::for_type(self.agent_type));
    }

    pub fn id(&self) -> AgentId {
        self.election.id
    }

    pub fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    pub fn role(&self) -> BotRole {
        self.election.role
    }

    pub fn gradient(&self) -> u8 {
        self.election.gradient
    }

    pub fn leader_id(&self) -> AgentId {
        self.election.leader_id
    }

    pub fn gate(&self) -> WalkGate {
        self.gate
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn table(&self) -> &ConnectionTable {
        &self.table
    }

    /// Decode a received broadcast and stage it for the next tick.
    ///
    /// Only the most recent message is kept. On a decode error nothing is
    /// staged and any previously staged message survives.
    pub fn on_message_received(
        &mut self,
        bytes: &[u8],
        raw: RawMeasurement,
    ) -> Result<(), WireError> {
        let payload = Payload::decode(bytes)?;
        if let Some((overwritten, _)) = self.staged.replace((payload, raw)) {
            trace!(agent = %self.id(), dropped = %overwritten.id, "staged message overwritten");
        }
        Ok(())
    }

    /// The broadcast describing this agent right now.
    pub fn produce_next_payload(&self) -> [u8; PAYLOAD_LEN] {
        Payload {
            agent_type: self.agent_type,
            id: self.election.id,
            gradient: self.election.gradient,
            leader_id: self.election.leader_id,
            role: self.election.role,
            gate: self.gate,
        }
        .encode()
    }

    /// Run one control period.
    pub fn tick<E, A>(&mut self, estimator: &E, actuator: &mut A) -> TickReport
    where
        E: DistanceEstimator + ?Sized,
        A: Actuator + ?Sized,
    {
        let id = self.election.id;
        let role_before = self.election.role;

        let admission = self.staged.take().map(|(payload, raw)| {
            let distance = estimator.estimate_distance(raw);
            let outcome = self.table.admit_or_refresh(
                payload.id,
                payload.agent_type,
                payload.snapshot(),
                distance,
            );
            match outcome {
                Admission::Admitted => {
                    debug!(agent = %id, neighbor = %payload.id, distance, "connection admitted")
                }
                Admission::Rejected(reason) => {
                    trace!(agent = %id, neighbor = %payload.id, ?reason, "contact rejected")
                }
                Admission::Refreshed => {}
            }
            (payload.id, outcome)
        });

        let rule = elect(&mut self.election, &self.table);
        if rule != Rule::Propagate {
            debug!(
                agent = %id,
                ?rule,
                role = ?self.election.role,
                leader = %self.election.leader_id,
                "election rule fired"
            );
        }

        if self.election.role == BotRole::Follower {
            if let Some(gate) = relayed_gate(&self.table, self.election.gradient) {
                self.gate = gate;
            }
        }

        let directive = self.formation.step(
            FormationContext {
                role: self.election.role,
                gradient: self.election.gradient,
                gate: self.gate,
                prev_gate: self.prev_gate,
                table: &self.table,
                now: self.ticks,
            },
            &mut self.rng,
        );
        self.gate = directive.gate;
        if let Some(color) = directive.indicator {
            actuator.set_indicator(color);
        }
        if let Some(motion) = directive.motion {
            actuator.set_motion(motion);
        }

        let evicted = self.table.age_and_evict();
        for gone in &evicted {
            debug!(agent = %id, neighbor = %gone, "connection timed out");
        }
        self.election.rederive_role(&self.table);

        let role_after = self.election.role;
        if role_after != role_before {
            debug!(agent = %id, from = ?role_before, to = ?role_after, "role changed");
        }
        trace!(
            agent = %id,
            tick = self.ticks,
            gradient = self.election.gradient,
            gate = ?self.gate,
            "tick done"
        );

        let report = TickReport {
            tick: self.ticks,
            admission,
            rule,
            role_before,
            role_after,
            gate: self.gate,
            motion: directive.motion,
            evicted,
        };
        self.prev_gate = self.gate;
        self.ticks = self.ticks.wrapping_add(1);
        report
    }

    /// Snapshot of the agent for display.
    pub fn status(&self) -> AgentStatus {
        let mut type_counts = [0; AGENT_TYPES];
        for t in AgentType::ALL {
            type_counts[t.index()] = self.table.count_of_type(t);
        }

        AgentStatus {
            id: self.election.id,
            agent_type: self.agent_type,
            role: self.election.role,
            gradient: self.election.gradient,
            leader_id: self.election.leader_id,
            gate: self.gate,
            best_error: self.formation.climber().best_error(),
            connections: self.table.iter().map(|c| c.id).collect(),
            type_counts,
        }
    }
}
