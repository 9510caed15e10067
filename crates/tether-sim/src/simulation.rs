//! Swarm simulation over a lossy one-hop broadcast channel.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tether_agent::{Actuator, Agent, RawMeasurement};
use tether_formation::{Color, Motion};
use tether_topology::{Admission, AgentId};
use tracing::{debug, trace};

use crate::config::{Result, SimulationConfig};
use crate::events::{AgentState, Pose, SwarmEvent, SwarmSnapshot};

/// The physical side of a simulated agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pose: Pose,
    pub motion: Motion,
    pub indicator: Color,
}

impl Actuator for Body {
    fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    fn set_indicator(&mut self, color: Color) {
        self.indicator = color;
    }
}

impl Body {
    /// Apply the held motion for one tick.
    fn integrate(&mut self, speed: f64, turn: f64) {
        match self.motion {
            Motion::Forward => {
                self.pose.x += speed * self.pose.heading.cos();
                self.pose.y += speed * self.pose.heading.sin();
            }
            Motion::Left => self.pose.heading = (self.pose.heading + turn).rem_euclid(TAU),
            Motion::Right => self.pose.heading = (self.pose.heading - turn).rem_euclid(TAU),
            Motion::Stop => {}
        }
    }
}

/// Radio readings in the simulator are distances in whole millimetres.
fn millimetres(raw: RawMeasurement) -> u16 {
    raw.0
}

struct Member {
    agent: Agent,
    body: Body,
}

/// Simulates a swarm and records events.
pub struct Simulation {
    config: SimulationConfig,
    rng: StdRng,
    members: Vec<Member>,
    events: Vec<SwarmEvent>,
    current_frame: u64,
}

impl Simulation {
    /// Create a new simulation with the given configuration.
    ///
    /// Agents start on a row along +x with random headings.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut members = Vec::with_capacity(config.agents);
        for (i, id) in (config.first_id..=u8::MAX).take(config.agents).enumerate() {
            let agent = Agent::new(AgentId(id), rng.gen());
            let mut body = Body {
                pose: Pose {
                    x: i as f64 * config.spacing_mm,
                    y: 0.0,
                    heading: rng.gen_range(0.0..TAU),
                },
                motion: Motion::Stop,
                indicator: Color::OFF,
            };
            agent.setup(&mut body);
            members.push(Member { agent, body });
        }

        Ok(Self {
            config,
            rng,
            members,
            events: Vec::new(),
            current_frame: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Change the delivery loss rate mid-run, e.g. to black out the radio.
    pub fn set_loss_rate(&mut self, loss_rate: f64) -> Result<()> {
        let config = SimulationConfig {
            loss_rate,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Advance the whole swarm by one tick.
    pub fn step(&mut self) {
        self.broadcast();

        let frame = self.current_frame;
        let mut events = Vec::new();
        for member in &mut self.members {
            let id = member.agent.id();
            let gate_before = member.agent.gate();
            let report = member.agent.tick(&millimetres, &mut member.body);

            if let Some((neighbor, Admission::Admitted)) = report.admission {
                let distance_mm = member
                    .agent
                    .table()
                    .get(neighbor)
                    .map_or(0.0, |c| f64::from(c.distance));
                events.push(SwarmEvent::ConnectionFormed {
                    agent: id,
                    neighbor,
                    distance_mm,
                    frame,
                });
            }
            for neighbor in report.evicted {
                events.push(SwarmEvent::ConnectionLost {
                    agent: id,
                    neighbor,
                    frame,
                });
            }
            if report.role_before != report.role_after {
                events.push(SwarmEvent::RoleChanged {
                    agent: id,
                    from: report.role_before,
                    to: report.role_after,
                    leader: member.agent.leader_id(),
                    gradient: member.agent.gradient(),
                    frame,
                });
            }
            if gate_before != report.gate {
                events.push(SwarmEvent::GateChanged {
                    agent: id,
                    from: gate_before,
                    to: report.gate,
                    frame,
                });
            }
        }

        if self.config.mobile {
            let (speed, turn) = (self.config.speed_mm_per_tick, self.config.turn_rad_per_tick);
            for member in &mut self.members {
                member.body.integrate(speed, turn);
            }
        }

        for event in &events {
            debug!(?event, "swarm event");
        }
        self.events.extend(events);
        self.current_frame += 1;
    }

    /// Deliver every agent's current payload to the agents within radio range.
    ///
    /// Each receiver hears its senders in a fresh random order every tick.
    fn broadcast(&mut self) {
        let payloads: Vec<_> = self
            .members
            .iter()
            .map(|m| (m.body.pose, m.agent.produce_next_payload()))
            .collect();

        let mut order: Vec<usize> = (0..payloads.len()).collect();
        for (receiver, member) in self.members.iter_mut().enumerate() {
            order.shuffle(&mut self.rng);
            for &sender in &order {
                if sender == receiver {
                    continue;
                }
                let (pose, bytes) = &payloads[sender];
                let distance = member.body.pose.distance_to(pose);
                if distance >= self.config.radio_range_mm {
                    continue;
                }
                if self.rng.gen_bool(self.config.loss_rate) {
                    trace!(sender, receiver, "delivery dropped");
                    continue;
                }

                let noise = if self.config.noise_mm > 0.0 {
                    self.rng.gen_range(-self.config.noise_mm..=self.config.noise_mm)
                } else {
                    0.0
                };
                let measured = (distance + noise).round().clamp(0.0, f64::from(u16::MAX)) as u16;
                if let Err(error) = member
                    .agent
                    .on_message_received(bytes, RawMeasurement(measured))
                {
                    debug!(%error, sender, receiver, "undecodable broadcast");
                }
            }
        }
    }

    /// Run for the configured number of ticks.
    pub fn run(&mut self) {
        for _ in 0..self.config.ticks {
            self.step();
        }
    }

    /// Run for `ticks` more ticks.
    pub fn run_for(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Get all recorded events.
    pub fn events(&self) -> &[SwarmEvent] {
        &self.events
    }

    /// Get the number of events recorded.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Get the number of agents in the swarm.
    pub fn agent_count(&self) -> usize {
        self.members.len()
    }

    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    /// Look up an agent by identifier.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.members.iter().map(|m| &m.agent).find(|a| a.id() == id)
    }

    /// Iterate over all agents.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.members.iter().map(|m| &m.agent)
    }

    /// Get a snapshot of the swarm at the current state.
    pub fn snapshot(&self) -> SwarmSnapshot {
        let agents = self
            .members
            .iter()
            .map(|m| AgentState {
                status: m.agent.status(),
                pose: m.body.pose,
                motion: m.body.motion,
                indicator: m.body.indicator,
            })
            .collect();
        SwarmSnapshot::new(self.current_frame, agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_topology::BotRole;

    fn still(agents: usize, spacing_mm: f64) -> SimulationConfig {
        SimulationConfig {
            agents,
            spacing_mm,
            loss_rate: 0.0,
            noise_mm: 0.0,
            mobile: false,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn simulation_starts_single() {
        let sim = Simulation::new(still(4, 40.0)).unwrap();
        assert_eq!(sim.agent_count(), 4);
        assert_eq!(sim.current_frame(), 0);
        assert_eq!(sim.event_count(), 0);
        assert!(sim.agents().all(|a| a.role() == BotRole::Single));
    }

    #[test]
    fn agents_start_on_a_row() {
        let sim = Simulation::new(still(3, 40.0)).unwrap();
        let snap = sim.snapshot();
        let xs: Vec<f64> = snap.agents.iter().map(|a| a.pose.x).collect();
        assert_eq!(xs, vec![0.0, 40.0, 80.0]);
        assert!(snap.agents.iter().all(|a| a.pose.y == 0.0));
    }

    #[test]
    fn setup_shows_type_colour() {
        let sim = Simulation::new(still(3, 40.0)).unwrap();
        let snap = sim.snapshot();
        assert_eq!(snap.agents[0].indicator, Color::RED);
        assert_eq!(snap.agents[2].indicator, Color::BLUE);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SimulationConfig {
            loss_rate: 2.0,
            ..SimulationConfig::default()
        };
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn out_of_radio_range_never_connects() {
        let mut config = still(3, 200.0);
        config.radio_range_mm = 150.0;
        let mut sim = Simulation::new(config).unwrap();
        sim.run_for(50);
        assert_eq!(sim.current_frame(), 50);
        assert!(sim.agents().all(|a| a.table().is_empty()));
        assert_eq!(sim.event_count(), 0);
    }

    #[test]
    fn loss_rate_change_is_validated() {
        let mut sim = Simulation::new(still(2, 40.0)).unwrap();
        assert!(sim.set_loss_rate(1.5).is_err());
        assert_eq!(sim.config().loss_rate, 0.0);
        sim.set_loss_rate(0.5).unwrap();
        assert_eq!(sim.config().loss_rate, 0.5);
    }

    #[test]
    fn forward_motion_follows_heading() {
        let mut body = Body {
            pose: Pose {
                x: 0.0,
                y: 0.0,
                heading: 0.0,
            },
            motion: Motion::Forward,
            indicator: Color::OFF,
        };
        body.integrate(2.0, 0.1);
        assert_eq!(body.pose.x, 2.0);
        assert_eq!(body.pose.y, 0.0);

        body.set_motion(Motion::Left);
        body.integrate(2.0, 0.5);
        assert_eq!(body.pose.heading, 0.5);
        assert_eq!(body.pose.x, 2.0);

        body.set_motion(Motion::Right);
        body.integrate(2.0, 0.5);
        assert_eq!(body.pose.heading, 0.0);
    }

    #[test]
    fn same_seed_same_timeline() {
        let config = SimulationConfig {
            agents: 6,
            ticks: 300,
            ..SimulationConfig::default()
        };
        let mut a = Simulation::new(config.clone()).unwrap();
        let mut b = Simulation::new(config).unwrap();
        a.run();
        b.run();
        assert_eq!(a.events(), b.events());
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
