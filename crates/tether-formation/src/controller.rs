//! Per-role formation step.

use rand::Rng;
use tether_topology::{BotRole, ConnectionTable, WalkGate};
use tracing::debug;

use crate::follower::{potential, HillClimber};
use crate::walk::RandomWalk;
use crate::{Color, Motion, D_MAX, D_MIN, IN_BAND_TOLERANCE, REGROUP_MARGIN};

/// What the formation layer knows about the agent this tick.
#[derive(Debug, Clone, Copy)]
pub struct FormationContext<'a> {
    pub role: BotRole,
    pub gradient: u8,
    /// Gate held now. For followers this is the value relayed by a parent.
    pub gate: WalkGate,
    /// Gate held at the end of the previous tick.
    pub prev_gate: WalkGate,
    pub table: &'a ConnectionTable,
    pub now: u32,
}

/// Outcome of one formation step.
///
/// `None` fields mean "leave the actuator as it is".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Directive {
    pub motion: Option<Motion>,
    pub indicator: Option<Color>,
    pub gate: WalkGate,
}

/// Owns the walk and hill-climb state that persists across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationController {
    walk: RandomWalk,
    climber: HillClimber,
}

impl FormationController {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            walk: RandomWalk::new(rng),
            climber: HillClimber::default(),
        }
    }

    pub fn climber(&self) -> &HillClimber {
        &self.climber
    }

    pub fn step<R: Rng + ?Sized>(&mut self, ctx: FormationContext<'_>, rng: &mut R) -> Directive {
        match ctx.role {
            BotRole::Single => Directive {
                motion: self.walk.step(ctx.now, rng),
                indicator: Some(Color::PURPLE),
                gate: ctx.gate,
            },
            BotRole::Leader => self.lead(ctx, rng),
            BotRole::Follower => self.follow(ctx),
        }
    }

    fn lead<R: Rng + ?Sized>(&mut self, ctx: FormationContext<'_>, rng: &mut R) -> Directive {
        let table = ctx.table;
        let gate = match ctx.gate {
            WalkGate::Go if table.children_of(ctx.gradient).any(|c| c.distance > D_MAX) => {
                WalkGate::Wait
            }
            WalkGate::Wait
                if table
                    .children_of(ctx.gradient)
                    .all(|c| c.distance <= D_MIN + REGROUP_MARGIN) =>
            {
                WalkGate::Go
            }
            held => held,
        };
        if gate != ctx.gate {
            debug!(from = ?ctx.gate, to = ?gate, "leader gate flipped");
        }

        match gate {
            WalkGate::Go => Directive {
                motion: self.walk.step(ctx.now, rng),
                indicator: Some(Color::CYAN),
                gate,
            },
            WalkGate::Wait => Directive {
                motion: Some(Motion::Stop),
                indicator: Some(Color::WHITE),
                gate,
            },
        }
    }

    fn follow(&mut self, ctx: FormationContext<'_>) -> Directive {
        let stop = Directive {
            motion: Some(Motion::Stop),
            indicator: None,
            gate: ctx.gate,
        };
        if ctx.gate == WalkGate::Wait {
            return stop;
        }

        let error = potential(ctx.table, ctx.gradient).abs();
        if error < IN_BAND_TOLERANCE {
            return stop;
        }

        let fresh_go = ctx.prev_gate == WalkGate::Wait;
        Directive {
            motion: Some(self.climber.step(error, fresh_go)),
            indicator: Some(Color::YELLOW),
            gate: ctx.gate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tether_topology::{AgentId, AgentType, BindingPolicy, NeighborSnapshot};

    fn table_with(links: &[(u8, u8, u16)]) -> ConnectionTable {
        let mut table = ConnectionTable::new(AgentType::Alpha, BindingPolicy::new([[6; 4]; 4]));
        for &(id, gradient, distance) in links {
            table.admit_or_refresh(
                AgentId(id),
                AgentType::Beta,
                NeighborSnapshot {
                    gradient,
                    leader_id: AgentId(0),
                    role: BotRole::Follower,
                    gate: WalkGate::Go,
                },
                distance,
            );
        }
        table
    }

    fn ctx(
        role: BotRole,
        gradient: u8,
        gate: WalkGate,
        table: &ConnectionTable,
    ) -> FormationContext<'_> {
        FormationContext {
            role,
            gradient,
            gate,
            prev_gate: gate,
            table,
            now: 1000,
        }
    }

    fn setup() -> (FormationController, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        (FormationController::new(&mut rng), rng)
    }

    #[test]
    fn single_walks_in_purple() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[]);
        let d = fc.step(ctx(BotRole::Single, 0, WalkGate::Go, &table), &mut rng);
        assert_eq!(d.indicator, Some(Color::PURPLE));
        // now=1000 is well past the initial hold.
        assert!(d.motion.is_some());
    }

    #[test]
    fn leader_stops_when_subordinate_drifts() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[(1, 1, 80)]);
        let d = fc.step(ctx(BotRole::Leader, 0, WalkGate::Go, &table), &mut rng);
        assert_eq!(d.gate, WalkGate::Wait);
        assert_eq!(d.motion, Some(Motion::Stop));
        assert_eq!(d.indicator, Some(Color::WHITE));
    }

    #[test]
    fn leader_ignores_far_non_subordinates() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[(1, 2, 90), (2, 1, 60)]);
        let d = fc.step(ctx(BotRole::Leader, 0, WalkGate::Go, &table), &mut rng);
        assert_eq!(d.gate, WalkGate::Go);
        assert_eq!(d.indicator, Some(Color::CYAN));
    }

    #[test]
    fn leader_at_far_bound_keeps_going() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[(1, 1, D_MAX)]);
        let d = fc.step(ctx(BotRole::Leader, 0, WalkGate::Go, &table), &mut rng);
        assert_eq!(d.gate, WalkGate::Go);
    }

    #[test]
    fn waiting_leader_resumes_after_regroup() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[(1, 1, D_MIN + REGROUP_MARGIN), (2, 1, 40)]);
        let d = fc.step(ctx(BotRole::Leader, 0, WalkGate::Wait, &table), &mut rng);
        assert_eq!(d.gate, WalkGate::Go);
        assert_eq!(d.indicator, Some(Color::CYAN));
    }

    #[test]
    fn waiting_leader_holds_while_one_straggles() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[(1, 1, 50), (2, 1, D_MIN + REGROUP_MARGIN + 1)]);
        let d = fc.step(ctx(BotRole::Leader, 0, WalkGate::Wait, &table), &mut rng);
        assert_eq!(d.gate, WalkGate::Wait);
        assert_eq!(d.motion, Some(Motion::Stop));
    }

    #[test]
    fn waiting_leader_without_subordinates_resumes() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[]);
        let d = fc.step(ctx(BotRole::Leader, 0, WalkGate::Wait, &table), &mut rng);
        assert_eq!(d.gate, WalkGate::Go);
    }

    #[test]
    fn follower_waits_on_gate() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[(1, 0, 90)]);
        let d = fc.step(ctx(BotRole::Follower, 1, WalkGate::Wait, &table), &mut rng);
        assert_eq!(d.motion, Some(Motion::Stop));
        assert_eq!(d.gate, WalkGate::Wait);
    }

    #[test]
    fn follower_in_band_stops() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[(1, 0, 54)]);
        let d = fc.step(ctx(BotRole::Follower, 1, WalkGate::Go, &table), &mut rng);
        assert_eq!(d.motion, Some(Motion::Stop));
        assert_eq!(d.indicator, None);
    }

    #[test]
    fn follower_climbs_in_yellow() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[(1, 0, 80)]);
        let d = fc.step(ctx(BotRole::Follower, 1, WalkGate::Go, &table), &mut rng);
        // Initial best error is unbounded, so the first probe drives forward.
        assert_eq!(d.motion, Some(Motion::Forward));
        assert_eq!(d.indicator, Some(Color::YELLOW));
    }

    #[test]
    fn follower_resets_on_go_after_wait() {
        let (mut fc, mut rng) = setup();
        let table = table_with(&[(1, 0, 80)]);
        fc.step(ctx(BotRole::Follower, 1, WalkGate::Go, &table), &mut rng);

        let mut resumed = ctx(BotRole::Follower, 1, WalkGate::Go, &table);
        resumed.prev_gate = WalkGate::Wait;
        let d = fc.step(resumed, &mut rng);
        assert_eq!(d.motion, Some(Motion::Stop));
        assert_eq!(fc.climber().best_error(), 30.0);
    }
}
