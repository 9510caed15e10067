//! The ordered rule cascade.
//!
//! Every rule scans all neighbors in slot order and acts on the first one that
//! satisfies its predicate. A rule that matches ends the pass, even when the
//! comparison it makes leaves the state unchanged.

use tether_topology::{BotRole, ConnectionTable};
use tracing::trace;

use crate::ElectionState;

/// Consecutive ticks two leaders must see each other before the higher id yields.
pub const LEADER_CONFLICT_TICKS: u8 = 3;

/// One entry of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Single + neighbor Leader: become leader of a new group.
    LoneMeetsLeader,
    /// Single + neighbor Single: lower id leads, higher id follows at gradient 1.
    LoneAgentsMeet,
    /// Leader + neighbor Single: follow the newcomer at gradient 1.
    LeaderMeetsLone,
    /// Single + neighbor Follower: join its group one hop further out.
    LoneMeetsFollower,
    /// Leader + Follower of another group: defect if that group's leader id is lower.
    LeaderMeetsForeignFollower,
    /// Leader + another Leader: debounced yield to the lower id.
    LeaderCollision,
    /// Follower + Follower of another group: adopt the lower leader id.
    FollowersRealign,
    /// No conflict: leaders sit at 0, followers take the best same-group gradient.
    Propagate,
}

/// Evaluation order. First match wins.
pub const RULE_ORDER: [Rule; 8] = [
    Rule::LoneMeetsLeader,
    Rule::LoneAgentsMeet,
    Rule::LeaderMeetsLone,
    Rule::LoneMeetsFollower,
    Rule::LeaderMeetsForeignFollower,
    Rule::LeaderCollision,
    Rule::FollowersRealign,
    Rule::Propagate,
];

impl Rule {
    /// Apply this rule if it matches. Returns whether it matched.
    pub(crate) fn apply(self, state: &mut ElectionState, table: &ConnectionTable) -> bool {
        match self {
            Rule::LoneMeetsLeader => {
                if state.role != BotRole::Single {
                    return false;
                }
                if !table.iter().any(|c| c.role == BotRole::Leader) {
                    return false;
                }
                state.lead();
                true
            }

            Rule::LoneAgentsMeet => {
                if state.role != BotRole::Single {
                    return false;
                }
                let Some(peer) = table.iter().find(|c| c.role == BotRole::Single) else {
                    return false;
                };
                if state.id < peer.id {
                    state.lead();
                } else {
                    state.follow(peer.id, 1);
                }
                true
            }

            Rule::LeaderMeetsLone => {
                if state.role != BotRole::Leader {
                    return false;
                }
                let Some(lone) = table.iter().find(|c| c.role == BotRole::Single) else {
                    return false;
                };
                state.follow(lone.id, 1);
                true
            }

            Rule::LoneMeetsFollower => {
                if state.role != BotRole::Single {
                    return false;
                }
                let Some(member) = table.iter().find(|c| c.role == BotRole::Follower) else {
                    return false;
                };
                state.follow(member.leader_id, member.gradient.saturating_add(1));
                true
            }

            Rule::LeaderMeetsForeignFollower => {
                if state.role != BotRole::Leader {
                    return false;
                }
                let Some(foreign) = table
                    .iter()
                    .find(|c| c.role == BotRole::Follower && c.leader_id != state.leader_id)
                else {
                    return false;
                };
                if foreign.leader_id < state.leader_id {
                    state.follow(foreign.leader_id, foreign.gradient.saturating_add(1));
                }
                true
            }

            Rule::LeaderCollision => {
                if state.role != BotRole::Leader {
                    return false;
                }
                let Some(rival) = table
                    .iter()
                    .find(|c| c.role == BotRole::Leader && c.id != state.id)
                else {
                    state.conflict_count = 0;
                    return false;
                };
                if rival.id < state.id {
                    if state.conflict_count + 1 >= LEADER_CONFLICT_TICKS {
                        state.follow(rival.id, 1);
                        state.conflict_count = 0;
                    } else {
                        state.conflict_count += 1;
                        trace!(
                            agent = %state.id,
                            rival = %rival.id,
                            count = state.conflict_count,
                            "leader collision debouncing"
                        );
                    }
                }
                true
            }

            Rule::FollowersRealign => {
                if state.role != BotRole::Follower {
                    return false;
                }
                let Some(foreign) = table
                    .iter()
                    .find(|c| c.role == BotRole::Follower && c.leader_id != state.leader_id)
                else {
                    return false;
                };
                if foreign.leader_id < state.leader_id {
                    state.leader_id = foreign.leader_id;
                    state.gradient = foreign.gradient.saturating_add(1);
                }
                true
            }

            Rule::Propagate => {
                if state.role == BotRole::Leader {
                    state.gradient = 0;
                } else if let Some(best) = table
                    .iter()
                    .filter(|c| c.leader_id == state.leader_id)
                    .map(|c| c.gradient.saturating_add(1))
                    .min()
                {
                    state.gradient = best;
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cascade_order_is_fixed() {
        assert_eq!(
            RULE_ORDER,
            [
                Rule::LoneMeetsLeader,
                Rule::LoneAgentsMeet,
                Rule::LeaderMeetsLone,
                Rule::LoneMeetsFollower,
                Rule::LeaderMeetsForeignFollower,
                Rule::LeaderCollision,
                Rule::FollowersRealign,
                Rule::Propagate,
            ]
        );
    }

    #[test]
    fn propagate_is_last() {
        assert_eq!(RULE_ORDER[RULE_ORDER.len() - 1], Rule::Propagate);
    }

    #[test]
    fn rules_are_distinct() {
        for i in 0..RULE_ORDER.len() {
            for j in (i + 1)..RULE_ORDER.len() {
                assert_ne!(RULE_ORDER[i], RULE_ORDER[j]);
            }
        }
    }

    #[test]
    fn debounce_threshold_is_three() {
        assert_eq!(LEADER_CONFLICT_TICKS, 3);
    }
}
