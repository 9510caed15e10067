//! Static type-compatibility matrix.
//!
//! Cell `[own][other]` is the number of links an agent of type `own` may hold
//! to agents of type `other`. A link is structurally valid if either
//! direction's cell is non-zero; the capacity check always reads the own row.

use crate::{AgentType, AGENT_TYPES};

/// Default topology: Alpha and Beta alternate with fan-out 2, Gamma and Delta
/// only chain with their own kind.
pub const DEFAULT_BINDING_MATRIX: [[u8; AGENT_TYPES]; AGENT_TYPES] = [
    // Alpha Beta Gamma Delta
    [0, 2, 0, 0], // Alpha
    [2, 0, 0, 0], // Beta
    [0, 0, 2, 0], // Gamma
    [0, 0, 0, 2], // Delta
];

/// Which structural links may be formed, and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingPolicy {
    matrix: [[u8; AGENT_TYPES]; AGENT_TYPES],
}

impl Default for BindingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BINDING_MATRIX)
    }
}

impl BindingPolicy {
    /// Build a policy from an explicit matrix.
    pub const fn new(matrix: [[u8; AGENT_TYPES]; AGENT_TYPES]) -> Self {
        Self { matrix }
    }

    /// Can these two types form any link at all.
    pub const fn is_valid_binding(&self, a: AgentType, b: AgentType) -> bool {
        self.matrix[a.index()][b.index()] > 0 || self.matrix[b.index()][a.index()] > 0
    }

    /// How many links to `other` an agent of type `own` may hold.
    pub const fn capacity(&self, own: AgentType, other: AgentType) -> u8 {
        self.matrix[own.index()][other.index()]
    }

    /// Can `own` take one more link to `other` given `held` existing links.
    pub const fn can_bind(&self, own: AgentType, other: AgentType, held: usize) -> bool {
        let cap = self.capacity(own, other);
        cap > 0 && held < cap as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_is_symmetric() {
        let policy = BindingPolicy::default();
        for a in AgentType::ALL {
            for b in AgentType::ALL {
                assert_eq!(
                    policy.is_valid_binding(a, b),
                    policy.is_valid_binding(b, a),
                    "{:?}/{:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn default_alpha_beta_chain() {
        let policy = BindingPolicy::default();
        assert!(policy.is_valid_binding(AgentType::Alpha, AgentType::Beta));
        assert!(!policy.is_valid_binding(AgentType::Alpha, AgentType::Alpha));
        assert!(!policy.is_valid_binding(AgentType::Beta, AgentType::Gamma));
        assert!(policy.is_valid_binding(AgentType::Delta, AgentType::Delta));
        assert_eq!(policy.capacity(AgentType::Beta, AgentType::Alpha), 2);
    }

    #[test]
    fn one_sided_cell_is_valid_but_capacity_reads_own_row() {
        let mut matrix = [[0; AGENT_TYPES]; AGENT_TYPES];
        matrix[AgentType::Alpha.index()][AgentType::Gamma.index()] = 1;
        let policy = BindingPolicy::new(matrix);

        assert!(policy.is_valid_binding(AgentType::Gamma, AgentType::Alpha));
        assert!(policy.can_bind(AgentType::Alpha, AgentType::Gamma, 0));
        assert!(!policy.can_bind(AgentType::Gamma, AgentType::Alpha, 0));
    }

    #[test]
    fn can_bind_stops_at_capacity() {
        let policy = BindingPolicy::default();
        assert!(policy.can_bind(AgentType::Alpha, AgentType::Beta, 0));
        assert!(policy.can_bind(AgentType::Alpha, AgentType::Beta, 1));
        assert!(!policy.can_bind(AgentType::Alpha, AgentType::Beta, 2));
    }
}
