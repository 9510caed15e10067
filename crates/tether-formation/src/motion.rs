//! Actuation vocabulary.

use tether_topology::AgentType;

/// Drive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Motion {
    Forward,
    #[default]
    Stop,
    Left,
    Right,
}

/// Status indicator colour, two bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const OFF: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(3, 0, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 3);
    pub const YELLOW: Self = Self::rgb(3, 3, 0);
    pub const CYAN: Self = Self::rgb(0, 3, 3);
    pub const WHITE: Self = Self::rgb(1, 1, 1);
    pub const PURPLE: Self = Self::rgb(1, 0, 1);

    /// Build a colour, clamping each channel to two bits.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r & 0x03,
            g: g & 0x03,
            b: b & 0x03,
        }
    }

    /// Startup colour identifying the agent's type.
    pub const fn for_type(agent_type: AgentType) -> Self {
        match agent_type {
            AgentType::Alpha => Self::RED,
            AgentType::Beta | AgentType::Gamma => Self::BLUE,
            AgentType::Delta => Self::YELLOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_two_bits() {
        assert_eq!(Color::rgb(7, 4, 255), Color::rgb(3, 0, 3));
    }

    #[test]
    fn type_palette() {
        assert_eq!(Color::for_type(AgentType::Alpha), Color::RED);
        assert_eq!(Color::for_type(AgentType::Gamma), Color::BLUE);
        assert_eq!(Color::for_type(AgentType::Delta), Color::YELLOW);
    }
}
