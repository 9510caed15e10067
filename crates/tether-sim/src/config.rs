//! Simulation parameters.

use std::str::FromStr;

use thiserror::Error;

/// Errors raised while reading simulation configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?}")]
    Parse { var: &'static str, value: String },

    #[error("{var}: must be {expected}")]
    OutOfRange {
        var: &'static str,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration for the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Seed for deterministic runs
    pub seed: u64,
    /// Number of agents
    pub agents: usize,
    /// Identifier of the first agent; the rest follow consecutively
    pub first_id: u8,
    /// Ticks to run
    pub ticks: u32,
    /// Initial spacing along the starting row (mm)
    pub spacing_mm: f64,
    /// Broadcasts reach agents closer than this (mm)
    pub radio_range_mm: f64,
    /// Probability that any single delivery is dropped (0.0 - 1.0)
    pub loss_rate: f64,
    /// Uniform distance measurement noise amplitude (mm)
    pub noise_mm: f64,
    /// Forward speed (mm per tick)
    pub speed_mm_per_tick: f64,
    /// Turn rate (radians per tick)
    pub turn_rad_per_tick: f64,
    /// Integrate motion commands; when false agents stay where they start
    pub mobile: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            agents: 8,
            first_id: 0,
            ticks: 3200,
            spacing_mm: 40.0,
            radio_range_mm: 150.0,
            loss_rate: 0.1,
            noise_mm: 2.0,
            speed_mm_per_tick: 0.3,
            turn_rad_per_tick: 0.02,
            mobile: true,
        }
    }
}

impl SimulationConfig {
    /// Create config from `TETHER_*` environment variables, defaulting the rest.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            seed: var(&lookup, "TETHER_SEED", defaults.seed)?,
            agents: var(&lookup, "TETHER_AGENTS", defaults.agents)?,
            first_id: var(&lookup, "TETHER_FIRST_ID", defaults.first_id)?,
            ticks: var(&lookup, "TETHER_TICKS", defaults.ticks)?,
            spacing_mm: var(&lookup, "TETHER_SPACING_MM", defaults.spacing_mm)?,
            radio_range_mm: var(&lookup, "TETHER_RADIO_RANGE_MM", defaults.radio_range_mm)?,
            loss_rate: var(&lookup, "TETHER_LOSS_RATE", defaults.loss_rate)?,
            noise_mm: var(&lookup, "TETHER_NOISE_MM", defaults.noise_mm)?,
            speed_mm_per_tick: var(
                &lookup,
                "TETHER_SPEED_MM_PER_TICK",
                defaults.speed_mm_per_tick,
            )?,
            turn_rad_per_tick: var(
                &lookup,
                "TETHER_TURN_RAD_PER_TICK",
                defaults.turn_rad_per_tick,
            )?,
            mobile: flag(&lookup, "TETHER_MOBILE", defaults.mobile)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the values describe a runnable simulation.
    pub fn validate(&self) -> Result<()> {
        if self.agents == 0 || self.first_id as usize + self.agents > 256 {
            return Err(ConfigError::OutOfRange {
                var: "TETHER_AGENTS",
                expected: "at least 1, with every identifier fitting in a byte",
            });
        }
        if !(0.0..=1.0).contains(&self.loss_rate) {
            return Err(ConfigError::OutOfRange {
                var: "TETHER_LOSS_RATE",
                expected: "between 0 and 1",
            });
        }

        let non_negative = [
            ("TETHER_SPACING_MM", self.spacing_mm),
            ("TETHER_RADIO_RANGE_MM", self.radio_range_mm),
            ("TETHER_NOISE_MM", self.noise_mm),
            ("TETHER_SPEED_MM_PER_TICK", self.speed_mm_per_tick),
            ("TETHER_TURN_RAD_PER_TICK", self.turn_rad_per_tick),
        ];
        for (var, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange {
                    var,
                    expected: "a finite non-negative number",
                });
            }
        }
        Ok(())
    }
}

fn var<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Parse {
            var: name,
            value: raw,
        }),
    }
}

fn flag<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).as_deref().map(str::trim) {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::Parse {
            var: name,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<SimulationConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SimulationConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_are_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
        assert_eq!(from_pairs(&[]).unwrap(), SimulationConfig::default());
    }

    #[test]
    fn overrides_apply() {
        let config = from_pairs(&[
            ("TETHER_SEED", "7"),
            ("TETHER_AGENTS", "12"),
            ("TETHER_LOSS_RATE", " 0.25 "),
            ("TETHER_MOBILE", "off"),
        ])
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.agents, 12);
        assert_eq!(config.loss_rate, 0.25);
        assert!(!config.mobile);
        assert_eq!(config.ticks, SimulationConfig::default().ticks);
    }

    #[test]
    fn unparsable_value_rejected() {
        let err = from_pairs(&[("TETHER_TICKS", "forever")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Parse {
                var: "TETHER_TICKS",
                value: "forever".into()
            }
        );
    }

    #[test]
    fn bad_flag_rejected() {
        assert!(matches!(
            from_pairs(&[("TETHER_MOBILE", "maybe")]),
            Err(ConfigError::Parse { var: "TETHER_MOBILE", .. })
        ));
    }

    #[test]
    fn loss_rate_bounded() {
        assert!(matches!(
            from_pairs(&[("TETHER_LOSS_RATE", "1.5")]),
            Err(ConfigError::OutOfRange { var: "TETHER_LOSS_RATE", .. })
        ));
    }

    #[test]
    fn identifiers_must_fit_a_byte() {
        assert!(from_pairs(&[("TETHER_AGENTS", "256")]).is_ok());
        assert!(from_pairs(&[("TETHER_AGENTS", "257")]).is_err());
        assert!(from_pairs(&[("TETHER_AGENTS", "10"), ("TETHER_FIRST_ID", "250")]).is_err());
        assert!(from_pairs(&[("TETHER_AGENTS", "0")]).is_err());
    }

    #[test]
    fn negative_geometry_rejected() {
        assert!(matches!(
            from_pairs(&[("TETHER_SPACING_MM", "-1")]),
            Err(ConfigError::OutOfRange { var: "TETHER_SPACING_MM", .. })
        ));
        assert!(from_pairs(&[("TETHER_NOISE_MM", "NaN")]).is_err());
    }
}
