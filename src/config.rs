use crate::consts::{DEFAULT_CAP, DEFAULT_MAX_ITERATIONS, DEFAULT_SPREAD_GOAL};
use crate::error::{CfResult, ClassForgeError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub primary: PrimaryPhaseParams,
    #[command(flatten)]
    pub secondary: SecondaryPhaseParams,
}

/// Cap, goal and iteration budget for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSettings {
    pub cap: usize,
    pub spread_goal: usize,
    pub max_iterations: usize,
}

impl Default for PhaseSettings {
    fn default() -> Self {
        Self {
            cap: DEFAULT_CAP,
            spread_goal: DEFAULT_SPREAD_GOAL,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrimaryPhaseParams {
    /// Tier-1 students a class may hold before it counts as in excess
    #[arg(long, default_value_t = DEFAULT_CAP)]
    pub cap_primary: usize,
    #[arg(long, default_value_t = DEFAULT_SPREAD_GOAL)]
    pub spread_goal_primary: usize,
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iter_primary: usize,
}

impl Default for PrimaryPhaseParams {
    fn default() -> Self {
        Self {
            cap_primary: DEFAULT_CAP,
            spread_goal_primary: DEFAULT_SPREAD_GOAL,
            max_iter_primary: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl PrimaryPhaseParams {
    pub fn settings(&self) -> PhaseSettings {
        PhaseSettings {
            cap: self.cap_primary,
            spread_goal: self.spread_goal_primary,
            max_iterations: self.max_iter_primary,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecondaryPhaseParams {
    /// Tier-5 students a class may hold before it counts as in excess
    #[arg(long, default_value_t = DEFAULT_CAP)]
    pub cap_secondary: usize,
    #[arg(long, default_value_t = DEFAULT_SPREAD_GOAL)]
    pub spread_goal_secondary: usize,
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iter_secondary: usize,
    /// Derive the tier-5 cap from the data instead of --cap-secondary
    #[arg(long, default_value_t = false)]
    pub dynamic_secondary_cap: bool,
}

impl Default for SecondaryPhaseParams {
    fn default() -> Self {
        Self {
            cap_secondary: DEFAULT_CAP,
            spread_goal_secondary: DEFAULT_SPREAD_GOAL,
            max_iter_secondary: DEFAULT_MAX_ITERATIONS,
            dynamic_secondary_cap: false,
        }
    }
}

impl SecondaryPhaseParams {
    pub fn settings(&self) -> PhaseSettings {
        PhaseSettings {
            cap: self.cap_secondary,
            spread_goal: self.spread_goal_secondary,
            max_iterations: self.max_iter_secondary,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ClassForgeError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ClassForgeError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Overwrites file values with flags the user typed explicitly.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field;
                }
            };
        }

        update_if_present!(primary.cap_primary);
        update_if_present!(primary.spread_goal_primary);
        update_if_present!(primary.max_iter_primary);

        update_if_present!(secondary.cap_secondary);
        update_if_present!(secondary.spread_goal_secondary);
        update_if_present!(secondary.max_iter_secondary);
        update_if_present!(secondary.dynamic_secondary_cap);
    }
}
