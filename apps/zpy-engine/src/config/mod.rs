pub mod rules;

use serde::{Deserialize, Serialize};

use crate::domain::rules::RuleConfig;
use crate::errors::config::ConfigError;

/// Everything needed to create a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub rules: RuleConfig,
    /// Fixed game seed; drawn from the OS when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(rules: RuleConfig) -> Self {
        Self { rules, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rule variants and seed from `ZPY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            rules: rules::rules_from_env()?,
            seed: rules::seed_from_env()?,
        })
    }
}
