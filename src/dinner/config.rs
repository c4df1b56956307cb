// ABOUTME: Dinner configuration - table size, number of courses, and activity timing.
// ABOUTME: Loaded from JSON or built in code; validated before any philosopher sits down.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a dinner is run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DinnerConfig {
    /// Number of philosophers around the table.
    pub philosophers: usize,

    /// Eat-think-talk cycles each philosopher goes through.
    pub dining_steps: usize,

    /// Upper bound for a single eat, think, or talk activity, in milliseconds.
    pub time_to_waste_ms: u64,

    /// Chance, per cycle, that a philosopher asks to talk.
    pub talk_probability: f64,

    /// Seed for the philosophers' random choices. Random when absent.
    pub seed: Option<u64>,
}

impl Default for DinnerConfig {
    fn default() -> Self {
        Self {
            philosophers: 4,
            dining_steps: 10,
            time_to_waste_ms: 1000,
            talk_probability: 0.5,
            seed: None,
        }
    }
}

impl DinnerConfig {
    /// Create a configuration for `philosophers` seats with default timing.
    pub fn new(philosophers: usize) -> Self {
        Self {
            philosophers,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of cycles per philosopher.
    pub fn dining_steps(mut self, steps: usize) -> Self {
        self.dining_steps = steps;
        self
    }

    /// Set the upper bound for a single activity.
    pub fn time_to_waste(mut self, max: Duration) -> Self {
        self.time_to_waste_ms = max.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Set the per-cycle talking chance.
    pub fn talk_probability(mut self, probability: f64) -> Self {
        self.talk_probability = probability;
        self
    }

    /// Fix the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Upper bound for a single activity.
    pub fn max_activity(&self) -> Duration {
        Duration::from_millis(self.time_to_waste_ms)
    }

    /// Check that the dinner can actually be held.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.philosophers == 0 {
            return Err(ConfigError::Invalid(
                "philosophers must be a positive integer".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.talk_probability) {
            return Err(ConfigError::Invalid(format!(
                "talk_probability must be between 0 and 1, got {}",
                self.talk_probability
            )));
        }
        Ok(())
    }
}
