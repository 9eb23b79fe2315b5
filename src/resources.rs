use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::ai::search::StepCosts;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Simulation settings, read from JSON. Missing keys keep their defaults.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    pub step_costs: StepCosts,
    /// Turns the headless runner advances before exiting.
    pub turns: u32,
    pub level_file: String,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            step_costs: StepCosts::default(),
            turns: 20,
            level_file: "assets/maps/level_01.txt".to_string(),
        }
    }
}

impl PursuitConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}

// ---------------------------------------------------------------------------
// Turn stats
// ---------------------------------------------------------------------------

/// Counters for the most recent turn.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct TurnStats {
    pub turn: u64,
    pub planned: u64,
    pub moved: u64,
    pub rejected: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
