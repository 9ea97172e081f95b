//! Environment configuration and reward schedule
//!
//! Configuration is validated once at construction; a bad configuration is
//! fatal (`Configuration` error) and never recovered. The reward schedule is
//! a fixed tuple of named scalars, immutable for the lifetime of an episode.

use serde::{Deserialize, Serialize};

use super::behavior::Behavior;
use super::types::Position;
use crate::error::PursuitError;

/// Named reward scalars consumed by the reward calculator.
///
/// Sign conventions follow the usual pursuit setup: `move` is a small
/// per-tick cost for hunters (and its negation a survival bonus for preys),
/// `touch` is the dense shaping reward per adjacent hunter, conventionally
/// `catch / n_catch`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Per-tick reward for a hunter that did nothing notable.
    #[serde(rename = "move")]
    pub move_reward: f32,
    /// Shaping reward per hunter adjacent to a still-alive prey.
    pub touch: f32,
    /// Reward for a hunter adjacent to a prey captured this tick.
    pub catch: f32,
    /// Terminal reward when every prey has been captured.
    pub catch_all: f32,
    /// Terminal reward for a prey that survived to the episode limit.
    pub evade: f32,
    /// Penalty for a prey captured on a non-terminal tick.
    pub caught: f32,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            move_reward: -0.05,
            touch: 0.5,
            catch: 1.0,
            catch_all: 5.0,
            evade: 1.0,
            caught: -1.0,
        }
    }
}

/// Observation encoding selected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObsMode {
    /// Flat `[row, col, type]` triples per agent, observing hunter first.
    Flat,
    /// Binary channel tensor centered on each hunter, window radius `sight`.
    Grid,
    /// Flat `[row, col, one-hot type]` encoding per agent.
    OneHot,
}

/// Full environment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PursuitConfig {
    /// Grid height in cells.
    pub rows: i32,
    /// Grid width in cells.
    pub cols: i32,
    /// Number of hunter agents.
    pub n_hunters: usize,
    /// Number of prey agents.
    pub n_preys: usize,
    /// Minimum adjacent hunters required to capture a prey.
    pub n_catch: usize,
    /// Episode length limit in ticks.
    pub max_steps: usize,
    /// Observation encoding.
    pub obs_mode: ObsMode,
    /// Observation window radius for the grid encoding.
    pub sight: usize,
    /// Reward scalars.
    pub rewards: RewardSchedule,
    /// Behavior of prey agents. `Controlled` preys take caller actions.
    pub prey_behavior: Behavior,
    /// Explicit spawn cells, hunters first then preys. `None` means uniform
    /// random placement on every reset.
    pub preset_positions: Option<Vec<Position>>,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            n_hunters: 4,
            n_preys: 2,
            n_catch: 2,
            max_steps: 200,
            obs_mode: ObsMode::Flat,
            sight: 2,
            rewards: RewardSchedule::default(),
            prey_behavior: Behavior::Random,
            preset_positions: None,
        }
    }
}

impl PursuitConfig {
    /// Total number of agents, both factions.
    pub fn n_agents(&self) -> usize {
        self.n_hunters + self.n_preys
    }

    /// Validate construction parameters.
    pub fn validate(&self) -> Result<(), PursuitError> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(PursuitError::Configuration(format!(
                "grid dimensions must be positive, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.n_hunters == 0 {
            return Err(PursuitError::Configuration("at least one hunter is required".into()));
        }
        if self.n_preys == 0 {
            return Err(PursuitError::Configuration("at least one prey is required".into()));
        }
        if self.n_catch == 0 {
            return Err(PursuitError::Configuration("n_catch must be at least 1".into()));
        }
        if self.n_catch > self.n_hunters {
            return Err(PursuitError::Configuration(format!(
                "n_catch ({}) exceeds the number of hunters ({})",
                self.n_catch, self.n_hunters
            )));
        }
        let cells = (self.rows as usize) * (self.cols as usize);
        if self.n_agents() >= cells {
            return Err(PursuitError::Configuration(format!(
                "{} agents cannot fit a {}x{} grid with a free cell to spare",
                self.n_agents(),
                self.rows,
                self.cols
            )));
        }
        if let Some(positions) = &self.preset_positions {
            if positions.len() != self.n_agents() {
                return Err(PursuitError::Configuration(format!(
                    "preset_positions has {} entries for {} agents",
                    positions.len(),
                    self.n_agents()
                )));
            }
        }
        Ok(())
    }
}
