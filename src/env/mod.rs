//! Environment traits and implementations
//!
//! Defines the multi-agent environment interface shared by the pursuit
//! variants, plus the parallel environment pool.

use anyhow::Result;

/// Core trait for synchronous multi-agent environments.
///
/// One `step` call runs the entire resolve, capture, reward pipeline before
/// returning; nothing suspends and there is no internal parallelism.
pub trait MultiAgentEnvironment {
    /// Reset the environment, optionally reseeding, and return the initial
    /// per-hunter observations and episode info.
    fn reset(&mut self, seed: Option<u64>) -> Result<(Vec<Vec<f32>>, StepInfo)>;

    /// Step the environment with one raw action per live agent, hunters
    /// first then preys.
    fn step(&mut self, actions: &[i64]) -> Result<StepOutcome>;

    /// Reseed the environment RNG in place without reconstructing it.
    fn seed(&mut self, value: u64);

    /// Total number of agents, both factions.
    fn num_agents(&self) -> usize;

    /// Per-hunter observation space.
    fn observation_space(&self) -> SpaceInfo;

    /// Per-agent action space.
    fn action_space(&self) -> SpaceInfo;

    /// Human-readable dump of the current grid.
    fn render(&self) -> String;

    /// Release resources. The pursuit environments hold none.
    fn close(&mut self) {}
}

/// Result of a multi-agent environment step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Per-hunter observations after the step.
    pub observations: Vec<Vec<f32>>,

    /// Per-agent rewards: hunters first, then the preys that were alive when
    /// the tick started.
    pub rewards: Vec<f32>,

    /// Whether the episode ended by capture (or target exhaustion).
    pub terminated: bool,

    /// Whether the episode ended by hitting the tick limit. Distinct from
    /// `terminated`; a timeout is a normal transition, not an error.
    pub timed_out: bool,

    /// Additional step information.
    pub info: StepInfo,
}

/// Additional step information.
#[derive(Debug, Clone, Default)]
pub struct StepInfo {
    /// Number of preys still alive.
    pub preys_left: usize,

    /// Current tick counter.
    pub timestep: usize,

    /// Targeted variant: whether the active target was captured this tick.
    pub caught_target: bool,

    /// Targeted variant: on a target transition, the raw observation
    /// computed before the target index advanced, so training code can
    /// attribute reward to the correct sub-episode.
    pub real_obs: Option<Vec<Vec<f32>>>,
}

/// Space information for observations and actions.
#[derive(Debug, Clone)]
pub struct SpaceInfo {
    /// Shape of the space.
    pub shape: Vec<usize>,

    /// Data type.
    pub dtype: SpaceType,
}

/// Space data types.
#[derive(Debug, Clone, Copy)]
pub enum SpaceType {
    /// Discrete space with n options.
    Discrete(usize),

    /// Continuous space (Box).
    Continuous,
}

pub mod pool;
pub mod pursuit;
