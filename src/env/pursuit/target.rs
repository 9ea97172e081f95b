//! Targeted pursuit variant
//!
//! Hunters are rewarded for capturing one designated prey at a time. The
//! scheduler walks a fixed target sequence (prey registry order): capturing
//! the current target advances the index, exhausting the sequence ends the
//! episode successfully, and a non-target death never ends it by itself.

use tracing::debug;

use super::agents::{AgentHandle, AgentRegistry};
use super::config::PursuitConfig;
use super::environment::PursuitEnv;
use super::types::Position;
use crate::env::{MultiAgentEnvironment, SpaceInfo, StepInfo, StepOutcome};
use crate::error::PursuitError;

/// Walks the fixed sequence of target preys.
#[derive(Debug, Clone)]
pub struct TargetScheduler {
    targets: Vec<AgentHandle>,
    index: usize,
}

impl TargetScheduler {
    /// Create a scheduler over `targets`, pursued in order.
    pub fn new(targets: Vec<AgentHandle>) -> Self {
        Self { targets, index: 0 }
    }

    /// Rewind to the first target.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// The prey currently being pursued, `None` once the sequence is done.
    pub fn current(&self) -> Option<AgentHandle> {
        self.targets.get(self.index).copied()
    }

    /// Index of the current target in the sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the sequence is exhausted.
    pub fn is_finished(&self) -> bool {
        self.index >= self.targets.len()
    }

    /// Move past the captured target, skipping preys that already died as
    /// non-targets earlier in the episode.
    pub fn advance(&mut self, registry: &AgentRegistry) {
        self.index += 1;
        while let Some(&next) = self.targets.get(self.index) {
            if registry.get(next).alive {
                break;
            }
            self.index += 1;
        }
    }
}

/// Pursuit environment where captures only pay out for the active target.
#[derive(Debug, Clone)]
pub struct TargetPursuitEnv {
    env: PursuitEnv,
    scheduler: TargetScheduler,
}

impl TargetPursuitEnv {
    /// Create the targeted variant. The target sequence is the prey registry
    /// order.
    pub fn new(config: PursuitConfig) -> Result<Self, PursuitError> {
        let env = PursuitEnv::with_target_channel(config, true)?;
        let targets = env.registry().preys().to_vec();
        Ok(Self { env, scheduler: TargetScheduler::new(targets) })
    }

    /// Id of the prey currently being pursued.
    pub fn current_target_id(&self) -> Option<&str> {
        self.scheduler.current().map(|h| self.env.registry().get(h).id.as_str())
    }

    /// The underlying engine, for inspection.
    pub fn inner(&self) -> &PursuitEnv {
        &self.env
    }

    fn target_pos(&self) -> Option<Position> {
        self.scheduler.current().map(|h| self.env.registry().get(h).pos)
    }
}

impl MultiAgentEnvironment for TargetPursuitEnv {
    fn reset(&mut self, seed: Option<u64>) -> anyhow::Result<(Vec<Vec<f32>>, StepInfo)> {
        self.scheduler.reset();
        let (_, info) = self.env.reset_env(seed)?;
        // Re-encode with the first target active in its channel.
        Ok((self.env.observe(self.target_pos()), info))
    }

    fn step(&mut self, actions: &[i64]) -> anyhow::Result<StepOutcome> {
        if self.env.is_done() {
            return Ok(self.env.finished_outcome(self.target_pos()));
        }

        let target = self.scheduler.current();
        let report = self.env.advance(actions, target)?;
        let caught_target =
            target.is_some_and(|t| report.captures.iter().any(|c| c.prey == t));

        // On a transition, capture the raw observation before the index
        // advances so callers can close out the finished sub-episode.
        let mut real_obs = None;
        if caught_target {
            real_obs = Some(self.env.observe(self.target_pos()));
            self.scheduler.advance(self.env.registry());
            debug!(
                next_target = self.current_target_id().unwrap_or("none"),
                index = self.scheduler.index(),
                "target captured"
            );
        }

        let terminated = self.scheduler.is_finished() || report.preys_left == 0;
        let timed_out = report.hit_limit && !terminated;
        self.env.set_terminal(terminated, timed_out);

        Ok(StepOutcome {
            observations: self.env.observe(self.target_pos()),
            rewards: report.rewards,
            terminated,
            timed_out,
            info: StepInfo {
                preys_left: report.preys_left,
                timestep: self.env.timestep(),
                caught_target,
                real_obs,
            },
        })
    }

    fn seed(&mut self, value: u64) {
        self.env.reseed(value);
    }

    fn num_agents(&self) -> usize {
        self.env.config().n_agents()
    }

    fn observation_space(&self) -> SpaceInfo {
        self.env.observation_space()
    }

    fn action_space(&self) -> SpaceInfo {
        self.env.action_space()
    }

    fn render(&self) -> String {
        self.env.render()
    }
}
