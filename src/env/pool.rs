//! Parallel pool of independent environment instances
//!
//! Fans batched evaluation out across Rayon's thread pool. Every pooled
//! environment is fully independent: no shared mutable state, no locks.
//! Cancellation is coarse; a caller stops an episode by not stepping it
//! again.
//!
//! # Example
//!
//! ```rust,no_run
//! use pursuit_rl::env::pool::EnvPool;
//! use pursuit_rl::env::pursuit::{PursuitConfig, PursuitEnv};
//!
//! let mut pool = EnvPool::new(|| PursuitEnv::new(PursuitConfig::default()).unwrap(), 4);
//! let stats = pool.run_episodes(Some(17), |_obs, n_hunters| vec![4; n_hunters]);
//! assert_eq!(stats.unwrap().len(), 4);
//! ```

use anyhow::Result;
use rayon::prelude::*;
use tracing::debug;

use crate::env::{MultiAgentEnvironment, StepInfo, StepOutcome};

/// Index of the Stay action, used to pad scripted preys' action slots.
const STAY: i64 = 4;

/// A pool of environments for parallel batched evaluation.
pub struct EnvPool<E: MultiAgentEnvironment> {
    envs: Vec<E>,
    num_envs: usize,
}

/// Summary of one completed episode.
#[derive(Debug, Clone)]
pub struct EpisodeStats {
    /// Ticks the episode ran for.
    pub ticks: usize,
    /// Whether the episode ended by capture or target exhaustion.
    pub terminated: bool,
    /// Whether the episode hit its tick limit.
    pub timed_out: bool,
    /// Preys still alive at the end.
    pub preys_left: usize,
    /// Sum of per-tick hunter rewards, summed over hunters.
    pub hunter_return: f32,
}

impl<E: MultiAgentEnvironment + Send> EnvPool<E> {
    /// Create a pool from a factory function.
    pub fn new<F>(env_fn: F, num_envs: usize) -> Self
    where
        F: Fn() -> E,
    {
        let envs = (0..num_envs).map(|_| env_fn()).collect();
        Self { envs, num_envs }
    }

    /// Number of environments in the pool.
    pub fn num_envs(&self) -> usize {
        self.num_envs
    }

    /// Reset all environments in parallel.
    ///
    /// With a base seed, environment `i` is seeded `base + i` so pooled
    /// episodes are reproducible but not identical.
    pub fn reset_all(&mut self, base_seed: Option<u64>) -> Result<Vec<(Vec<Vec<f32>>, StepInfo)>> {
        self.envs
            .par_iter_mut()
            .enumerate()
            .map(|(i, env)| env.reset(base_seed.map(|s| s + i as u64)))
            .collect()
    }

    /// Step all environments in parallel with per-environment action slices.
    pub fn step_all(&mut self, actions: &[Vec<i64>]) -> Result<Vec<StepOutcome>> {
        assert_eq!(
            actions.len(),
            self.num_envs,
            "one action vector per environment is required"
        );
        self.envs
            .par_iter_mut()
            .zip(actions.par_iter())
            .map(|(env, a)| env.step(a))
            .collect()
    }

    /// Run one full episode in every environment in parallel.
    ///
    /// `policy` maps the per-hunter observations to one action per hunter;
    /// scripted preys are padded with Stay, which their behavior overrides.
    pub fn run_episodes<P>(&mut self, base_seed: Option<u64>, policy: P) -> Result<Vec<EpisodeStats>>
    where
        P: Fn(&[Vec<f32>], usize) -> Vec<i64> + Sync,
    {
        self.envs
            .par_iter_mut()
            .enumerate()
            .map(|(i, env)| {
                let (mut obs, mut info) = env.reset(base_seed.map(|s| s + i as u64))?;
                let n_hunters = obs.len();
                let mut hunter_return = 0.0;

                loop {
                    let mut actions = policy(&obs, n_hunters);
                    actions.extend(std::iter::repeat(STAY).take(info.preys_left));

                    let outcome = env.step(&actions)?;
                    hunter_return += outcome.rewards[..n_hunters].iter().sum::<f32>();
                    obs = outcome.observations;
                    info = outcome.info;

                    if outcome.terminated || outcome.timed_out {
                        debug!(env = i, ticks = info.timestep, "pooled episode finished");
                        return Ok(EpisodeStats {
                            ticks: info.timestep,
                            terminated: outcome.terminated,
                            timed_out: outcome.timed_out,
                            preys_left: info.preys_left,
                            hunter_return,
                        });
                    }
                }
            })
            .collect()
    }
}
