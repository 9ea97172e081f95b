//! Pursuit environment engine
//!
//! Orchestrates the per-tick pipeline: propose moves, arbitrate conflicts,
//! commit positions, evaluate captures, compute rewards, encode
//! observations. All stochastic behavior (spawn placement, scripted
//! policies, tie-breaks) routes through one engine-owned RNG that can be
//! reseeded in place.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::agents::{Agent, AgentHandle, AgentRegistry};
use super::behavior::{Behavior, WorldView};
use super::capture::{evaluate_captures, Capture};
use super::config::PursuitConfig;
use super::grid::GridState;
use super::movement::resolve_moves;
use super::observation::ObservationEncoder;
use super::reward::{compute_rewards, TickOutcome};
use super::types::{parse_action, Position, ACTION_SPACE};
use crate::env::{MultiAgentEnvironment, SpaceInfo, SpaceType, StepInfo, StepOutcome};
use crate::error::PursuitError;

/// Internal result of advancing the simulation by one tick.
#[derive(Debug)]
pub(crate) struct TickReport {
    /// Per-agent rewards, hunters then tick-start preys.
    pub rewards: Vec<f32>,
    /// Preys captured this tick.
    pub captures: Vec<Capture>,
    /// Whether the tick limit was reached this tick.
    pub hit_limit: bool,
    /// Preys alive after capture evaluation.
    pub preys_left: usize,
}

/// The pursuit environment.
#[derive(Debug, Clone)]
pub struct PursuitEnv {
    config: PursuitConfig,
    registry: AgentRegistry,
    grid: GridState,
    encoder: ObservationEncoder,
    rng: StdRng,
    steps: usize,
    episode: usize,
    terminated: bool,
    timed_out: bool,
}

impl PursuitEnv {
    /// Create a new environment. Fails fast on an invalid configuration.
    pub fn new(config: PursuitConfig) -> Result<Self, PursuitError> {
        Self::with_target_channel(config, false)
    }

    /// Shared constructor; the targeted variant adds the target observation
    /// channel.
    pub(crate) fn with_target_channel(
        config: PursuitConfig,
        targeted: bool,
    ) -> Result<Self, PursuitError> {
        config.validate()?;
        let registry = AgentRegistry::new(config.n_hunters, config.n_preys, config.prey_behavior);
        let grid = GridState::new(config.rows, config.cols);
        let encoder = ObservationEncoder::new(config.obs_mode, config.sight, targeted);
        Ok(Self {
            config,
            registry,
            grid,
            encoder,
            rng: StdRng::from_entropy(),
            steps: 0,
            episode: 0,
            terminated: false,
            timed_out: false,
        })
    }

    /// Configuration this environment was built from.
    pub fn config(&self) -> &PursuitConfig {
        &self.config
    }

    /// Look up an agent by id, e.g. `hunter_0` or `prey_1`.
    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.registry.handle_of(id).map(|h| self.registry.get(h))
    }

    /// Current tick counter.
    pub fn timestep(&self) -> usize {
        self.steps
    }

    /// Number of preys still alive.
    pub fn preys_left(&self) -> usize {
        self.registry.preys_left()
    }

    /// Whether the episode has ended, by capture or timeout.
    pub fn is_done(&self) -> bool {
        self.terminated || self.timed_out
    }

    pub(crate) fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Reseed the engine RNG in place. Training code alternates `seed` and
    /// `reset` across episodes; the environment is not reconstructed.
    pub fn reseed(&mut self, value: u64) {
        self.rng = StdRng::seed_from_u64(value);
    }

    /// Start a new episode: respawn all agents, clear terminal state,
    /// rebuild the grid.
    pub fn reset_env(&mut self, seed: Option<u64>) -> Result<(Vec<Vec<f32>>, StepInfo), PursuitError> {
        if let Some(value) = seed {
            self.reseed(value);
        }
        self.registry.clear();
        self.respawn_all()?;
        self.grid.rebuild(&self.registry);
        self.steps = 0;
        self.episode += 1;
        self.terminated = false;
        self.timed_out = false;
        debug!(episode = self.episode, "environment reset");

        let info = StepInfo {
            preys_left: self.registry.preys_left(),
            timestep: 0,
            ..Default::default()
        };
        Ok((self.observe(None), info))
    }

    /// Place every agent: explicit preset cells if configured, otherwise a
    /// uniform-random free-cell search through the engine RNG.
    fn respawn_all(&mut self) -> Result<(), PursuitError> {
        let handles: Vec<AgentHandle> = self.registry.all().collect();

        if let Some(positions) = self.config.preset_positions.clone() {
            for (handle, pos) in handles.into_iter().zip(positions) {
                if !self.grid.in_bounds(pos) {
                    return Err(PursuitError::Configuration(format!(
                        "preset position ({},{}) is outside the {}x{} grid",
                        pos.row, pos.col, self.config.rows, self.config.cols
                    )));
                }
                self.registry.spawn(handle, pos)?;
            }
            return Ok(());
        }

        // Guaranteed to succeed eventually since n_agents < rows * cols; the
        // attempt ceiling guards against looping forever on a broken state.
        let max_attempts = 16 * (self.config.rows * self.config.cols) as usize;
        for handle in handles {
            let mut placed = false;
            for _ in 0..max_attempts {
                let pos = Position::new(
                    self.rng.gen_range(0..self.config.rows),
                    self.rng.gen_range(0..self.config.cols),
                );
                if self.registry.spawn(handle, pos).is_ok() {
                    placed = true;
                    break;
                }
            }
            if !placed {
                return Err(PursuitError::Configuration(format!(
                    "no free cell found for {} within {} attempts",
                    self.registry.get(handle).id,
                    max_attempts
                )));
            }
        }
        Ok(())
    }

    /// Encode per-hunter observations of the current state.
    pub(crate) fn observe(&self, target: Option<Position>) -> Vec<Vec<f32>> {
        self.encoder.encode(&self.registry, &self.grid, target)
    }

    /// Run one tick of the pipeline. `catch_target` restricts the capture
    /// reward to a single prey (targeted variant); `target_pos` is what
    /// target-seeking scripted agents steer toward.
    pub(crate) fn advance(
        &mut self,
        actions: &[i64],
        catch_target: Option<AgentHandle>,
    ) -> Result<TickReport, PursuitError> {
        let live = self.registry.live();
        if actions.len() != live.len() {
            return Err(PursuitError::Configuration(format!(
                "expected one action per live agent ({}), got {}",
                live.len(),
                actions.len()
            )));
        }

        let target_pos = catch_target.map(|h| self.registry.get(h).pos);

        // Validate every supplied action before any of them take effect;
        // scripted agents then override theirs through behavior dispatch.
        let mut moves = Vec::with_capacity(live.len());
        for (&handle, &raw) in live.iter().zip(actions) {
            let agent = self.registry.get(handle);
            let action = parse_action(&agent.id, raw)?;
            let action = match agent.behavior {
                Behavior::Controlled => action,
                scripted => {
                    let view = WorldView {
                        registry: &self.registry,
                        rows: self.config.rows,
                        cols: self.config.cols,
                        target: target_pos,
                    };
                    scripted.decide_action(handle, &view, &mut self.rng)
                }
            };
            moves.push((handle, action));
        }

        let tick_start_preys = self.registry.live_preys();

        let resolved = resolve_moves(&self.registry, self.config.rows, self.config.cols, &moves);
        for (handle, pos) in resolved {
            self.registry.get_mut(handle).pos = pos;
        }
        self.steps += 1;
        self.grid.rebuild(&self.registry);

        let captures = evaluate_captures(&mut self.registry, self.config.n_catch);
        if !captures.is_empty() {
            self.grid.rebuild(&self.registry);
        }

        let hit_limit = self.steps >= self.config.max_steps;
        let preys_left = self.registry.preys_left();
        let rewards = compute_rewards(
            &self.registry,
            &self.config.rewards,
            self.config.n_catch,
            &TickOutcome {
                captures: &captures,
                tick_start_preys: &tick_start_preys,
                timed_out: hit_limit,
                catch_target,
            },
        );

        Ok(TickReport { rewards, captures, hit_limit, preys_left })
    }

    /// Degenerate outcome returned when `step` is called after the episode
    /// has already ended.
    pub(crate) fn finished_outcome(&self, target: Option<Position>) -> StepOutcome {
        let n = self.config.n_hunters + self.registry.preys_left();
        StepOutcome {
            observations: self.observe(target),
            rewards: vec![0.0; n],
            terminated: self.terminated,
            timed_out: self.timed_out,
            info: StepInfo {
                preys_left: self.registry.preys_left(),
                timestep: self.steps,
                ..Default::default()
            },
        }
    }

    pub(crate) fn set_terminal(&mut self, terminated: bool, timed_out: bool) {
        self.terminated = terminated;
        self.timed_out = timed_out;
    }
}

impl MultiAgentEnvironment for PursuitEnv {
    fn reset(&mut self, seed: Option<u64>) -> anyhow::Result<(Vec<Vec<f32>>, StepInfo)> {
        Ok(self.reset_env(seed)?)
    }

    fn step(&mut self, actions: &[i64]) -> anyhow::Result<StepOutcome> {
        if self.is_done() {
            return Ok(self.finished_outcome(None));
        }

        let report = self.advance(actions, None)?;
        let terminated = report.preys_left == 0;
        let timed_out = report.hit_limit && !terminated;
        self.set_terminal(terminated, timed_out);
        if terminated || timed_out {
            debug!(
                timestep = self.steps,
                terminated, timed_out, "episode finished"
            );
        }

        Ok(StepOutcome {
            observations: self.observe(None),
            rewards: report.rewards,
            terminated,
            timed_out,
            info: StepInfo {
                preys_left: report.preys_left,
                timestep: self.steps,
                ..Default::default()
            },
        })
    }

    fn seed(&mut self, value: u64) {
        self.reseed(value);
    }

    fn num_agents(&self) -> usize {
        self.config.n_agents()
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: self.encoder.shape(self.config.n_agents()),
            dtype: SpaceType::Continuous,
        }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![], dtype: SpaceType::Discrete(ACTION_SPACE) }
    }

    fn render(&self) -> String {
        self.grid.dump()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::pursuit::config::ObsMode;

    fn config(hunters: &[(i32, i32)], preys: &[(i32, i32)], n_catch: usize) -> PursuitConfig {
        let preset = hunters
            .iter()
            .chain(preys)
            .map(|&(r, c)| Position::new(r, c))
            .collect();
        PursuitConfig {
            rows: 6,
            cols: 6,
            n_hunters: hunters.len(),
            n_preys: preys.len(),
            n_catch,
            max_steps: 50,
            obs_mode: ObsMode::Flat,
            prey_behavior: Behavior::Static,
            preset_positions: Some(preset),
            ..Default::default()
        }
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        let bad = PursuitConfig { n_hunters: 1, n_catch: 2, ..Default::default() };
        assert!(PursuitEnv::new(bad).is_err());
    }

    #[test]
    fn test_reset_places_all_agents() {
        let mut env = PursuitEnv::new(PursuitConfig::default()).unwrap();
        let (obs, info) = env.reset_env(Some(11)).unwrap();
        assert_eq!(obs.len(), 4);
        assert_eq!(info.preys_left, 2);
        assert_eq!(info.timestep, 0);
    }

    #[test]
    fn test_seeded_reset_is_deterministic() {
        let mut env = PursuitEnv::new(PursuitConfig::default()).unwrap();
        env.reset_env(Some(42)).unwrap();
        let first: Vec<Position> =
            env.registry().all().map(|h| env.registry().get(h).pos).collect();

        env.reset_env(Some(42)).unwrap();
        let second: Vec<Position> =
            env.registry().all().map(|h| env.registry().get(h).pos).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_action_is_fatal() {
        let mut env = PursuitEnv::new(config(&[(0, 0)], &[(4, 4)], 1)).unwrap();
        env.reset_env(Some(1)).unwrap();
        let err = env.advance(&[9, 4], None).unwrap_err();
        assert!(matches!(err, PursuitError::InvalidAction { action: 9, .. }));
    }

    #[test]
    fn test_action_count_mismatch_is_rejected() {
        let mut env = PursuitEnv::new(config(&[(0, 0)], &[(4, 4)], 1)).unwrap();
        env.reset_env(Some(1)).unwrap();
        assert!(env.advance(&[4], None).is_err());
    }

    #[test]
    fn test_capture_on_hunters_own_move() {
        // Hunter left of the prey steps onto its cell; threshold 1.
        let mut env = PursuitEnv::new(config(&[(2, 2)], &[(2, 3)], 1)).unwrap();
        env.reset_env(Some(1)).unwrap();

        let outcome = MultiAgentEnvironment::step(&mut env, &[3, 4]).unwrap();
        assert!(outcome.terminated);
        assert_eq!(outcome.info.preys_left, 0);
        assert_eq!(env.agent("hunter_0").unwrap().pos, Position::new(2, 3));
        assert!(!env.agent("prey_0").unwrap().alive);
    }

    #[test]
    fn test_step_after_done_is_degenerate() {
        let mut env = PursuitEnv::new(config(&[(2, 2)], &[(2, 3)], 1)).unwrap();
        env.reset_env(Some(1)).unwrap();
        MultiAgentEnvironment::step(&mut env, &[3, 4]).unwrap();

        let outcome = MultiAgentEnvironment::step(&mut env, &[]).unwrap();
        assert!(outcome.terminated);
        assert!(outcome.rewards.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_timeout_reports_timed_out_not_terminated() {
        let mut cfg = config(&[(0, 0)], &[(5, 5)], 1);
        cfg.max_steps = 2;
        let mut env = PursuitEnv::new(cfg).unwrap();
        env.reset_env(Some(1)).unwrap();

        let first = MultiAgentEnvironment::step(&mut env, &[4, 4]).unwrap();
        assert!(!first.timed_out);
        let second = MultiAgentEnvironment::step(&mut env, &[4, 4]).unwrap();
        assert!(second.timed_out);
        assert!(!second.terminated);
    }

    #[test]
    fn test_render_shows_grid() {
        let mut env = PursuitEnv::new(config(&[(0, 0)], &[(1, 1)], 1)).unwrap();
        env.reset_env(Some(1)).unwrap();
        let dump = env.render();
        assert!(dump.starts_with("H"));
        assert!(dump.contains('P'));
    }
}
