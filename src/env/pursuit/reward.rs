//! Per-tick reward computation
//!
//! Three mutually exclusive outcome branches, checked in precedence order:
//! timeout with survivors, everything captured, normal tick. The reward
//! vector is an external contract consumed by training code: all hunters
//! first (registry order), then the preys that were alive when the tick
//! started (registry order).

use super::agents::{AgentHandle, AgentRegistry};
use super::capture::{surrounding_hunters, Capture};
use super::config::RewardSchedule;
use super::types::Position;

/// Everything the calculator needs to know about the tick that just ran.
#[derive(Debug, Clone, Copy)]
pub struct TickOutcome<'a> {
    /// Preys captured this tick.
    pub captures: &'a [Capture],
    /// Preys that were alive when the tick started, registry order.
    pub tick_start_preys: &'a [AgentHandle],
    /// Whether the episode limit was reached this tick.
    pub timed_out: bool,
    /// In the targeted variant, the only prey whose capture earns `catch`.
    pub catch_target: Option<AgentHandle>,
}

/// Compute the reward vector for a completed tick.
///
/// Length is always `n_hunters + tick_start_preys.len()`.
pub fn compute_rewards(
    registry: &AgentRegistry,
    schedule: &RewardSchedule,
    n_catch: usize,
    outcome: &TickOutcome<'_>,
) -> Vec<f32> {
    let n_hunters = registry.hunters().len();
    let preys_left = registry.preys_left();

    // Branch 1: timeout with survivors. Terminal.
    if outcome.timed_out && preys_left > 0 {
        let mut rewards = vec![schedule.move_reward; n_hunters];
        for &prey in outcome.tick_start_preys {
            rewards.push(if registry.get(prey).alive { schedule.evade } else { schedule.caught });
        }
        return rewards;
    }

    // Branch 2: every prey captured. Terminal.
    if preys_left == 0 {
        let mut rewards = vec![schedule.catch_all; n_hunters];
        rewards.extend(std::iter::repeat(-schedule.catch_all).take(outcome.tick_start_preys.len()));
        return rewards;
    }

    // Branch 3: normal tick. Hunters default to the move reward, then dense
    // shaping and capture rewards overwrite it (last write wins per hunter,
    // never summed).
    let mut hunter_rewards = vec![schedule.move_reward; n_hunters];

    for &prey in outcome.tick_start_preys {
        let agent = registry.get(prey);
        if !agent.alive {
            continue;
        }
        let adjacent = surrounding_hunters(registry, agent.pos);
        if adjacent > 0 && adjacent < n_catch {
            let shaping = schedule.touch * adjacent as f32;
            for idx in hunters_near(registry, agent.pos) {
                hunter_rewards[idx] = shaping;
            }
        }
    }

    for capture in outcome.captures {
        if let Some(target) = outcome.catch_target {
            if capture.prey != target {
                continue;
            }
        }
        for idx in hunters_near(registry, capture.cell) {
            hunter_rewards[idx] = schedule.catch;
        }
    }

    let mut rewards = hunter_rewards;
    for &prey in outcome.tick_start_preys {
        rewards.push(if registry.get(prey).alive {
            -schedule.move_reward
        } else {
            schedule.caught
        });
    }
    rewards
}

/// Indices (hunter order) of live hunters on or orthogonally adjacent to `pos`.
fn hunters_near(registry: &AgentRegistry, pos: Position) -> Vec<usize> {
    registry
        .hunters()
        .iter()
        .enumerate()
        .filter(|(_, &h)| {
            let hunter = registry.get(h);
            hunter.alive && hunter.pos.manhattan_distance(&pos) <= 1
        })
        .map(|(idx, _)| idx)
        .collect()
}
