//! Scripted agent behaviors
//!
//! A closed enum with a single dispatch function instead of trait objects:
//! every scripted policy is a match arm over the variant tag. Controlled
//! agents take caller-supplied actions and never reach the dispatch.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::agents::{AgentHandle, AgentRegistry};
use super::types::{Action, Faction, Position};

/// How an agent picks its action each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Actions come from the caller of `step`.
    Controlled,
    /// Always stays put.
    Static,
    /// Uniform random over the five actions.
    Random,
    /// Preys maximize the minimum distance to any live hunter; hunters
    /// minimize the distance to the nearest live prey.
    Greedy,
    /// Moves toward the scheduler's current target cell.
    TargetSeeking,
}

/// What a scripted policy is allowed to see when deciding.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    /// Agent table with live positions.
    pub registry: &'a AgentRegistry,
    /// Grid height.
    pub rows: i32,
    /// Grid width.
    pub cols: i32,
    /// Active target cell, if the targeted variant is running.
    pub target: Option<Position>,
}

impl Behavior {
    /// Pick an action for `me` given the visible state.
    ///
    /// All randomness (uniform choices and tie-breaks between equally good
    /// moves) routes through the engine-owned RNG.
    pub fn decide_action(self, me: AgentHandle, view: &WorldView<'_>, rng: &mut StdRng) -> Action {
        match self {
            Behavior::Controlled | Behavior::Static => Action::Stay,
            Behavior::Random => *Action::ALL.choose(rng).unwrap_or(&Action::Stay),
            Behavior::Greedy => greedy(me, view, rng),
            Behavior::TargetSeeking => match view.target {
                Some(target) => seek(me, target, view, rng),
                None => Action::Stay,
            },
        }
    }
}

/// Live positions of the faction opposing `faction`.
fn opponents(view: &WorldView<'_>, faction: Faction) -> Vec<Position> {
    let handles = match faction {
        Faction::Hunter => view.registry.preys(),
        Faction::Prey => view.registry.hunters(),
    };
    handles
        .iter()
        .filter(|&&h| view.registry.get(h).alive)
        .map(|&h| view.registry.get(h).pos)
        .collect()
}

/// Pick uniformly among the actions scoring best under `score` (higher wins).
fn best_action<F: Fn(Position) -> i32>(
    me: AgentHandle,
    view: &WorldView<'_>,
    rng: &mut StdRng,
    score: F,
) -> Action {
    let pos = view.registry.get(me).pos;
    let scored: Vec<(Action, i32)> = Action::ALL
        .iter()
        .map(|&a| (a, score(pos.stepped(a, view.rows, view.cols))))
        .collect();
    let best = scored.iter().map(|&(_, s)| s).max().unwrap_or(0);
    let candidates: Vec<Action> =
        scored.into_iter().filter(|&(_, s)| s == best).map(|(a, _)| a).collect();
    *candidates.choose(rng).unwrap_or(&Action::Stay)
}

fn greedy(me: AgentHandle, view: &WorldView<'_>, rng: &mut StdRng) -> Action {
    let faction = view.registry.get(me).faction;
    let others = opponents(view, faction);
    if others.is_empty() {
        return Action::Stay;
    }
    match faction {
        // Flee: maximize the distance to the closest hunter.
        Faction::Prey => best_action(me, view, rng, |p| {
            others.iter().map(|o| p.manhattan_distance(o)).min().unwrap_or(0)
        }),
        // Chase: minimize the distance to the closest prey.
        Faction::Hunter => best_action(me, view, rng, |p| {
            -others.iter().map(|o| p.manhattan_distance(o)).min().unwrap_or(0)
        }),
    }
}

fn seek(me: AgentHandle, target: Position, view: &WorldView<'_>, rng: &mut StdRng) -> Action {
    best_action(me, view, rng, |p| -p.manhattan_distance(&target))
}
