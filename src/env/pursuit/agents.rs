//! Agent identity and registry
//!
//! Agents live in a dense arena indexed by [`AgentHandle`]; string ids map to
//! handles through a side table built once at construction, keeping the hot
//! per-tick path free of string lookups. Agents are never destroyed: capture
//! marks them dead, `reset` revives them.

use std::collections::HashMap;

use super::behavior::Behavior;
use super::types::{Faction, Position};
use crate::error::PursuitError;

/// Dense index of an agent in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentHandle(pub usize);

/// A single agent.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Stable string id, e.g. `hunter_0`.
    pub id: String,
    /// Faction this agent belongs to.
    pub faction: Faction,
    /// How this agent picks its action each tick.
    pub behavior: Behavior,
    /// Unique rank used for symmetry-breaking in conflict resolution.
    pub rank: usize,
    /// Current grid position.
    pub pos: Position,
    /// Whether the agent is still in play.
    pub alive: bool,
}

/// Arena of all agents, hunters first then preys, in insertion order.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
    by_id: HashMap<String, AgentHandle>,
    hunters: Vec<AgentHandle>,
    preys: Vec<AgentHandle>,
}

impl AgentRegistry {
    /// Build a registry with `n_hunters` hunters followed by `n_preys` preys.
    ///
    /// Hunters are `Controlled`; preys take the supplied behavior. Ranks are
    /// assigned in insertion order and are unique.
    pub fn new(n_hunters: usize, n_preys: usize, prey_behavior: Behavior) -> Self {
        let mut registry = Self {
            agents: Vec::with_capacity(n_hunters + n_preys),
            by_id: HashMap::new(),
            hunters: Vec::with_capacity(n_hunters),
            preys: Vec::with_capacity(n_preys),
        };

        for i in 0..n_hunters {
            registry.push(format!("hunter_{i}"), Faction::Hunter, Behavior::Controlled);
        }
        for i in 0..n_preys {
            registry.push(format!("prey_{i}"), Faction::Prey, prey_behavior);
        }

        registry
    }

    fn push(&mut self, id: String, faction: Faction, behavior: Behavior) {
        let handle = AgentHandle(self.agents.len());
        self.by_id.insert(id.clone(), handle);
        match faction {
            Faction::Hunter => self.hunters.push(handle),
            Faction::Prey => self.preys.push(handle),
        }
        self.agents.push(Agent {
            id,
            faction,
            behavior,
            rank: handle.0,
            pos: Position::new(0, 0),
            alive: false,
        });
    }

    /// Look up an agent by handle.
    pub fn get(&self, handle: AgentHandle) -> &Agent {
        &self.agents[handle.0]
    }

    /// Look up an agent mutably by handle.
    pub fn get_mut(&mut self, handle: AgentHandle) -> &mut Agent {
        &mut self.agents[handle.0]
    }

    /// Resolve a string id to its dense handle.
    pub fn handle_of(&self, id: &str) -> Option<AgentHandle> {
        self.by_id.get(id).copied()
    }

    /// Hunter handles in insertion order, stable across the episode.
    pub fn hunters(&self) -> &[AgentHandle] {
        &self.hunters
    }

    /// Prey handles in insertion order, stable across the episode.
    pub fn preys(&self) -> &[AgentHandle] {
        &self.preys
    }

    /// All handles, hunters first then preys.
    pub fn all(&self) -> impl Iterator<Item = AgentHandle> + '_ {
        self.hunters.iter().chain(self.preys.iter()).copied()
    }

    /// Handles of all live agents, hunters first then preys.
    pub fn live(&self) -> Vec<AgentHandle> {
        self.all().filter(|&h| self.get(h).alive).collect()
    }

    /// Handles of live preys in registry order.
    pub fn live_preys(&self) -> Vec<AgentHandle> {
        self.preys.iter().copied().filter(|&h| self.get(h).alive).collect()
    }

    /// Number of live preys.
    pub fn preys_left(&self) -> usize {
        self.preys.iter().filter(|&&h| self.get(h).alive).count()
    }

    /// Place an agent at `pos` and mark it alive.
    ///
    /// Fails with `DuplicatePosition` if another live agent already holds the
    /// cell. The registry does not search for a free cell; random placement
    /// is the engine's job.
    pub fn spawn(&mut self, handle: AgentHandle, pos: Position) -> Result<(), PursuitError> {
        let occupied = self
            .agents
            .iter()
            .enumerate()
            .any(|(i, a)| i != handle.0 && a.alive && a.pos == pos);
        if occupied {
            return Err(PursuitError::DuplicatePosition(pos));
        }
        let agent = self.get_mut(handle);
        agent.pos = pos;
        agent.alive = true;
        Ok(())
    }

    /// Mark every agent dead, clearing the board ahead of a respawn pass.
    pub fn clear(&mut self) {
        for agent in &mut self.agents {
            agent.alive = false;
        }
    }
}
