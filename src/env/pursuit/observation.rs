//! Observation encodings
//!
//! One encoding is selected at construction and produces one vector per
//! hunter. The grid encoding's tensor shape `(n_hunters, channels,
//! 1+2*sight, 1+2*sight)` is load-bearing: downstream network architectures
//! are shaped against it.

use super::agents::{AgentHandle, AgentRegistry};
use super::config::ObsMode;
use super::grid::GridState;
use super::types::{Cell, Faction, Position};

/// Channels of the grid encoding, in tensor order.
const CH_HUNTERS: usize = 0;
const CH_PREYS: usize = 1;
const CH_FREE: usize = 2;
const CH_TARGET: usize = 3;

/// Observation encoder, fixed at environment construction.
#[derive(Debug, Clone, Copy)]
pub struct ObservationEncoder {
    mode: ObsMode,
    sight: usize,
    /// Targeted variant adds the target channel to the grid encoding.
    targeted: bool,
}

impl ObservationEncoder {
    /// Create an encoder.
    pub fn new(mode: ObsMode, sight: usize, targeted: bool) -> Self {
        Self { mode, sight, targeted }
    }

    /// Number of channels in the grid encoding.
    pub fn channels(&self) -> usize {
        if self.targeted {
            4
        } else {
            3
        }
    }

    /// Per-hunter observation shape.
    pub fn shape(&self, n_agents: usize) -> Vec<usize> {
        let side = 1 + 2 * self.sight;
        match self.mode {
            ObsMode::Flat => vec![n_agents * 3],
            ObsMode::Grid => vec![self.channels(), side, side],
            ObsMode::OneHot => vec![n_agents * 4],
        }
    }

    /// Encode the current state, one vector per hunter (dead or alive).
    pub fn encode(
        &self,
        registry: &AgentRegistry,
        grid: &GridState,
        target: Option<Position>,
    ) -> Vec<Vec<f32>> {
        registry
            .hunters()
            .iter()
            .map(|&h| match self.mode {
                ObsMode::Flat => self.encode_flat(registry, grid, h, false),
                ObsMode::OneHot => self.encode_flat(registry, grid, h, true),
                ObsMode::Grid => self.encode_grid(registry, grid, h, target),
            })
            .collect()
    }

    /// Flat encodings: one entry per agent, the observing hunter first, then
    /// the remaining hunters, then the preys, all in registry order. Dead
    /// agents are zeroed.
    fn encode_flat(
        &self,
        registry: &AgentRegistry,
        grid: &GridState,
        observer: AgentHandle,
        one_hot: bool,
    ) -> Vec<f32> {
        let width = if one_hot { 4 } else { 3 };
        let mut out = Vec::with_capacity((registry.hunters().len() + registry.preys().len()) * width);

        let mut push = |handle: AgentHandle| {
            let agent = registry.get(handle);
            if !agent.alive {
                out.extend(std::iter::repeat(0.0).take(width));
                return;
            }
            out.push(agent.pos.row as f32 / grid.rows() as f32);
            out.push(agent.pos.col as f32 / grid.cols() as f32);
            match (one_hot, agent.faction) {
                (false, Faction::Hunter) => out.push(0.0),
                (false, Faction::Prey) => out.push(1.0),
                (true, Faction::Hunter) => out.extend([1.0, 0.0]),
                (true, Faction::Prey) => out.extend([0.0, 1.0]),
            }
        };

        push(observer);
        for &h in registry.hunters() {
            if h != observer {
                push(h);
            }
        }
        for &p in registry.preys() {
            push(p);
        }
        out
    }

    /// Binary channel window centered on the observing hunter, flattened
    /// channel-major. Out-of-grid cells are zero in every channel, including
    /// the free-cell channel.
    fn encode_grid(
        &self,
        registry: &AgentRegistry,
        grid: &GridState,
        observer: AgentHandle,
        target: Option<Position>,
    ) -> Vec<f32> {
        let side = 1 + 2 * self.sight as i32;
        let channels = self.channels();
        let mut out = vec![0.0; channels * (side * side) as usize];
        let center = registry.get(observer).pos;

        for dr in 0..side {
            for dc in 0..side {
                let pos = Position::new(
                    center.row + dr - self.sight as i32,
                    center.col + dc - self.sight as i32,
                );
                if !grid.in_bounds(pos) {
                    continue;
                }
                let cell_idx = (dr * side + dc) as usize;
                let plane = (side * side) as usize;
                match grid.at(pos) {
                    Cell::Hunter => out[CH_HUNTERS * plane + cell_idx] = 1.0,
                    Cell::Prey => out[CH_PREYS * plane + cell_idx] = 1.0,
                    Cell::Empty => out[CH_FREE * plane + cell_idx] = 1.0,
                }
                if self.targeted && target == Some(pos) {
                    out[CH_TARGET * plane + cell_idx] = 1.0;
                }
            }
        }
        out
    }
}
