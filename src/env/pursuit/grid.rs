//! Occupancy grid
//!
//! The grid is rebuilt wholesale from live agent positions on every reset and
//! step rather than patched incrementally; the occupancy invariant (one live
//! agent per cell, grid derivable from the agent table) then holds by
//! construction and stale-cell bugs cannot accumulate.

use super::agents::AgentRegistry;
use super::types::{Cell, Position};

/// Row-major occupancy array over `rows x cols` cells.
#[derive(Debug, Clone)]
pub struct GridState {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
}

impl GridState {
    /// Create an empty grid.
    pub fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols, cells: vec![Cell::Empty; (rows * cols) as usize] }
    }

    /// Grid height.
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Grid width.
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Whether `pos` lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.rows && pos.col >= 0 && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> usize {
        (pos.row * self.cols + pos.col) as usize
    }

    /// Occupancy marker at `pos`.
    pub fn at(&self, pos: Position) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Discard all markers and re-scan live agents.
    ///
    /// Preys are written first so that a hunter standing on a prey's cell
    /// (pursuing into capture) shadows the prey marker for the tick.
    pub fn rebuild(&mut self, registry: &AgentRegistry) {
        self.cells.fill(Cell::Empty);
        for &handle in registry.preys().iter().chain(registry.hunters()) {
            let agent = registry.get(handle);
            if agent.alive {
                let idx = self.index(agent.pos);
                self.cells[idx] = agent.faction.cell();
            }
        }
    }

    /// 4-connected orthogonal neighbors of `pos`, clipped at boundaries.
    ///
    /// Edge cells have 3 neighbors, corner cells 2.
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        let candidates = [
            Position::new(pos.row - 1, pos.col),
            Position::new(pos.row + 1, pos.col),
            Position::new(pos.row, pos.col - 1),
            Position::new(pos.row, pos.col + 1),
        ];
        candidates.into_iter().filter(|p| self.in_bounds(*p)).collect()
    }

    /// Number of live hunters orthogonally adjacent to `pos`.
    pub fn adjacent_hunters(&self, pos: Position) -> usize {
        self.neighbors(pos).into_iter().filter(|&p| self.at(p) == Cell::Hunter).count()
    }

    /// Human-readable dump: `H` hunter, `P` prey, `.` empty.
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity((self.rows * (self.cols + 1)) as usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push(match self.at(Position::new(row, col)) {
                    Cell::Empty => '.',
                    Cell::Hunter => 'H',
                    Cell::Prey => 'P',
                });
            }
            out.push('\n');
        }
        out
    }
}
