//! Basic types for the pursuit environment
//!
//! Fundamental vocabulary shared by every engine component: discrete actions,
//! grid positions, cell occupancy markers, and agent factions.

use serde::{Deserialize, Serialize};

use crate::error::PursuitError;

/// Number of discrete actions an agent can take.
pub const ACTION_SPACE: usize = 5;

/// Discrete action an agent can take on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl Action {
    /// All actions, in index order.
    pub const ALL: [Action; ACTION_SPACE] =
        [Action::Up, Action::Down, Action::Left, Action::Right, Action::Stay];

    /// Convert a raw action index into an action.
    ///
    /// Out-of-range indices are an error, never clamped (`InvalidAction` is
    /// raised by the engine with the offending agent attached).
    pub fn from_index(action: i64) -> Option<Self> {
        match action {
            0 => Some(Action::Up),
            1 => Some(Action::Down),
            2 => Some(Action::Left),
            3 => Some(Action::Right),
            4 => Some(Action::Stay),
            _ => None,
        }
    }

    /// Convert action to a (d_row, d_col) delta.
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::Stay => (0, 0),
        }
    }

    /// Action index as consumed by policy heads.
    pub fn index(self) -> i64 {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
            Action::Stay => 4,
        }
    }
}

/// Position on the grid, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Create new position.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Apply an action, clipping at the grid boundary.
    ///
    /// Moving off-grid is a no-op, not an error: the agent proposes its own
    /// current cell instead.
    pub fn stepped(&self, action: Action, rows: i32, cols: i32) -> Self {
        let (dr, dc) = action.to_delta();
        Self {
            row: (self.row + dr).clamp(0, rows - 1),
            col: (self.col + dc).clamp(0, cols - 1),
        }
    }

    /// Manhattan distance to another position.
    pub fn manhattan_distance(&self, other: &Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

/// Occupancy marker for a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Hunter,
    Prey,
}

/// Agent faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    /// Tries to surround and capture preys.
    Hunter,
    /// Tries to evade capture.
    Prey,
}

impl Faction {
    /// Occupancy marker for this faction.
    pub fn cell(self) -> Cell {
        match self {
            Faction::Hunter => Cell::Hunter,
            Faction::Prey => Cell::Prey,
        }
    }
}

/// Parse a raw action index, reporting the owning agent on failure.
pub fn parse_action(agent_id: &str, action: i64) -> Result<Action, PursuitError> {
    Action::from_index(action).ok_or_else(|| PursuitError::InvalidAction {
        agent: agent_id.to_string(),
        action,
        range: ACTION_SPACE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()), Some(action));
        }
        assert_eq!(Action::from_index(5), None);
        assert_eq!(Action::from_index(-1), None);
    }

    #[test]
    fn test_stepped_clips_at_boundary() {
        let pos = Position::new(0, 0);
        assert_eq!(pos.stepped(Action::Up, 5, 5), pos);
        assert_eq!(pos.stepped(Action::Left, 5, 5), pos);
        assert_eq!(pos.stepped(Action::Down, 5, 5), Position::new(1, 0));

        let corner = Position::new(4, 4);
        assert_eq!(corner.stepped(Action::Down, 5, 5), corner);
        assert_eq!(corner.stepped(Action::Right, 5, 5), corner);
    }

    #[test]
    fn test_parse_action_rejects_out_of_range() {
        let err = parse_action("hunter_0", 7).unwrap_err();
        assert!(matches!(err, PursuitError::InvalidAction { action: 7, .. }));
        assert!(parse_action("hunter_0", 4).is_ok());
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Position::new(1, 1);
        let b = Position::new(4, 3);
        assert_eq!(a.manhattan_distance(&b), 5);
        assert_eq!(b.manhattan_distance(&a), 5);
    }
}
