//! Capture evaluation
//!
//! Runs after positions commit for the tick. Every still-alive prey is
//! checked against the same post-move snapshot: sibling captures in one tick
//! can never un-capture each other, and a prey once dead stays dead until
//! `reset`.

use tracing::debug;

use super::agents::{AgentHandle, AgentRegistry};
use super::types::Position;

/// A prey captured this tick, with the cell it died on.
#[derive(Debug, Clone, Copy)]
pub struct Capture {
    /// Handle of the captured prey.
    pub prey: AgentHandle,
    /// Cell the prey occupied at capture time.
    pub cell: Position,
}

/// Number of live hunters surrounding `pos` in the post-move state.
///
/// Counts orthogonally adjacent hunters plus a hunter standing on the cell
/// itself; the arbitration pass lets a hunter move onto a prey's cell
/// (pursuing into capture), and that hunter counts toward the threshold.
pub fn surrounding_hunters(registry: &AgentRegistry, pos: Position) -> usize {
    registry
        .hunters()
        .iter()
        .filter(|&&h| {
            let hunter = registry.get(h);
            hunter.alive && hunter.pos.manhattan_distance(&pos) <= 1
        })
        .count()
}

/// Evaluate captures for the tick and mark captured preys dead.
///
/// The alive-prey set is snapshotted before evaluation; all preys are judged
/// against the same post-move positions in a single pass.
pub fn evaluate_captures(registry: &mut AgentRegistry, n_catch: usize) -> Vec<Capture> {
    let snapshot = registry.live_preys();
    let mut captured = Vec::new();

    for prey in snapshot {
        let cell = registry.get(prey).pos;
        if surrounding_hunters(registry, cell) >= n_catch {
            registry.get_mut(prey).alive = false;
            debug!(prey = %registry.get(prey).id, row = cell.row, col = cell.col, "prey captured");
            captured.push(Capture { prey, cell });
        }
    }

    captured
}
