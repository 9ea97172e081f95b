//! Simultaneous-move conflict arbitration
//!
//! All live agents propose their next cell at once; a single pass over
//! ordered agent pairs collects per-faction "cannot move" sets and every
//! flagged agent is snapped back to its current cell. There is no second
//! pass: a rejection never re-triggers evaluation of other agents in the
//! same tick, so an agent that entered a cell another mover was vacating
//! keeps its move even if that mover is itself snapped back. Engineered
//! three-way conflicts between mutually adjacent agents can therefore leave
//! two agents on one cell for a tick; this is the documented behavior of the
//! arbitration, not an accident, and downstream code tolerates it.
//!
//! Conflict rules, in the order they are checked per ordered pair (a, b):
//! 1. Position swaps are rejected symmetrically, both agents stay.
//! 2. Equal proposed cells: a hunter may enter a cell a prey occupies or is
//!    vacating (pursuing into capture); an agent holding its cell keeps it;
//!    a prey never wins a cell from a hunter; between agents of the same
//!    faction the lower rank wins and the other snaps back.

use std::collections::HashSet;

use super::agents::{AgentHandle, AgentRegistry};
use super::types::{Action, Faction, Position};

/// One agent's proposed move for this tick.
#[derive(Debug, Clone, Copy)]
struct Proposal {
    handle: AgentHandle,
    faction: Faction,
    rank: usize,
    current: Position,
    proposed: Position,
}

/// Resolve all proposed moves into committed next positions.
///
/// `moves` holds one entry per live agent, hunters first then preys. The
/// returned vector is in the same order and pairs each handle with its final
/// position for the tick.
pub fn resolve_moves(
    registry: &AgentRegistry,
    rows: i32,
    cols: i32,
    moves: &[(AgentHandle, Action)],
) -> Vec<(AgentHandle, Position)> {
    let proposals: Vec<Proposal> = moves
        .iter()
        .map(|&(handle, action)| {
            let agent = registry.get(handle);
            Proposal {
                handle,
                faction: agent.faction,
                rank: agent.rank,
                current: agent.pos,
                proposed: agent.pos.stepped(action, rows, cols),
            }
        })
        .collect();

    let mut blocked_hunters: HashSet<usize> = HashSet::new();
    let mut blocked_preys: HashSet<usize> = HashSet::new();

    for (i, a) in proposals.iter().enumerate() {
        for (j, b) in proposals.iter().enumerate() {
            if i == j {
                continue;
            }
            if !rejects(a, b) {
                continue;
            }
            match a.faction {
                Faction::Hunter => blocked_hunters.insert(i),
                Faction::Prey => blocked_preys.insert(i),
            };
            break;
        }
    }

    // Snap every flagged agent back in one go; no re-evaluation.
    proposals
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let blocked = match p.faction {
                Faction::Hunter => blocked_hunters.contains(&i),
                Faction::Prey => blocked_preys.contains(&i),
            };
            (p.handle, if blocked { p.current } else { p.proposed })
        })
        .collect()
}

/// Whether `b` causes `a`'s proposed move to be rejected.
fn rejects(a: &Proposal, b: &Proposal) -> bool {
    // Swap: both agents trade cells. Rejected symmetrically.
    if a.proposed == b.current && b.proposed == a.current && a.current != b.current {
        return true;
    }

    if a.proposed != b.proposed {
        return false;
    }

    // Hunter-into-prey exception: a hunter may claim the cell a prey occupies
    // or is vacating. This is what lets a capture land on the hunter's own
    // move and it must stay first in the ordering.
    if a.faction == Faction::Hunter && b.faction == Faction::Prey {
        return false;
    }

    // An agent holding its cell keeps it.
    if b.proposed == b.current {
        return true;
    }

    // Prey never wins a contested cell from a hunter.
    if a.faction == Faction::Prey && b.faction == Faction::Hunter {
        return true;
    }

    // Same faction, both moving: lower rank wins the cell.
    a.rank > b.rank
}
