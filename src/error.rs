//! Error taxonomy for the pursuit environments
//!
//! All engine failures are local and synchronous: they surface to the
//! immediate caller of `reset`/`step`/`spawn` and there is no retry logic
//! inside the engine. Timeout is not an error; it is reported through the
//! `timed_out` flag of a step outcome.

use thiserror::Error;

use crate::env::pursuit::types::Position;

/// Errors produced by environment construction and stepping.
#[derive(Debug, Error, PartialEq)]
pub enum PursuitError {
    /// An action index outside the discrete action range was supplied.
    ///
    /// Out-of-range actions are never silently clamped; doing so would mask
    /// bugs in the training code that produced them.
    #[error("agent {agent}: action {action} outside discrete range 0..{range}")]
    InvalidAction {
        /// Id of the agent the action was addressed to.
        agent: String,
        /// The offending action index.
        action: i64,
        /// Size of the discrete action space.
        range: usize,
    },

    /// An explicit spawn requested a cell already held by a live agent.
    ///
    /// Recoverable: the caller may retry with a different cell. Random
    /// placement never produces this; it searches for a free cell instead.
    #[error("cell ({},{}) is already occupied by a live agent", .0.row, .0.col)]
    DuplicatePosition(Position),

    /// Invalid construction parameters. Fatal, never recovered.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
