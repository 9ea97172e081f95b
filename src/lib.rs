//! # Pursuit
//!
//! Deterministic, grid-based multi-agent pursuit environments for
//! reinforcement learning.
//!
//! A fixed-size 2D grid holds two agent factions, hunters and preys, that
//! move simultaneously each tick. Hunters capture a prey by surrounding it
//! with at least `n_catch` orthogonally adjacent hunters. All randomness
//! routes through one seedable RNG per environment instance, so episodes are
//! exactly reproducible.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pursuit_rl::env::pursuit::{PursuitConfig, PursuitEnv};
//! use pursuit_rl::env::MultiAgentEnvironment;
//!
//! let mut env = PursuitEnv::new(PursuitConfig::default()).unwrap();
//! let (obs, info) = env.reset(Some(42)).unwrap();
//! let actions = vec![4; obs.len() + info.preys_left]; // everyone stays put
//! let outcome = env.step(&actions).unwrap();
//! println!("{}", env.render());
//! assert_eq!(outcome.info.timestep, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment traits and implementations
pub mod env;

/// Error taxonomy
pub mod error;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::env::pool::EnvPool;
    pub use crate::env::pursuit::{
        Action, Behavior, ObsMode, PursuitConfig, PursuitEnv, RewardSchedule, TargetPursuitEnv,
    };
    pub use crate::env::{MultiAgentEnvironment, StepInfo, StepOutcome};
    pub use crate::error::PursuitError;
}

/// Current version of pursuit-rl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
