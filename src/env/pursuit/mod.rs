//! Grid-based multi-agent pursuit environments
//!
//! A fixed-size 2D grid with two factions, hunters and preys, moving
//! simultaneously each tick. Hunters capture a prey by surrounding it with
//! at least `n_catch` orthogonally adjacent hunters. [`PursuitEnv`] is the
//! plain environment; [`TargetPursuitEnv`] rewards capturing one designated
//! prey at a time.

pub mod agents;
pub mod behavior;
pub mod capture;
pub mod config;
pub mod environment;
pub mod grid;
pub mod movement;
pub mod observation;
pub mod reward;
pub mod target;
pub mod types;

pub use behavior::Behavior;
pub use config::{ObsMode, PursuitConfig, RewardSchedule};
pub use environment::PursuitEnv;
pub use target::TargetPursuitEnv;
pub use types::{Action, Faction, Position};
