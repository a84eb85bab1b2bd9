//! Traversal planning and the resumable execution engine
//!
//! Three pieces, split so the interesting logic stays pure:
//! 1. Plan - compute the ordered visitation sequence (pure, testable)
//! 2. Pause - the durable record of an interrupted run
//! 3. Execute - drive the sequence through the shell, persisting pause
//!    state on failure and honoring the continue/abort protocol

mod execute;
mod pause;
mod plan;

pub use execute::{Engine, Outcome};
pub use pause::{PauseState, clear_pause, load_pause, pause_path, save_pause};
pub use plan::{PlanStep, TraversalMode, plan};
