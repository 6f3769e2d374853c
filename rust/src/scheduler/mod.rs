//! Forward-pass scheduler.
//!
//! Computes earliest start and end offsets for every task by propagating
//! through the dependency graph in topological order. Tasks the propagation
//! never reaches (cycles and everything behind them) are placed at offset 0
//! so the schedule always covers the whole input.

mod core;
mod state;

pub use self::core::{schedule, ForwardScheduler};
pub use state::SchedulerState;
