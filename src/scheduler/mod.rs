//! Concurrency scheduling simulator
//!
//! - [`clock`]: the injectable [`Clock`] trait with [`WallClock`] and [`ManualClock`]
//! - [`task`]: runtime [`Task`]s and their [`TaskStatus`]
//! - [`engine`]: [`ConcurrencySim`], which ticks a run forward
//! - [`metrics`]: [`RunMetrics`] computed when a run ends
//!
//! # Admission Rules
//!
//! | Model                                     | Lanes     | A queued task may start when       |
//! |-------------------------------------------|-----------|------------------------------------|
//! | `event-loop`                              | 1         | no task is running anywhere        |
//! | `goroutines`                              | n (shown) | always                             |
//! | `threads`, `async-await`, `multiprocessing` | n       | its own lane is free               |
//!
//! Nothing here spawns real work. The simulator only models the policies.

pub mod clock;
pub mod engine;
pub mod metrics;
pub mod task;

pub use clock::{Clock, ManualClock, WallClock};
pub use engine::{ConcurrencySim, RunPhase, TickOutcome};
pub use metrics::{efficiency, RunMetrics};
pub use task::{Task, TaskStatus};
