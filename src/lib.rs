//! # Introduction
//!
//! runtimelab is a teaching tool that shows how programming languages manage
//! memory and run concurrent work. Nothing is compiled or executed: every
//! scenario is static data, and two small simulators turn that data into
//! something to look at in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Scenario catalog → Reconstructor / Scheduler → Explorers → TUI / reports
//! ```
//!
//! 1. [`scenario`]: the read-only catalog of memory and concurrency scenarios,
//!    built in or loaded from JSON.
//! 2. [`memory`]: replays memory steps `0..=n` into the list of live blocks.
//! 3. [`scheduler`]: advances simulated time over a task list under one of
//!    five concurrency models and computes run metrics.
//! 4. [`navigation`]: selected scenario, language and step; the only state the
//!    UI mutates.
//! 5. [`report`]: plain-text output of both simulators for the command line.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Memory models
//!
//! Manual (C, C++), ownership (Rust), garbage collected (Go, Java,
//! JavaScript) and reference counted (Python, Swift).
//!
//! ## Concurrency models
//!
//! `event-loop`, `goroutines`, `threads`, `async-await`, `multiprocessing`.

pub mod constants;
pub mod error;
pub mod memory;
pub mod navigation;
pub mod report;
pub mod scenario;
pub mod scheduler;
pub mod ui;
