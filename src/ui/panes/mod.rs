//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Scenario code with syntax highlighting and current line indicator
//! - [`memory`]: Heap and stack block lists for the memory view
//! - [`lanes`]: Per-lane task progress for the concurrency view
//! - [`run`]: Run phase, task counts and final metrics
//! - [`status`]: Status bar with keybindings and state badges
//!
//! Each pane module exports a primary `render_*` function taking the frame,
//! its area and whether it has focus.

pub mod lanes;
pub mod memory;
pub mod run;
pub mod source;
pub mod status;

pub use lanes::render_lanes_pane;
pub use memory::{render_region_pane, MemoryScrollState};
pub use run::render_run_pane;
pub use source::render_source_pane;
pub use status::{render_status_bar, Badge, Position};
