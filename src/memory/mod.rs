//! Memory lifecycle model
//!
//! This module provides the memory side of the simulator:
//! - [`block`]: [`MemoryBlock`], its [`BlockKind`] and [`BlockStatus`], and
//!   synthetic address generation
//! - [`replay`]: the reconstructor that folds a scenario's steps into a
//!   [`MemoryState`]
//!
//! # Replay Model
//!
//! State is never patched incrementally. Every request rebuilds the block set
//! by replaying steps `0..=target` from an empty state:
//! ```text
//! steps[0..=target]  →  fold(apply_step)  →  MemoryState
//! ```
//! Stepping backward, jumping, or switching language all go through the same
//! fold, so the result depends only on `(steps, target, language)`.
//!
//! # Block States
//!
//! ```text
//! allocated ──free──────────→ (removed)
//!     │ ────leak───────────→ leaked      (terminal, stays visible)
//!     │ ────gc-mark────────→ garbage ──gc-sweep──→ (removed)
//!     └ ────refcount 0─────→ (removed)
//! ```

pub mod block;
pub mod replay;

pub use block::{synthetic_address, BlockKind, BlockStatus, MemoryBlock};
pub use replay::{reconstruct, reconstruct_with, MemoryState, ReplayOptions};
