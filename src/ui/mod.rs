//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, view switching and pane focus
//! - **[`panes`]**: render functions for each visible pane (source, stack, heap,
//!   lanes, run summary, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point is [`App`]: construct it with a
//! [`ScenarioCatalog`](crate::scenario::ScenarioCatalog) and call
//! [`App::run`](app::App::run) to start the event loop.

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
