//! Scenarios shipped with the crate

mod concurrency;
mod memory;

pub use concurrency::concurrency_scenarios;
pub use memory::memory_scenarios;

use super::Language;
use std::collections::BTreeMap;

/// Collect `(language, value)` pairs into the per-language map scenarios use
fn by_language<T>(entries: Vec<(Language, T)>) -> BTreeMap<Language, T> {
    entries.into_iter().collect()
}
