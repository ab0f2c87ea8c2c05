//! Selection and navigation state
//!
//! The presentation layer never touches the simulators directly. It holds one
//! [`MemoryExplorer`] and one [`ConcurrencyExplorer`], both sharing the
//! read-only [`ScenarioCatalog`](crate::scenario::ScenarioCatalog), and calls
//! their mutation operations from key bindings.
//!
//! Selecting an unknown scenario is not an error: it leaves no scenario
//! active, which the UI shows as an empty view.

pub mod concurrency;
pub mod memory;

pub use concurrency::ConcurrencyExplorer;
pub use memory::MemoryExplorer;

use crate::scenario::Language;

/// Next (or previous) entry after `current` in `items`, wrapping around
fn cycle<T: PartialEq + Clone>(items: &[T], current: Option<&T>, forward: bool) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let len = items.len();
    let next = match current.and_then(|c| items.iter().position(|i| i == c)) {
        Some(pos) if forward => (pos + 1) % len,
        Some(pos) => (pos + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(items[next].clone())
}

/// Keep `current` when the scenario offers it, otherwise fall back to its first language
fn pick_language(available: &[Language], current: Language) -> Option<Language> {
    if available.contains(&current) {
        Some(current)
    } else {
        available.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_both_ways() {
        let items = ["a", "b", "c"];
        assert_eq!(cycle(&items, Some(&"c"), true), Some("a"));
        assert_eq!(cycle(&items, Some(&"a"), false), Some("c"));
        assert_eq!(cycle(&items, None, true), Some("a"));
        assert_eq!(cycle::<&str>(&[], None, true), None);
    }

    #[test]
    fn pick_language_falls_back_to_first() {
        let available = [Language::Go, Language::Java];
        assert_eq!(pick_language(&available, Language::Java), Some(Language::Java));
        assert_eq!(pick_language(&available, Language::C), Some(Language::Go));
        assert_eq!(pick_language(&[], Language::C), None);
    }
}
