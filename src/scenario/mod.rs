//! Scenario data model
//!
//! A scenario is static, read-only data that drives one simulation:
//! - [`MemoryScenario`]: per-language [`MemoryProgram`]s, each an ordered list
//!   of [`MemoryStep`]s replayed by [`crate::memory::reconstruct`]
//! - [`ConcurrencyScenario`]: a shared [`TaskDefinition`] list plus a
//!   per-language [`ConcurrencyImpl`] naming the [`ConcurrencyModel`]
//!
//! Scenarios never change at runtime. Only the replay index and the selected
//! language move; see [`crate::navigation`].
//!
//! The serde representation of these types is the JSON catalog format accepted
//! by [`catalog::ScenarioCatalog::from_path`].

pub mod builtin;
pub mod catalog;

use crate::constants::DEFAULT_LANE_COUNT;
use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use catalog::ScenarioCatalog;

/// Languages a scenario can be authored for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Rust,
    Go,
    Java,
    JavaScript,
    Python,
    Swift,
}

/// How a language reclaims heap memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStrategy {
    Manual,
    Ownership,
    GarbageCollected,
    ReferenceCounted,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::C,
        Language::Cpp,
        Language::Rust,
        Language::Go,
        Language::Java,
        Language::JavaScript,
        Language::Python,
        Language::Swift,
    ];

    /// Lowercase identifier used on the command line and in catalog files
    pub fn name(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Swift => "swift",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Rust => "Rust",
            Language::Go => "Go",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Swift => "Swift",
        }
    }

    pub fn memory_strategy(self) -> MemoryStrategy {
        match self {
            Language::C | Language::Cpp => MemoryStrategy::Manual,
            Language::Rust => MemoryStrategy::Ownership,
            Language::Go | Language::Java | Language::JavaScript => {
                MemoryStrategy::GarbageCollected
            }
            Language::Python | Language::Swift => MemoryStrategy::ReferenceCounted,
        }
    }

    /// Whether freshly allocated blocks carry a reference count
    pub fn uses_reference_counting(self) -> bool {
        self.memory_strategy() == MemoryStrategy::ReferenceCounted
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_name())
    }
}

impl FromStr for Language {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let alias = match lowered.as_str() {
            "c++" => "cpp",
            "golang" => "go",
            "js" | "node" => "javascript",
            "py" => "python",
            "rs" => "rust",
            other => other,
        };
        Language::ALL
            .into_iter()
            .find(|lang| lang.name() == alias)
            .ok_or_else(|| SimError::UnknownLanguage {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for MemoryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemoryStrategy::Manual => "manual",
            MemoryStrategy::Ownership => "ownership",
            MemoryStrategy::GarbageCollected => "garbage collected",
            MemoryStrategy::ReferenceCounted => "reference counted",
        };
        f.pad(label)
    }
}

// ========== Memory scenarios ==========

/// One instruction of a memory-lifecycle scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryAction {
    AllocateHeap,
    AllocateStack,
    Free,
    Leak,
    TransferOwnership,
    AddReference,
    RemoveReference,
    GcMark,
    GcSweep,
    ScopeEnter,
    ScopeExit,
}

impl MemoryAction {
    /// Actions that must name the block they act on
    pub fn requires_block(self) -> bool {
        !matches!(
            self,
            MemoryAction::ScopeEnter | MemoryAction::ScopeExit | MemoryAction::GcSweep
        )
    }

    pub fn is_allocation(self) -> bool {
        matches!(self, MemoryAction::AllocateHeap | MemoryAction::AllocateStack)
    }

    pub fn name(self) -> &'static str {
        match self {
            MemoryAction::AllocateHeap => "allocate-heap",
            MemoryAction::AllocateStack => "allocate-stack",
            MemoryAction::Free => "free",
            MemoryAction::Leak => "leak",
            MemoryAction::TransferOwnership => "transfer-ownership",
            MemoryAction::AddReference => "add-reference",
            MemoryAction::RemoveReference => "remove-reference",
            MemoryAction::GcMark => "gc-mark",
            MemoryAction::GcSweep => "gc-sweep",
            MemoryAction::ScopeEnter => "scope-enter",
            MemoryAction::ScopeExit => "scope-exit",
        }
    }
}

/// A single scripted memory step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStep {
    pub line_number: u32,
    pub action: MemoryAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl MemoryStep {
    pub fn new(line_number: u32, action: MemoryAction) -> Self {
        MemoryStep {
            line_number,
            action,
            block_id: None,
            block_size: None,
            owner: None,
            target_owner: None,
            points_to: None,
            label: None,
        }
    }

    pub fn block(mut self, id: &str) -> Self {
        self.block_id = Some(id.to_string());
        self
    }

    pub fn size(mut self, bytes: usize) -> Self {
        self.block_size = Some(bytes);
        self
    }

    pub fn owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    pub fn target_owner(mut self, owner: &str) -> Self {
        self.target_owner = Some(owner.to_string());
        self
    }

    pub fn points_to(mut self, id: &str) -> Self {
        self.points_to = Some(id.to_string());
        self
    }

    pub fn label(mut self, text: &str) -> Self {
        self.label = Some(text.to_string());
        self
    }
}

/// The code shown for a language together with the steps that animate it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryProgram {
    pub code: String,
    pub steps: Vec<MemoryStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryScenario {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub programs: BTreeMap<Language, MemoryProgram>,
}

impl MemoryScenario {
    pub fn program(&self, language: Language) -> Option<&MemoryProgram> {
        self.programs.get(&language)
    }

    pub fn languages(&self) -> Vec<Language> {
        self.programs.keys().copied().collect()
    }
}

// ========== Concurrency scenarios ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Cpu,
    Io,
    Network,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskKind::Cpu => "cpu",
            TaskKind::Io => "io",
            TaskKind::Network => "network",
        };
        f.pad(label)
    }
}

/// A unit of scripted work, shared by every language of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub blocks_event_loop: bool,
}

impl TaskDefinition {
    pub fn new(id: &str, name: &str, duration_ms: u64, kind: TaskKind) -> Self {
        TaskDefinition {
            id: id.to_string(),
            name: name.to_string(),
            duration_ms,
            kind,
            blocks_event_loop: false,
        }
    }

    pub fn blocking(mut self) -> Self {
        self.blocks_event_loop = true;
        self
    }
}

/// Concurrency models the scheduler knows how to admit tasks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConcurrencyModel {
    EventLoop,
    Goroutines,
    Threads,
    AsyncAwait,
    Multiprocessing,
}

/// Static memory-cost label attached to a concurrency model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryOverhead {
    Minimal,
    Low,
    High,
}

impl fmt::Display for MemoryOverhead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemoryOverhead::Minimal => "minimal",
            MemoryOverhead::Low => "low",
            MemoryOverhead::High => "high",
        };
        f.pad(label)
    }
}

impl ConcurrencyModel {
    pub const ALL: [ConcurrencyModel; 5] = [
        ConcurrencyModel::EventLoop,
        ConcurrencyModel::Goroutines,
        ConcurrencyModel::Threads,
        ConcurrencyModel::AsyncAwait,
        ConcurrencyModel::Multiprocessing,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConcurrencyModel::EventLoop => "event-loop",
            ConcurrencyModel::Goroutines => "goroutines",
            ConcurrencyModel::Threads => "threads",
            ConcurrencyModel::AsyncAwait => "async-await",
            ConcurrencyModel::Multiprocessing => "multiprocessing",
        }
    }

    /// Number of execution lanes. The event loop always has exactly one;
    /// other models honour a scenario override when present.
    pub fn lane_count(self, max_concurrent: Option<usize>) -> usize {
        match self {
            ConcurrencyModel::EventLoop => 1,
            _ => max_concurrent.unwrap_or(DEFAULT_LANE_COUNT).max(1),
        }
    }

    pub fn memory_overhead(self) -> MemoryOverhead {
        match self {
            ConcurrencyModel::Goroutines => MemoryOverhead::Low,
            ConcurrencyModel::Threads => MemoryOverhead::High,
            _ => MemoryOverhead::Minimal,
        }
    }
}

impl fmt::Display for ConcurrencyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// How one language expresses a concurrency scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyImpl {
    pub code: String,
    pub model: ConcurrencyModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,
    #[serde(default)]
    pub description: String,
}

impl ConcurrencyImpl {
    pub fn lane_count(&self) -> usize {
        self.model.lane_count(self.max_concurrent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyScenario {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub tasks: Vec<TaskDefinition>,
    pub implementations: BTreeMap<Language, ConcurrencyImpl>,
}

impl ConcurrencyScenario {
    pub fn implementation(&self, language: Language) -> Option<&ConcurrencyImpl> {
        self.implementations.get(&language)
    }

    pub fn languages(&self) -> Vec<Language> {
        self.implementations.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_aliases() {
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("golang".parse::<Language>().unwrap(), Language::Go);
        assert_eq!(" Python ".parse::<Language>().unwrap(), Language::Python);
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn only_refcounted_languages_count_references() {
        let counted: Vec<_> = Language::ALL
            .into_iter()
            .filter(|l| l.uses_reference_counting())
            .collect();
        assert_eq!(counted, vec![Language::Python, Language::Swift]);
    }

    #[test]
    fn lane_counts_per_model() {
        assert_eq!(ConcurrencyModel::EventLoop.lane_count(Some(8)), 1);
        assert_eq!(ConcurrencyModel::Threads.lane_count(None), DEFAULT_LANE_COUNT);
        assert_eq!(ConcurrencyModel::Multiprocessing.lane_count(Some(2)), 2);
        assert_eq!(ConcurrencyModel::AsyncAwait.lane_count(Some(0)), 1);
    }

    #[test]
    fn action_wire_names_are_kebab_case() {
        let json = serde_json::to_string(&MemoryAction::TransferOwnership).unwrap();
        assert_eq!(json, "\"transfer-ownership\"");
        let action: MemoryAction = serde_json::from_str("\"gc-sweep\"").unwrap();
        assert_eq!(action, MemoryAction::GcSweep);
        assert_eq!(action.name(), "gc-sweep");
    }
}
