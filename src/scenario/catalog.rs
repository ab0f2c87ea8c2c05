//! Scenario catalog: the read-only library of memory and concurrency scenarios
//!
//! The catalog starts from the built-in scenarios and may be extended with
//! JSON catalog files. A loaded scenario with the same id as an existing one
//! replaces it, which lets users override a built-in scenario without
//! renaming it.

use super::{builtin, ConcurrencyScenario, Language, MemoryScenario};
use crate::error::SimError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk catalog layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub memory: Vec<MemoryScenario>,
    #[serde(default)]
    pub concurrency: Vec<ConcurrencyScenario>,
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    memory: Vec<MemoryScenario>,
    concurrency: Vec<ConcurrencyScenario>,
    memory_index: FxHashMap<String, usize>,
    concurrency_index: FxHashMap<String, usize>,
}

impl ScenarioCatalog {
    /// An empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The scenarios shipped with the crate
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.extend(CatalogFile {
            memory: builtin::memory_scenarios(),
            concurrency: builtin::concurrency_scenarios(),
        });
        catalog
    }

    /// Parse a catalog from JSON text and validate it
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|source| SimError::CatalogParse {
                path: None,
                source,
            })?;
        Self::from_file(file)
    }

    /// Read, parse and validate a catalog file
    pub fn from_path(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile =
            serde_json::from_str(&text).map_err(|source| SimError::CatalogParse {
                path: Some(path.to_path_buf()),
                source,
            })?;
        log::info!(
            "Loaded catalog {}: {} memory, {} concurrency scenario(s)",
            path.display(),
            file.memory.len(),
            file.concurrency.len()
        );
        Self::from_file(file)
    }

    fn from_file(file: CatalogFile) -> Result<Self, SimError> {
        let mut catalog = Self::new();
        catalog.extend(file);
        let problems = catalog.validate();
        if problems.is_empty() {
            Ok(catalog)
        } else {
            Err(SimError::InvalidCatalog { problems })
        }
    }

    /// Add scenarios, replacing any existing scenario with the same id
    pub fn extend(&mut self, file: CatalogFile) {
        for scenario in file.memory {
            match self.memory_index.get(&scenario.id) {
                Some(&slot) => {
                    log::debug!("Replacing memory scenario '{}'", scenario.id);
                    self.memory[slot] = scenario;
                }
                None => {
                    self.memory_index
                        .insert(scenario.id.clone(), self.memory.len());
                    self.memory.push(scenario);
                }
            }
        }
        for scenario in file.concurrency {
            match self.concurrency_index.get(&scenario.id) {
                Some(&slot) => {
                    log::debug!("Replacing concurrency scenario '{}'", scenario.id);
                    self.concurrency[slot] = scenario;
                }
                None => {
                    self.concurrency_index
                        .insert(scenario.id.clone(), self.concurrency.len());
                    self.concurrency.push(scenario);
                }
            }
        }
    }

    /// Merge another catalog into this one
    pub fn merge(&mut self, other: ScenarioCatalog) {
        self.extend(other.into_file());
    }

    pub fn into_file(self) -> CatalogFile {
        CatalogFile {
            memory: self.memory,
            concurrency: self.concurrency,
        }
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        let file = CatalogFile {
            memory: self.memory.clone(),
            concurrency: self.concurrency.clone(),
        };
        serde_json::to_string_pretty(&file)
            .map_err(|source| SimError::CatalogSerialize { source })
    }

    pub fn memory_scenarios(&self) -> &[MemoryScenario] {
        &self.memory
    }

    pub fn concurrency_scenarios(&self) -> &[ConcurrencyScenario] {
        &self.concurrency
    }

    pub fn memory_scenario(&self, id: &str) -> Option<&MemoryScenario> {
        self.memory_index.get(id).map(|&slot| &self.memory[slot])
    }

    pub fn concurrency_scenario(&self, id: &str) -> Option<&ConcurrencyScenario> {
        self.concurrency_index
            .get(id)
            .map(|&slot| &self.concurrency[slot])
    }

    /// Look up a memory scenario, failing with a descriptive error
    pub fn require_memory(&self, id: &str) -> Result<&MemoryScenario, SimError> {
        self.memory_scenario(id)
            .ok_or_else(|| SimError::UnknownScenario { id: id.to_string() })
    }

    pub fn require_concurrency(&self, id: &str) -> Result<&ConcurrencyScenario, SimError> {
        self.concurrency_scenario(id)
            .ok_or_else(|| SimError::UnknownScenario { id: id.to_string() })
    }

    /// Check structural consistency. Returns one message per finding.
    ///
    /// Missing block ids and empty programs are reported here; the
    /// reconstructor itself still tolerates them at replay time.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for scenario in &self.memory {
            if scenario.programs.is_empty() {
                problems.push(format!("memory scenario '{}' has no programs", scenario.id));
            }
            for (language, program) in &scenario.programs {
                for (index, step) in program.steps.iter().enumerate() {
                    if step.action.requires_block() && step.block_id.is_none() {
                        problems.push(format!(
                            "memory scenario '{}' ({}): step {} ({}) has no block id",
                            scenario.id,
                            language.name(),
                            index,
                            step.action.name()
                        ));
                    }
                }
            }
        }

        for scenario in &self.concurrency {
            if scenario.implementations.is_empty() {
                problems.push(format!(
                    "concurrency scenario '{}' has no implementations",
                    scenario.id
                ));
            }
            let mut seen = FxHashMap::default();
            for task in &scenario.tasks {
                if seen.insert(task.id.as_str(), ()).is_some() {
                    problems.push(format!(
                        "concurrency scenario '{}': duplicate task id '{}'",
                        scenario.id, task.id
                    ));
                }
            }
        }

        problems
    }

    /// Languages offered by a memory scenario, falling back to none for unknown ids
    pub fn memory_languages(&self, id: &str) -> Vec<Language> {
        self.memory_scenario(id)
            .map(MemoryScenario::languages)
            .unwrap_or_default()
    }

    pub fn concurrency_languages(&self, id: &str) -> Vec<Language> {
        self.concurrency_scenario(id)
            .map(ConcurrencyScenario::languages)
            .unwrap_or_default()
    }
}
