//! Navigation over memory scenarios

use super::{cycle, pick_language};
use crate::error::SimError;
use crate::memory::{reconstruct_with, MemoryState, ReplayOptions};
use crate::scenario::{Language, MemoryProgram, MemoryScenario, MemoryStep, ScenarioCatalog};
use std::sync::Arc;

/// Active memory scenario, language and step, plus the blocks they produce.
///
/// Every mutation that changes what is shown rebuilds [`MemoryState`] from
/// step 0 through the reconstructor.
#[derive(Debug, Clone)]
pub struct MemoryExplorer {
    catalog: Arc<ScenarioCatalog>,
    scenario_id: Option<String>,
    language: Language,
    step_index: usize,
    options: ReplayOptions,
    state: MemoryState,
}

impl MemoryExplorer {
    pub fn new(catalog: Arc<ScenarioCatalog>) -> Self {
        MemoryExplorer {
            catalog,
            scenario_id: None,
            language: Language::C,
            step_index: 0,
            options: ReplayOptions::default(),
            state: MemoryState::default(),
        }
    }

    // ========== Selection ==========

    /// Make `id` the active scenario at step 0.
    ///
    /// Returns `false` and leaves no scenario active when `id` is unknown.
    pub fn select_scenario(&mut self, id: &str) -> bool {
        self.step_index = 0;
        self.state = MemoryState::default();

        let Some(scenario) = self.catalog.memory_scenario(id) else {
            log::info!("memory scenario '{}' not found, selection cleared", id);
            self.scenario_id = None;
            return false;
        };
        if let Some(language) = pick_language(&scenario.languages(), self.language) {
            self.language = language;
        }
        self.scenario_id = Some(scenario.id.clone());
        log::info!("memory scenario '{}' selected ({})", id, self.language.name());
        self.rebuild();
        true
    }

    /// Switch language and replay the current step index from scratch.
    ///
    /// The index is clamped when the new program is shorter.
    pub fn set_language(&mut self, language: Language) -> Result<(), SimError> {
        if let Some(scenario) = self.scenario() {
            if scenario.program(language).is_none() {
                return Err(SimError::LanguageNotAvailable {
                    scenario: scenario.id.clone(),
                    language: language.name().to_string(),
                });
            }
        }
        self.language = language;
        self.step_index = self.step_index.min(self.last_step_index());
        self.rebuild();
        Ok(())
    }

    pub fn cycle_scenario(&mut self, forward: bool) {
        let ids: Vec<String> = self
            .catalog
            .memory_scenarios()
            .iter()
            .map(|s| s.id.clone())
            .collect();
        let next = cycle(&ids, self.scenario_id.as_ref(), forward);
        if let Some(id) = next {
            self.select_scenario(&id);
        }
    }

    pub fn cycle_language(&mut self, forward: bool) {
        let Some(scenario) = self.scenario() else {
            return;
        };
        let next = cycle(&scenario.languages(), Some(&self.language), forward);
        if let Some(language) = next {
            // Taken from the scenario's own list, so it is always available
            let _ = self.set_language(language);
        }
    }

    pub fn set_linger_freed(&mut self, linger: bool) {
        self.options.linger_freed = linger;
        self.rebuild();
    }

    // ========== Stepping ==========

    /// Move one step forward. Returns `false` at the last step.
    pub fn advance(&mut self) -> bool {
        if self.step_index >= self.last_step_index() {
            return false;
        }
        self.step_index += 1;
        self.rebuild();
        true
    }

    /// Move one step back. Returns `false` at step 0.
    pub fn retreat(&mut self) -> bool {
        if self.step_index == 0 {
            return false;
        }
        self.step_index -= 1;
        self.rebuild();
        true
    }

    /// Return to step 0 with freshly rebuilt state
    pub fn reset(&mut self) {
        self.step_index = 0;
        self.state = MemoryState::default();
        self.rebuild();
    }

    pub fn jump_to(&mut self, index: usize) {
        self.step_index = index.min(self.last_step_index());
        self.rebuild();
    }

    pub fn jump_to_start(&mut self) {
        self.jump_to(0);
    }

    pub fn jump_to_end(&mut self) {
        self.jump_to(self.last_step_index());
    }

    fn rebuild(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        let steps = self
            .scenario_id
            .as_deref()
            .and_then(|id| catalog.memory_scenario(id))
            .and_then(|s| s.program(self.language))
            .map(|p| p.steps.as_slice())
            .unwrap_or(&[]);
        self.state = reconstruct_with(steps, self.step_index, self.language, self.options);
    }

    // ========== Getters for UI ==========

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    pub fn scenario(&self) -> Option<&MemoryScenario> {
        self.scenario_id
            .as_deref()
            .and_then(|id| self.catalog.memory_scenario(id))
    }

    pub fn program(&self) -> Option<&MemoryProgram> {
        self.scenario().and_then(|s| s.program(self.language))
    }

    pub fn steps(&self) -> &[MemoryStep] {
        self.program().map(|p| p.steps.as_slice()).unwrap_or(&[])
    }

    pub fn current_step(&self) -> Option<&MemoryStep> {
        self.steps().get(self.step_index)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_count(&self) -> usize {
        self.steps().len()
    }

    pub fn last_step_index(&self) -> usize {
        self.step_count().saturating_sub(1)
    }

    pub fn state(&self) -> &MemoryState {
        &self.state
    }

    pub fn options(&self) -> ReplayOptions {
        self.options
    }
}
