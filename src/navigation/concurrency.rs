//! Navigation over concurrency scenarios

use super::{cycle, pick_language};
use crate::error::SimError;
use crate::scenario::{ConcurrencyImpl, ConcurrencyScenario, Language, ScenarioCatalog};
use crate::scheduler::{Clock, ConcurrencySim, TickOutcome};
use std::sync::Arc;

/// Active concurrency scenario and language, and the run built from them.
///
/// Changing either one discards the current run and builds a fresh one in the
/// `Idle` phase.
#[derive(Debug, Clone)]
pub struct ConcurrencyExplorer {
    catalog: Arc<ScenarioCatalog>,
    scenario_id: Option<String>,
    language: Language,
    sim: Option<ConcurrencySim>,
}

impl ConcurrencyExplorer {
    pub fn new(catalog: Arc<ScenarioCatalog>) -> Self {
        ConcurrencyExplorer {
            catalog,
            scenario_id: None,
            language: Language::JavaScript,
            sim: None,
        }
    }

    /// Make `id` the active scenario. Unknown ids clear the selection.
    pub fn select_scenario(&mut self, id: &str) -> bool {
        let Some(scenario) = self.catalog.concurrency_scenario(id) else {
            log::info!("concurrency scenario '{}' not found, selection cleared", id);
            self.scenario_id = None;
            self.sim = None;
            return false;
        };
        if let Some(language) = pick_language(&scenario.languages(), self.language) {
            self.language = language;
        }
        self.scenario_id = Some(scenario.id.clone());
        log::info!(
            "concurrency scenario '{}' selected ({})",
            id,
            self.language.name()
        );
        self.rebuild();
        true
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), SimError> {
        if let Some(scenario) = self.scenario() {
            if scenario.implementation(language).is_none() {
                return Err(SimError::LanguageNotAvailable {
                    scenario: scenario.id.clone(),
                    language: language.name().to_string(),
                });
            }
        }
        self.language = language;
        self.rebuild();
        Ok(())
    }

    pub fn cycle_scenario(&mut self, forward: bool) {
        let ids: Vec<String> = self
            .catalog
            .concurrency_scenarios()
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

    fn rebuild(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        self.sim = self
            .scenario_id
            .as_deref()
            .and_then(|id| catalog.concurrency_scenario(id))
            .and_then(|scenario| {
                scenario
                    .implementation(self.language)
                    .map(|imp| ConcurrencySim::for_impl(&scenario.tasks, imp))
            });
    }

    // ========== Run control ==========

    pub fn start<C: Clock + ?Sized>(&mut self, clock: &C) {
        if let Some(sim) = self.sim.as_mut() {
            sim.start(clock);
        }
    }

    pub fn stop<C: Clock + ?Sized>(&mut self, clock: &C) {
        if let Some(sim) = self.sim.as_mut() {
            sim.stop(clock);
        }
    }

    /// Start when idle or stopped, stop when running
    pub fn toggle<C: Clock + ?Sized>(&mut self, clock: &C) {
        if self.is_running() {
            self.stop(clock);
        } else {
            self.start(clock);
        }
    }

    pub fn reset(&mut self) {
        if let Some(sim) = self.sim.as_mut() {
            sim.reset();
        }
    }

    pub fn tick<C: Clock + ?Sized>(&mut self, clock: &C) -> TickOutcome {
        match self.sim.as_mut() {
            Some(sim) => sim.tick(clock),
            None => TickOutcome::Inactive,
        }
    }

    // ========== Getters for UI ==========

    pub fn scenario(&self) -> Option<&ConcurrencyScenario> {
        self.scenario_id
            .as_deref()
            .and_then(|id| self.catalog.concurrency_scenario(id))
    }

    pub fn implementation(&self) -> Option<&ConcurrencyImpl> {
        self.scenario()
            .and_then(|s| s.implementation(self.language))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn sim(&self) -> Option<&ConcurrencySim> {
        self.sim.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.sim.as_ref().is_some_and(ConcurrencySim::is_running)
    }
}
