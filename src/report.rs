//! Plain-text reports for running the simulators without the TUI

use crate::error::SimError;
use crate::memory::reconstruct;
use crate::scenario::{Language, ScenarioCatalog};
use crate::scheduler::ConcurrencySim;

fn resolve_language(
    scenario: &str,
    available: &[Language],
    requested: Option<Language>,
) -> Result<Language, SimError> {
    match requested {
        Some(language) if available.contains(&language) => Ok(language),
        Some(language) => Err(SimError::LanguageNotAvailable {
            scenario: scenario.to_string(),
            language: language.name().to_string(),
        }),
        None => available
            .first()
            .copied()
            .ok_or_else(|| SimError::UnknownScenario {
                id: scenario.to_string(),
            }),
    }
}

/// Every scenario id with its languages
pub fn list_report(catalog: &ScenarioCatalog) -> String {
    let mut lines = vec!["Memory scenarios:".to_string()];
    for scenario in catalog.memory_scenarios() {
        let languages: Vec<&str> = scenario.languages().iter().map(|l| l.name()).collect();
        lines.push(format!(
            "  {:<24} {} [{}]",
            scenario.id,
            scenario.title,
            languages.join(", ")
        ));
    }
    lines.push(String::new());
    lines.push("Concurrency scenarios:".to_string());
    for scenario in catalog.concurrency_scenarios() {
        let models: Vec<String> = scenario
            .implementations
            .iter()
            .map(|(lang, imp)| format!("{}={}", lang.name(), imp.model))
            .collect();
        lines.push(format!(
            "  {:<24} {} [{}]",
            scenario.id,
            scenario.title,
            models.join(", ")
        ));
    }
    lines.join("\n")
}

/// Replay a memory scenario up to `step` (default: the last step) and describe
/// the steps taken and the resulting blocks
pub fn memory_report(
    catalog: &ScenarioCatalog,
    id: &str,
    language: Option<Language>,
    step: Option<usize>,
) -> Result<String, SimError> {
    let scenario = catalog.require_memory(id)?;
    let language = resolve_language(id, &scenario.languages(), language)?;
    let steps = scenario
        .program(language)
        .map(|p| p.steps.as_slice())
        .unwrap_or(&[]);
    let target = step.unwrap_or(steps.len().saturating_sub(1));
    let state = reconstruct(steps, target, language);

    let mut lines = vec![format!(
        "{} ({}, {})",
        scenario.title,
        language.display_name(),
        language.memory_strategy()
    )];

    let shown = state.step_index.map_or(0, |i| i + 1);
    lines.push(format!("Steps 1..{} of {}:", shown, steps.len()));
    for (i, s) in steps.iter().take(shown).enumerate() {
        lines.push(format!(
            "  {:>2}. line {:>3}  {:<20} {}",
            i + 1,
            s.line_number,
            s.action.name(),
            s.label.as_deref().or(s.block_id.as_deref()).unwrap_or("")
        ));
    }

    lines.push(String::new());
    if state.is_empty() {
        lines.push("No live blocks".to_string());
    }
    for block in &state.blocks {
        let mut line = format!(
            "  {} {:<5} {:>6} bytes  {:<16} {}",
            block.address, block.kind, block.size, block.id, block.status
        );
        if let Some(owner) = &block.owner {
            line.push_str(&format!("  owner={}", owner));
        }
        if let Some(count) = block.ref_count {
            line.push_str(&format!("  refs={}", count));
        }
        if let Some(target) = &block.points_to {
            line.push_str(&format!("  -> {}", target));
        }
        lines.push(line);
    }
    if state.leaked_bytes() > 0 {
        lines.push(format!("Leaked: {} bytes", state.leaked_bytes()));
    }
    Ok(lines.join("\n"))
}

/// Run a concurrency scenario to completion on a simulated clock and describe
/// each task's lane and timing plus the run metrics
pub fn concurrency_report(
    catalog: &ScenarioCatalog,
    id: &str,
    language: Option<Language>,
    tick_ms: u64,
) -> Result<String, SimError> {
    let scenario = catalog.require_concurrency(id)?;
    let language = resolve_language(id, &scenario.languages(), language)?;
    let implementation =
        scenario
            .implementation(language)
            .ok_or_else(|| SimError::LanguageNotAvailable {
                scenario: id.to_string(),
                language: language.name().to_string(),
            })?;

    let mut sim = ConcurrencySim::for_impl(&scenario.tasks, implementation);
    sim.run_to_completion(tick_ms);

    let mut lines = vec![
        format!(
            "{} ({}, {} on {} lane(s))",
            scenario.title,
            language.display_name(),
            sim.model(),
            sim.lanes()
        ),
        String::new(),
    ];
    for task in sim.tasks() {
        let window = match (task.start_time, task.end_time) {
            (Some(start), Some(end)) => format!("{:>6}..{:<6}", start, end),
            (Some(start), None) => format!("{:>6}..{:<6}", start, "?"),
            _ => format!("{:>15}", "-"),
        };
        lines.push(format!(
            "  lane {}  {}  {:<20} {:>5}ms  {:<7} {}",
            task.lane,
            window,
            task.def.name,
            task.duration_ms(),
            task.def.kind,
            task.status
        ));
    }

    lines.push(String::new());
    match sim.metrics() {
        Some(m) => {
            lines.push(format!("Total time:      {} ms", m.total_time));
            lines.push(format!("Efficiency:      {}%", m.efficiency));
            lines.push(format!("Memory overhead: {}", m.memory_overhead));
            lines.push(format!("Completed:       {}/{}", m.completed, m.total));
        }
        None => lines.push("No tasks, no metrics".to_string()),
    }
    Ok(lines.join("\n"))
}
