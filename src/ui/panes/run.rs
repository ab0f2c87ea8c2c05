//! Run summary pane: phase, clock, task counts and final metrics

use crate::navigation::ConcurrencyExplorer;
use crate::scheduler::{RunPhase, TaskStatus};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn phase_label(phase: RunPhase) -> (&'static str, Style) {
    match phase {
        RunPhase::Idle => ("idle", Style::default().fg(DEFAULT_THEME.comment)),
        RunPhase::Running => ("running", Style::default().fg(DEFAULT_THEME.warning)),
        RunPhase::Stopped => ("stopped", Style::default().fg(DEFAULT_THEME.secondary)),
        RunPhase::Finished => ("finished", Style::default().fg(DEFAULT_THEME.success)),
        RunPhase::TimedOut => ("timed out", Style::default().fg(DEFAULT_THEME.error)),
    }
}

fn field(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", name), Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(value, Style::default().fg(DEFAULT_THEME.fg)),
    ])
}

pub fn render_run_pane(
    frame: &mut Frame,
    area: Rect,
    explorer: &ConcurrencyExplorer,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    let block = Block::default()
        .title(" Run ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut lines = Vec::new();

    if let Some(imp) = explorer.implementation() {
        lines.push(Line::from(Span::styled(
            imp.description.clone(),
            Style::default().fg(DEFAULT_THEME.fg),
        )));
        lines.push(Line::from(""));
    }

    if let Some(sim) = explorer.sim() {
        let (label, style) = phase_label(sim.phase());
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", "phase"), Style::default().fg(DEFAULT_THEME.comment)),
            Span::styled(label, style.add_modifier(Modifier::BOLD)),
        ]));
        lines.push(field("clock", format!("{} ms", sim.elapsed())));
        lines.push(field(
            "tasks",
            format!(
                "{} queued, {} running, {} done",
                sim.count(TaskStatus::Queued),
                sim.count(TaskStatus::Running),
                sim.count(TaskStatus::Completed)
            ),
        ));

        if sim.is_event_loop_blocked() {
            lines.push(Line::from(Span::styled(
                "EVENT LOOP BLOCKED",
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD),
            )));
        }

        if let Some(metrics) = sim.metrics() {
            lines.push(Line::from(""));
            lines.push(field("total time", format!("{} ms", metrics.total_time)));
            lines.push(field("efficiency", format!("{}%", metrics.efficiency)));
            lines.push(field("memory", metrics.memory_overhead.to_string()));
            if metrics.completed < metrics.total {
                lines.push(field(
                    "unfinished",
                    format!("{} of {}", metrics.total - metrics.completed, metrics.total),
                ));
            }
        } else if sim.phase() == RunPhase::Finished {
            lines.push(field("metrics", "none (no tasks)".to_string()));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "(no scenario selected)",
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
