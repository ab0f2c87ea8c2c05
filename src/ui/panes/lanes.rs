//! Concurrency lanes pane
//!
//! One group per lane, one row per task with a text progress bar:
//!
//! ```text
//! Lane 0
//!   [########----------]  Fetch user      200ms  network  running
//! ```

use crate::scheduler::{ConcurrencySim, Task, TaskStatus};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const BAR_WIDTH: usize = 20;

fn status_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Queued => Style::default().fg(DEFAULT_THEME.comment),
        TaskStatus::Running => Style::default()
            .fg(DEFAULT_THEME.warning)
            .add_modifier(Modifier::BOLD),
        TaskStatus::Blocked => Style::default().fg(DEFAULT_THEME.error),
        TaskStatus::Completed => Style::default().fg(DEFAULT_THEME.success),
    }
}

/// `[#####-----]` for a progress fraction
fn progress_bar(progress: f64) -> String {
    let filled = ((progress * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn task_line(task: &Task, elapsed: u64, name_width: usize) -> Line<'static> {
    let bar_color = if task.def.blocks_event_loop && task.status == TaskStatus::Running {
        DEFAULT_THEME.error
    } else {
        DEFAULT_THEME.primary
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            progress_bar(task.progress(elapsed)),
            Style::default().fg(bar_color),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{:<width$}", task.def.name, width = name_width),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
        Span::styled(
            format!("  {:>5}ms  {:<7}  ", task.duration_ms(), task.def.kind),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::styled(status_text(task), status_style(task.status)),
    ])
}

fn status_text(task: &Task) -> String {
    match (task.status, task.start_time, task.end_time) {
        (TaskStatus::Completed, Some(start), Some(end)) => {
            format!("completed {}..{}ms", start, end)
        }
        (TaskStatus::Running, Some(start), _) => format!("running since {}ms", start),
        (status, _, _) => status.to_string(),
    }
}

pub fn render_lanes_pane(
    frame: &mut Frame,
    area: Rect,
    sim: Option<&ConcurrencySim>,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let Some(sim) = sim else {
        let block = Block::default()
            .title(" Lanes ")
            .borders(Borders::ALL)
            .border_style(border_style);
        let paragraph = Paragraph::new("(no scenario selected)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let block = Block::default()
        .title(format!(" Lanes: {} x {} ", sim.lanes(), sim.model()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let name_width = sim
        .tasks()
        .iter()
        .map(|t| t.def.name.len())
        .max()
        .unwrap_or(0);

    let mut items = Vec::new();
    for lane in 0..sim.lanes() {
        let tasks: Vec<&Task> = sim.tasks().iter().filter(|t| t.lane == lane).collect();
        if tasks.is_empty() {
            continue;
        }
        items.push(ListItem::new(Line::from(Span::styled(
            format!("Lane {}", lane),
            Style::default()
                .fg(DEFAULT_THEME.type_name)
                .add_modifier(Modifier::BOLD),
        ))));
        for task in tasks {
            items.push(ListItem::new(task_line(task, sim.elapsed(), name_width)));
        }
    }

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(1.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(
            progress_bar(0.5),
            format!("[{}{}]", "#".repeat(10), "-".repeat(10))
        );
    }
}
