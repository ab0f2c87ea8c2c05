//! Status bar rendering with keybindings and state indicators

use crate::ui::app::View;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Where the active view is, shown on the left of the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Step { current: usize, total: usize },
    Clock { elapsed_ms: u64, ceiling_ms: u64 },
    Nothing,
}

/// State indicator shown at the far right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Playing,
    Running,
    Start,
    End,
    Done,
    TimedOut,
}

impl Badge {
    fn label(self) -> &'static str {
        match self {
            Badge::Playing => " ▶ PLAYING ",
            Badge::Running => " ▶ RUNNING ",
            Badge::Start => " START ",
            Badge::End => " END ",
            Badge::Done => " DONE ",
            Badge::TimedOut => " TIMED OUT ",
        }
    }

    fn color(self) -> Color {
        match self {
            Badge::Playing | Badge::Running => DEFAULT_THEME.secondary,
            Badge::Start | Badge::Done => DEFAULT_THEME.success,
            Badge::End | Badge::TimedOut => DEFAULT_THEME.error,
        }
    }
}

fn position_text(position: Position) -> String {
    match position {
        Position::Step { total: 0, .. } => " Step 0/0 ".to_string(),
        Position::Step { current, total } => format!(" Step {}/{} ", current + 1, total),
        Position::Clock {
            elapsed_ms,
            ceiling_ms,
        } => format!(" {} / {} ms ", elapsed_ms, ceiling_ms),
        Position::Nothing => " -- ".to_string(),
    }
}

fn keybinds(view: View) -> &'static [(&'static str, &'static str)] {
    match view {
        View::Memory => &[
            ("←/→", "step"),
            ("n/p", "scenario"),
            ("l", "language"),
            ("⎵", "play"),
            ("r", "reset"),
            ("f", "linger"),
            ("⇥", "view"),
            ("q", "quit"),
        ],
        View::Concurrency => &[
            ("n/p", "scenario"),
            ("l", "language"),
            ("⎵", "run"),
            ("r", "reset"),
            ("⇥", "view"),
            ("q", "quit"),
        ],
    }
}

/// Render the status bar at the bottom
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    view: View,
    message: &str,
    position: Position,
    badge: Option<Badge>,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    // Left side: position and message
    let left_spans = vec![
        Span::styled(
            position_text(position),
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds, then the badge
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in keybinds(view).iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }

    if let Some(badge) = badge {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            badge.label(),
            Style::default()
                .bg(badge.color())
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
