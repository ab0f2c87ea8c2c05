//! Scenario code pane with syntax highlighting
//!
//! Renders the code of the active scenario for the active language, with the
//! line of the current step highlighted and marked with an arrow.
//!
//! Highlighting is a small word-level tokenizer shared by every language:
//! it only needs to make the snippets readable, not to parse them.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "class", "const", "continue", "def", "defer", "del",
    "delete", "else", "fn", "for", "func", "go", "if", "import", "in", "let", "move", "mut",
    "new", "nil", "None", "null", "NULL", "return", "self", "struct", "throw", "type", "var",
    "void", "while", "with",
];

const TYPES: &[&str] = &[
    "int", "char", "bool", "byte", "i32", "int32", "String", "str", "Vec", "List", "Order",
    "Session", "Widget", "Buffer", "Photo", "Node", "User", "Config", "Image",
];

fn word_style(word: &str, is_call: bool) -> Style {
    if KEYWORDS.contains(&word) {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else if TYPES.contains(&word) {
        Style::default().fg(DEFAULT_THEME.type_name)
    } else if word.chars().all(|c| c.is_ascii_digit()) {
        Style::default().fg(DEFAULT_THEME.number)
    } else if is_call {
        Style::default().fg(DEFAULT_THEME.function)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

fn is_comment_start(rest: &str) -> bool {
    rest.starts_with("//") || rest.starts_with('#')
}

/// Split one line of code into styled spans
fn highlight_line(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut word = String::new();
    let mut chars = line.char_indices();

    while let Some((i, c)) = chars.next() {
        if is_comment_start(&line[i..]) {
            if !word.is_empty() {
                let style = word_style(&word, false);
                spans.push(Span::styled(std::mem::take(&mut word), style));
            }
            spans.push(Span::styled(
                line[i..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return spans;
        }

        if c == '"' {
            if !word.is_empty() {
                let style = word_style(&word, false);
                spans.push(Span::styled(std::mem::take(&mut word), style));
            }
            let mut literal = String::from('"');
            for (_, next) in chars.by_ref() {
                literal.push(next);
                if next == '"' {
                    break;
                }
            }
            spans.push(Span::styled(literal, Style::default().fg(DEFAULT_THEME.string)));
            continue;
        }

        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }

        if !word.is_empty() {
            let style = word_style(&word, c == '(');
            spans.push(Span::styled(std::mem::take(&mut word), style));
        }
        let style = match c {
            '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if !word.is_empty() {
        let style = word_style(&word, false);
        spans.push(Span::styled(word, style));
    }
    spans
}

/// Render the code pane.
///
/// `current_line` is 1-based; `None` means no line is highlighted.
/// `scroll` is kept so the current line stays in view.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    code: &str,
    current_line: Option<u32>,
    is_focused: bool,
    scroll: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    if code.is_empty() {
        let paragraph = Paragraph::new("(no scenario selected)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let source_lines: Vec<&str> = code.lines().collect();
    let gutter = source_lines.len().to_string().len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the current line inside the viewport
    if let Some(line) = current_line {
        let row = (line as usize).saturating_sub(1);
        if row < *scroll {
            *scroll = row;
        } else if row >= *scroll + visible_height {
            *scroll = row + 1 - visible_height;
        }
    }
    *scroll = (*scroll).min(source_lines.len().saturating_sub(visible_height));

    let lines: Vec<Line> = source_lines
        .iter()
        .enumerate()
        .skip(*scroll)
        .take(visible_height)
        .map(|(idx, text)| {
            let is_current = current_line == Some(idx as u32 + 1);
            let marker = if is_current { "→ " } else { "  " };
            let mut spans = vec![
                Span::styled(
                    marker,
                    Style::default()
                        .fg(DEFAULT_THEME.warning)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:>width$} ", idx + 1, width = gutter),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ];
            spans.extend(highlight_line(text));
            let line = Line::from(spans);
            if is_current {
                line.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn highlighting_keeps_text_intact() {
        let line = r#"    let s1 = String::from("hello"); // move"#;
        assert_eq!(text_of(&highlight_line(line)), line);
    }

    #[test]
    fn comment_swallows_rest_of_line() {
        let spans = highlight_line("x = 1 # note");
        assert_eq!(spans.last().map(|s| s.content.as_ref()), Some("# note"));
    }
}
