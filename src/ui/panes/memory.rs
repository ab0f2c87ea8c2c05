//! Heap and stack panes for the memory view
//!
//! Both panes list the blocks of one region from the reconstructed
//! [`MemoryState`], newest allocation last:
//!
//! ```text
//! 0x10000080 | 400 bytes | data               owner: buf
//!   [allocated]  refs: 1  → buf
//! ```
//!
//! Status colors: allocated green, garbage mauve, leaked red, freed grey.

use crate::memory::{BlockKind, BlockStatus, MemoryBlock, MemoryState};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Scroll state for a memory pane
#[derive(Debug, Default)]
pub struct MemoryScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

fn status_style(status: BlockStatus) -> Style {
    match status {
        BlockStatus::Allocated => Style::default().fg(DEFAULT_THEME.success),
        BlockStatus::Garbage => Style::default().fg(DEFAULT_THEME.garbage),
        BlockStatus::Leaked => Style::default()
            .fg(DEFAULT_THEME.error)
            .add_modifier(Modifier::BOLD),
        BlockStatus::Freed => Style::default()
            .fg(DEFAULT_THEME.comment)
            .add_modifier(Modifier::CROSSED_OUT),
    }
}

fn block_items(block: &MemoryBlock, content_width: usize) -> Vec<ListItem<'static>> {
    let left = format!("{} | {} bytes | {}", block.address, block.size, block.id);
    let owner = block
        .owner
        .as_ref()
        .map(|o| format!("owner: {}", o))
        .unwrap_or_default();
    let padding = content_width.saturating_sub(left.chars().count() + owner.len());

    let header = Line::from(vec![
        Span::styled(block.address.clone(), Style::default().fg(DEFAULT_THEME.comment)),
        Span::raw(" | "),
        Span::styled(
            format!("{} bytes", block.size),
            Style::default().fg(DEFAULT_THEME.primary),
        ),
        Span::raw(" | "),
        Span::styled(
            block.id.clone(),
            Style::default()
                .fg(DEFAULT_THEME.fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(padding)),
        Span::styled(owner, Style::default().fg(DEFAULT_THEME.type_name)),
    ]);

    let mut detail = vec![
        Span::raw("  "),
        Span::styled(format!("[{}]", block.status), status_style(block.status)),
    ];
    if let Some(count) = block.ref_count {
        detail.push(Span::styled(
            format!("  refs: {}", count),
            Style::default().fg(DEFAULT_THEME.secondary),
        ));
    }
    if let Some(target) = &block.points_to {
        detail.push(Span::styled(
            format!("  → {}", target),
            Style::default().fg(DEFAULT_THEME.keyword),
        ));
    }

    vec![ListItem::new(header), ListItem::new(Line::from(detail))]
}

/// Render the blocks of one region
pub fn render_region_pane(
    frame: &mut Frame,
    area: Rect,
    state: &MemoryState,
    kind: BlockKind,
    is_focused: bool,
    scroll_state: &mut MemoryScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let title = match kind {
        BlockKind::Heap => format!(" Heap ({} bytes live) ", state.live_bytes(kind)),
        BlockKind::Stack => format!(
            " Stack ({} bytes, scope depth {}) ",
            state.live_bytes(kind),
            state.scope_depth
        ),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let content_width = area.width.saturating_sub(2) as usize;
    let blocks: Vec<&MemoryBlock> = state.blocks.iter().filter(|b| b.kind == kind).collect();

    let mut all_items = Vec::new();
    if blocks.is_empty() {
        all_items.push(
            ListItem::new("(no allocations)").style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    }
    for (i, mem) in blocks.iter().enumerate() {
        all_items.extend(block_items(mem, content_width));
        if i + 1 < blocks.len() {
            all_items.push(ListItem::new(""));
        }
    }

    if kind == BlockKind::Heap && state.leaked_bytes() > 0 {
        all_items.push(ListItem::new(Line::from(Span::styled(
            format!("{} bytes leaked", state.leaked_bytes()),
            Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::BOLD),
        ))));
    }

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Follow new allocations, otherwise keep the user's position
    if total_items > scroll_state.prev_item_count {
        scroll_state.offset = total_items.saturating_sub(visible_height);
    } else {
        let max_scroll = total_items.saturating_sub(visible_height);
        scroll_state.offset = scroll_state.offset.min(max_scroll);
    }
    scroll_state.prev_item_count = total_items;

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
