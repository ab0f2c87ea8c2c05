//! Main TUI application state and logic

use super::panes::{
    render_lanes_pane, render_region_pane, render_run_pane, render_source_pane,
    render_status_bar, Badge, MemoryScrollState, Position,
};
use crate::constants::{FRAME_POLL_MS, PLAY_INTERVAL_MS};
use crate::memory::BlockKind;
use crate::navigation::{ConcurrencyExplorer, MemoryExplorer};
use crate::scenario::ScenarioCatalog;
use crate::scheduler::{RunPhase, TickOutcome, WallClock};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which visualizer is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Memory,
    Concurrency,
}

impl View {
    pub fn toggle(self) -> Self {
        match self {
            View::Memory => View::Concurrency,
            View::Concurrency => View::Memory,
        }
    }
}

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Stack,
    Heap,
    Lanes,
    Run,
}

impl FocusedPane {
    /// Move focus to the next pane of `view`
    pub fn next(self, view: View) -> Self {
        match (view, self) {
            (View::Memory, FocusedPane::Source) => FocusedPane::Stack,
            (View::Memory, FocusedPane::Stack) => FocusedPane::Heap,
            (View::Memory, _) => FocusedPane::Source,
            (View::Concurrency, FocusedPane::Source) => FocusedPane::Lanes,
            (View::Concurrency, FocusedPane::Lanes) => FocusedPane::Run,
            (View::Concurrency, _) => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    pub memory: MemoryExplorer,
    pub concurrency: ConcurrencyExplorer,
    clock: WallClock,

    pub view: View,
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub stack_scroll: MemoryScrollState,
    pub heap_scroll: MemoryScrollState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether memory auto-play is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,
}

impl App {
    /// Create the app with the first scenario of each kind selected
    pub fn new(catalog: Arc<ScenarioCatalog>) -> Self {
        let mut memory = MemoryExplorer::new(Arc::clone(&catalog));
        let mut concurrency = ConcurrencyExplorer::new(Arc::clone(&catalog));
        if let Some(first) = catalog.memory_scenarios().first() {
            memory.select_scenario(&first.id);
        }
        if let Some(first) = catalog.concurrency_scenarios().first() {
            concurrency.select_scenario(&first.id);
        }

        App {
            memory,
            concurrency,
            clock: WallClock::new(),
            view: View::Memory,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            stack_scroll: MemoryScrollState::default(),
            heap_scroll: MemoryScrollState::default(),
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            let play_due =
                self.last_play_time.elapsed() >= Duration::from_millis(PLAY_INTERVAL_MS);
            if self.is_playing && play_due {
                if self.memory.advance() {
                    self.status_message = self.step_caption();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // The concurrency run keeps going even while its view is hidden
            match self.concurrency.tick(&self.clock) {
                TickOutcome::Finished => {
                    let metrics = self.concurrency.sim().and_then(|s| s.metrics());
                    self.status_message = match metrics {
                        Some(m) => format!(
                            "Finished in {} ms, {}% efficient",
                            m.total_time, m.efficiency
                        ),
                        None => "Finished".to_string(),
                    };
                }
                TickOutcome::TimedOut => {
                    self.status_message = "Run hit the time ceiling".to_string();
                }
                TickOutcome::Continue | TickOutcome::Inactive => {}
            }

            if event::poll(Duration::from_millis(FRAME_POLL_MS))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        match self.view {
            View::Memory => self.render_memory(frame, main_chunks[0]),
            View::Concurrency => self.render_concurrency(frame, main_chunks[0]),
        }

        let (position, badge) = self.status_position();
        render_status_bar(
            frame,
            main_chunks[1],
            self.view,
            &self.status_message,
            position,
            badge,
        );
    }

    fn render_memory(&mut self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        // Right column: Stack (top) | Heap (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(columns[1]);

        let title = match (self.memory.scenario(), self.memory.current_step()) {
            (Some(s), Some(step)) => format!(
                "{} [{}] · {}",
                s.title,
                self.memory.language().display_name(),
                step.label.as_deref().unwrap_or(step.action.name())
            ),
            (Some(s), None) => {
                format!("{} [{}]", s.title, self.memory.language().display_name())
            }
            (None, _) => "Memory".to_string(),
        };
        let code = self.memory.program().map(|p| p.code.as_str()).unwrap_or("");

        render_source_pane(
            frame,
            columns[0],
            &title,
            code,
            self.memory.state().line_number,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        render_region_pane(
            frame,
            right_rows[0],
            self.memory.state(),
            BlockKind::Stack,
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        render_region_pane(
            frame,
            right_rows[1],
            self.memory.state(),
            BlockKind::Heap,
            self.focused_pane == FocusedPane::Heap,
            &mut self.heap_scroll,
        );
    }

    fn render_concurrency(&mut self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        // Right column: Lanes (top) | Run (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        let title = match self.concurrency.scenario() {
            Some(s) => format!(
                "{} [{}]",
                s.title,
                self.concurrency.language().display_name()
            ),
            None => "Concurrency".to_string(),
        };
        let code = self
            .concurrency
            .implementation()
            .map(|i| i.code.as_str())
            .unwrap_or("");

        render_source_pane(
            frame,
            columns[0],
            &title,
            code,
            None,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        render_lanes_pane(
            frame,
            right_rows[0],
            self.concurrency.sim(),
            self.focused_pane == FocusedPane::Lanes,
        );

        render_run_pane(
            frame,
            right_rows[1],
            &self.concurrency,
            self.focused_pane == FocusedPane::Run,
        );
    }

    fn status_position(&self) -> (Position, Option<Badge>) {
        match self.view {
            View::Memory => {
                let total = self.memory.step_count();
                let current = self.memory.step_index();
                let badge = if total == 0 {
                    None
                } else if self.is_playing {
                    Some(Badge::Playing)
                } else if current + 1 >= total {
                    Some(Badge::End)
                } else if current == 0 {
                    Some(Badge::Start)
                } else {
                    None
                };
                (Position::Step { current, total }, badge)
            }
            View::Concurrency => match self.concurrency.sim() {
                Some(sim) => {
                    let badge = match sim.phase() {
                        RunPhase::Running => Some(Badge::Running),
                        RunPhase::Finished => Some(Badge::Done),
                        RunPhase::TimedOut => Some(Badge::TimedOut),
                        RunPhase::Idle | RunPhase::Stopped => None,
                    };
                    (
                        Position::Clock {
                            elapsed_ms: sim.elapsed(),
                            ceiling_ms: sim.ceiling_ms(),
                        },
                        badge,
                    )
                }
                None => (Position::Nothing, None),
            },
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.view = self.view.toggle();
                self.focused_pane = FocusedPane::Source;
                self.source_scroll = 0;
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.next(self.view);
            }
            KeyCode::Up => self.scroll(-1),
            KeyCode::Down => self.scroll(1),
            _ => match self.view {
                View::Memory => self.handle_memory_key(key),
                View::Concurrency => self.handle_concurrency_key(key),
            },
        }
    }

    fn handle_memory_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => {
                self.is_playing = false;
                self.status_message = if self.memory.retreat() {
                    self.step_caption()
                } else {
                    "Already at the first step".to_string()
                };
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.status_message = if self.memory.advance() {
                    self.step_caption()
                } else {
                    "Already at the last step".to_string()
                };
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.memory.jump_to_end();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.memory.jump_to_start();
                self.status_message = "Jumped to start".to_string();
            }
            KeyCode::Char('r') => {
                self.is_playing = false;
                self.memory.reset();
                self.status_message = "Reset".to_string();
            }
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    self.last_play_time = Instant::now();
                    self.status_message = "Playing...".to_string();
                } else {
                    self.status_message = "Paused".to_string();
                }
            }
            KeyCode::Char('n') | KeyCode::Char('p') => {
                self.is_playing = false;
                self.memory.cycle_scenario(key.code == KeyCode::Char('n'));
                self.after_memory_selection();
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.memory.cycle_language(key.code == KeyCode::Char('l'));
                self.after_memory_selection();
            }
            KeyCode::Char('f') => {
                let linger = !self.memory.options().linger_freed;
                self.memory.set_linger_freed(linger);
                self.status_message = if linger {
                    "Freed blocks linger for one step".to_string()
                } else {
                    "Freed blocks vanish immediately".to_string()
                };
            }
            _ => {}
        }
    }

    fn handle_concurrency_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') => {
                let ended = self
                    .concurrency
                    .sim()
                    .is_some_and(|s| s.phase().is_terminal());
                if ended {
                    self.status_message = "Run ended, press r to reset".to_string();
                    return;
                }
                self.concurrency.toggle(&self.clock);
                self.status_message = if self.concurrency.is_running() {
                    "Running...".to_string()
                } else {
                    "Stopped".to_string()
                };
            }
            KeyCode::Char('r') => {
                self.concurrency.reset();
                self.status_message = "Reset".to_string();
            }
            KeyCode::Char('n') | KeyCode::Char('p') => {
                self.concurrency.cycle_scenario(key.code == KeyCode::Char('n'));
                self.after_concurrency_selection();
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.concurrency.cycle_language(key.code == KeyCode::Char('l'));
                self.after_concurrency_selection();
            }
            _ => {}
        }
    }

    /// Label of the current step, or its action and block
    fn step_caption(&self) -> String {
        match self.memory.current_step() {
            Some(step) => match (&step.label, &step.block_id) {
                (Some(label), _) => label.clone(),
                (None, Some(id)) => format!("{} {}", step.action.name(), id),
                (None, None) => step.action.name().to_string(),
            },
            None => String::new(),
        }
    }

    fn after_memory_selection(&mut self) {
        self.source_scroll = 0;
        self.stack_scroll = MemoryScrollState::default();
        self.heap_scroll = MemoryScrollState::default();
        self.status_message = match self.memory.scenario() {
            Some(s) => format!("{} in {}", s.title, self.memory.language().display_name()),
            None => "No scenario".to_string(),
        };
    }

    fn after_concurrency_selection(&mut self) {
        self.source_scroll = 0;
        let selected = (
            self.concurrency.scenario(),
            self.concurrency.implementation(),
        );
        self.status_message = match selected {
            (Some(s), Some(imp)) => format!(
                "{} in {} ({})",
                s.title,
                self.concurrency.language().display_name(),
                imp.model
            ),
            _ => "No scenario".to_string(),
        };
    }

    fn scroll(&mut self, delta: isize) {
        let offset = match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Stack => &mut self.stack_scroll.offset,
            FocusedPane::Heap => &mut self.heap_scroll.offset,
            FocusedPane::Lanes | FocusedPane::Run => return,
        };
        *offset = offset.saturating_add_signed(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycles_within_view() {
        let mut focus = FocusedPane::Source;
        for _ in 0..3 {
            focus = focus.next(View::Memory);
        }
        assert_eq!(focus, FocusedPane::Source);
        assert_eq!(FocusedPane::Source.next(View::Concurrency), FocusedPane::Lanes);
        assert_eq!(FocusedPane::Run.next(View::Concurrency), FocusedPane::Source);
    }

    #[test]
    fn app_starts_on_first_scenarios() {
        let app = App::new(Arc::new(ScenarioCatalog::builtin()));
        assert!(app.memory.scenario().is_some());
        assert!(app.concurrency.sim().is_some());
        assert_eq!(app.memory.step_index(), 0);
    }
}
