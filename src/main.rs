// runtimelab: memory lifecycle and concurrency model visualizer

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Error};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use runtimelab::constants::DEFAULT_TICK_MS;
use runtimelab::report;
use runtimelab::scenario::{Language, ScenarioCatalog};
use runtimelab::ui::App;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// JSON catalog whose scenarios are added to (or replace) the built-in ones
    #[arg(long)]
    scenarios: Option<PathBuf>,

    #[arg(long, default_value = "runtimelab.log")]
    log_file: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List every scenario and its languages
    List,

    /// Print a headless report instead of starting the TUI
    #[command(subcommand)]
    Report(Report),
}

#[derive(Subcommand)]
enum Report {
    /// Replay a memory scenario and print the resulting blocks
    Memory {
        id: String,

        #[arg(long)]
        language: Option<Language>,

        /// Zero-based step to stop at (default: last step)
        #[arg(long)]
        step: Option<usize>,
    },

    /// Run a concurrency scenario to completion and print its metrics
    Concurrency {
        id: String,

        #[arg(long)]
        language: Option<Language>,

        #[arg(long, default_value_t = DEFAULT_TICK_MS)]
        tick_ms: u64,
    },
}

fn init_logging(path: &Path, level: LevelFilter) -> Result<(), Error> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:<5} {t} - {m}{n}",
        )))
        .build(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(Root::builder().appender("file").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn load_catalog(extra: Option<&Path>) -> Result<ScenarioCatalog, Error> {
    let mut catalog = ScenarioCatalog::builtin();
    if let Some(path) = extra {
        let loaded = ScenarioCatalog::from_path(path)
            .with_context(|| format!("cannot load scenarios from {}", path.display()))?;
        catalog.merge(loaded);
    }
    Ok(catalog)
}

fn run_tui(catalog: ScenarioCatalog) -> Result<(), Error> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(Arc::new(catalog));
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal UI failed")
}

fn main() -> Result<(), Error> {
    let args = Cli::parse();

    init_logging(&args.log_file, args.log_level)?;
    let catalog = load_catalog(args.scenarios.as_deref())?;

    match args.command {
        None => run_tui(catalog),
        Some(Command::List) => {
            println!("{}", report::list_report(&catalog));
            Ok(())
        }
        Some(Command::Report(Report::Memory { id, language, step })) => {
            println!("{}", report::memory_report(&catalog, &id, language, step)?);
            Ok(())
        }
        Some(Command::Report(Report::Concurrency {
            id,
            language,
            tick_ms,
        })) => {
            println!(
                "{}",
                report::concurrency_report(&catalog, &id, language, tick_ms)?
            );
            Ok(())
        }
    }
}
