use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{backend::CrosstermBackend, Terminal};

use connect_four::config::{AppConfig, UiConfig};
use connect_four::game::{DropResult, EventLog, GameEvent, GameSession};
use connect_four::ui::App;

/// Play Connect Four in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Two-player Connect Four")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect-four.toml")]
    config: PathBuf,

    /// Write log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Play these 0-based columns in order and print the result instead of
    /// starting the interactive UI, e.g. `--moves 3,3,4,2`
    #[arg(long, value_delimiter = ',')]
    moves: Option<Vec<usize>>,

    /// Print a config file with all default values and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    init_logging(&cli, cli.moves.is_none())?;

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.moves {
        Some(moves) => run_scripted(&moves),
        None => run_interactive(config.ui).context("running terminal UI"),
    }
}

/// The UI owns the terminal, so interactive logs only go somewhere when a
/// log file was given.
fn init_logging(cli: &Cli, interactive: bool) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.verbose.log_level_filter());

    match &cli.log_file {
        Some(path) => {
            builder.parse_default_env();
            builder.target(env_logger::Target::Pipe(Box::new(open_log(path)?)));
        }
        None if interactive => {
            builder.filter_level(LevelFilter::Off);
        }
        None => {
            builder.parse_default_env();
        }
    }

    builder.init();
    Ok(())
}

fn open_log(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("creating log file {}", path.display()))
}

fn run_scripted(moves: &[usize]) -> Result<()> {
    let mut session = GameSession::new(EventLog::default());

    for &column in moves {
        match session
            .on_column_selected(column)
            .with_context(|| format!("playing column {column}"))?
        {
            Some(DropResult::ColumnFull) => println!("column {column} is full, move ignored"),
            Some(_) => {}
            None => println!("game is over, column {column} ignored"),
        }
    }

    for event in &session.observer().events {
        match event {
            GameEvent::CellFilled {
                row,
                column,
                player,
            } => println!("{player} -> row {row}, column {column}"),
            GameEvent::GameEnded { message, .. } => println!("{message}"),
        }
    }

    println!();
    println!("{}", session.engine().state().board());
    Ok(())
}

fn run_interactive(config: UiConfig) -> io::Result<()> {
    let mouse = config.mouse;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(config);
    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    if mouse {
        let _ = execute!(terminal.backend_mut(), DisableMouseCapture);
    }
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
