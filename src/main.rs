mod app;
mod event;
mod ui;

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use rustgalaga::scores::HighScores;
use rustgalaga::{GameConfig, GameType};

use app::App;
use event::{Event, EventHandler};

#[derive(Parser, Debug)]
#[command(name = "rustgalaga", version, about = "Galaga in your terminal")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Level to start on (1-3)
    #[arg(short, long)]
    level: Option<u32>,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Use the holiday theme
    #[arg(long)]
    holiday: bool,

    /// Starting lives
    #[arg(long)]
    lives: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = load_config(&cli)?;
    tracing::info!(
        game_type = %config.game_type,
        level = config.starting_level,
        "starting rustgalaga"
    );
    let high_scores = HighScores::load_default();
    let tick_ms = config.timing.master_tick_ms;

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(config, high_scores);
    let result = run(&mut terminal, &mut app, tick_ms);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "exiting after error");
    }
    result
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_ms: u64,
) -> Result<()> {
    let event_handler = EventHandler::new(tick_ms);
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        match event_handler.next().context("event channel closed")? {
            Event::Tick(ms) => app.on_tick(ms),
            Event::Key(key) => app.on_key(key),
            Event::Resize => terminal.autoresize()?,
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match cli.config.as_ref().cloned().or_else(GameConfig::default_path) {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(level) = cli.level {
        config.starting_level = level;
    }
    if let Some(lives) = cli.lives {
        config.lives = lives;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.holiday {
        config.game_type = GameType::Holiday.as_str().to_string();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Log to a file; the terminal belongs to the game.
fn init_logging() -> Result<()> {
    let dir = GameConfig::data_dir();
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("rustgalaga.log");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rustgalaga=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
