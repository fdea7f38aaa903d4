use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use color_snake::config::GameConfig;
use color_snake::game::Game;
use color_snake::input::{GameInput, poll_input};
use color_snake::score::{JsonFileStore, KeyValueStore};
use color_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const LOG_FILE_NAME: &str = "color-snake.log";

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells along each side of the square grid.
    #[arg(long)]
    grid_count: Option<u16>,

    /// Snake speed in cells per second.
    #[arg(long = "speed")]
    moves_per_second: Option<u32>,

    /// Seed for food placement, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// High-score storage file.
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Clear the stored high score before starting.
    #[arg(long)]
    reset_high_score: bool,

    /// Log file; RUST_LOG controls the level.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), color_snake::Error> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path)?;

    let config = resolve_config(&cli)?;
    let store = JsonFileStore::open(cli.scores.clone().unwrap_or_else(JsonFileStore::default_path));
    info!(path = %store.path().display(), "opened score storage");

    let mut game = match cli.seed {
        Some(seed) => Game::new_with_seed(config, store, seed),
        None => Game::new(config, store),
    };
    if cli.reset_high_score {
        game.reset_high_score();
    }
    info!(config = ?game.config(), high_score = game.high_score(), "session ready");

    install_panic_hook();
    let mut session = TerminalSession::enter()?;
    run(&mut game, &mut session)?;

    info!(high_score = game.high_score(), "exiting");
    Ok(())
}

fn run<K: KeyValueStore>(game: &mut Game<K>, session: &mut TerminalSession) -> io::Result<()> {
    let clock = Instant::now();
    let mut last_state = game.state();

    loop {
        game.update(elapsed_ms(clock));

        if game.state() != last_state {
            info!(from = ?last_state, to = ?game.state(), score = game.score(), "state changed");
            last_state = game.state();
        }

        session.draw(&game.snapshot())?;

        if let Some(input) = poll_input(FRAME_INTERVAL, game.state())? {
            if input == GameInput::Quit {
                break;
            }
            game.apply_input(input, elapsed_ms(clock));
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<GameConfig, color_snake::config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(grid_count) = cli.grid_count {
        config.grid_count = grid_count;
    }
    if let Some(moves_per_second) = cli.moves_per_second {
        config.moves_per_second = moves_per_second;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push("color-snake");
    base.push(LOG_FILE_NAME);
    base
}

fn elapsed_ms(clock: Instant) -> u64 {
    u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX)
}
