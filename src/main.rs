//! minertui — Jewel Miner, a timed match-3 puzzle in the terminal.

mod app;
mod input;
mod scene;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use minertui::{DEFAULT_STREAK_MIN, EngineConfig};

/// Options derived from CLI that shape the board, the engine rules and the clock.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub columns: usize,
    pub rows: usize,
    pub time_limit: u32,
    pub engine: EngineConfig,
    pub no_animation: bool,
    pub frame_rate: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        let file = std::fs::File::create(path)?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig {
        columns: args.columns.max(2),
        rows: args.rows.max(2),
        time_limit: args.time_limit,
        engine: EngineConfig {
            row_streak_min: args.row_streak,
            col_streak_min: args.col_streak,
            seed: args.seed,
        },
        no_animation: args.no_animation,
        frame_rate: args.frame_rate,
    };
    log::info!("starting with {:?}", config);
    let mut app = App::new(config, theme)?;
    app.run()?;
    Ok(())
}

/// Jewel Miner in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "minertui",
    version,
    about = "Jewel Miner: swap neighbouring jewels to line up three or more of a colour before time runs out.",
    long_about = "minertui is a terminal match-3 puzzle.\n\n\
        Swap two neighbouring jewels. A swap that lines up at least three jewels of one colour \
        (in a row or a column) is kept; the streak explodes, the jewels above fall and new \
        ones drop in from the top. Any other swap is undone. Every jewel that drops in after \
        a match scores 10 points.\n\n\
        CONTROLS:\n  Arrows / hjkl  Move cursor    Space / Enter  Select, then swap\n  \
        X / Backspace  Cancel         P  Pause    N / R  New game (after time up)\n  Q / Esc  Quit\n\n\
        The mouse selects jewels too. Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Board width in jewels.
    #[arg(long, default_value = "8", value_name = "COLS")]
    pub columns: usize,

    /// Board height in jewels.
    #[arg(long, default_value = "8", value_name = "ROWS")]
    pub rows: usize,

    /// Time limit in seconds; the clock starts once the first board has settled.
    #[arg(long, default_value = "60", value_name = "SECS")]
    pub time_limit: u32,

    /// Shortest horizontal streak that counts as a match.
    #[arg(long, default_value_t = DEFAULT_STREAK_MIN, value_name = "N")]
    pub row_streak: usize,

    /// Shortest vertical streak that counts as a match.
    #[arg(long, default_value_t = DEFAULT_STREAK_MIN, value_name = "N")]
    pub col_streak: usize,

    /// Seed for reproducible boards.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable animations (swaps, falls and explosions land at once).
    #[arg(long)]
    pub no_animation: bool,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Write logs to this file (RUST_LOG sets the filter, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
