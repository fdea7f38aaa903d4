use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of cells along each side of the square grid.
pub const DEFAULT_GRID_COUNT: u16 = 30;

/// Default pixel size of one grid cell, used for food pixel coordinates.
pub const DEFAULT_CELL_SIZE_PX: u16 = 20;

/// Default snake speed in cells per second.
pub const DEFAULT_MOVES_PER_SECOND: u32 = 5;

/// Default score granted per food eaten.
pub const DEFAULT_POINTS_PER_FOOD: u32 = 20;

/// Default pre-game countdown length.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

/// Default delay on the game-over screen before returning to start.
pub const DEFAULT_GAME_OVER_SECS: u32 = 5;

/// Smallest grid that still fits the starting snake with room to turn.
pub const MIN_GRID_COUNT: u16 = 8;

/// Number of segments in a freshly reset snake.
pub const INITIAL_SNAKE_LENGTH: usize = 4;

/// Wall-clock interval between food color flips.
pub const FOOD_BLINK_INTERVAL_MS: u64 = 500;

/// Upper bound on random samples when searching for a free food cell.
pub const FOOD_MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Food radius in pixels (15 px diameter).
pub const FOOD_RADIUS_PX: f32 = 7.5;

/// Storage slot holding the persisted high score.
pub const HIGH_SCORE_KEY: &str = "colorfulSnake_highScore";

/// A 24-bit color, kept free of any rendering backend.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Builds a color from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }
}

/// Head color; distinct from every body color.
pub const SNAKE_HEAD_COLOR: Rgb = Rgb::from_hex(0x000000);

/// Body colors cycled from the first segment behind the head.
pub const SNAKE_BODY_COLORS: [Rgb; 7] = [
    Rgb::from_hex(0xff0000),
    Rgb::from_hex(0xff8000),
    Rgb::from_hex(0xffff00),
    Rgb::from_hex(0x00ff00),
    Rgb::from_hex(0x00ffff),
    Rgb::from_hex(0x0080ff),
    Rgb::from_hex(0x8000ff),
];

/// The two food blink colors; index 0 is the initial phase.
pub const FOOD_COLORS: [Rgb; 2] = [Rgb::from_hex(0xff69b4), Rgb::from_hex(0xffffff)];

/// Play-field background.
pub const FIELD_BACKGROUND: Rgb = Rgb::from_hex(0xf0f0f0);

/// Errors raised while loading or validating a [`GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunable gameplay parameters for one session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_count: u16,
    pub cell_size_px: u16,
    pub moves_per_second: u32,
    pub points_per_food: u32,
    pub countdown_secs: u32,
    pub game_over_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_count: DEFAULT_GRID_COUNT,
            cell_size_px: DEFAULT_CELL_SIZE_PX,
            moves_per_second: DEFAULT_MOVES_PER_SECOND,
            points_per_food: DEFAULT_POINTS_PER_FOOD,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            game_over_secs: DEFAULT_GAME_OVER_SECS,
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file. Absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_count < MIN_GRID_COUNT {
            return Err(ConfigError::Invalid(format!(
                "grid_count must be at least {MIN_GRID_COUNT}, got {}",
                self.grid_count
            )));
        }

        if self.moves_per_second == 0 {
            return Err(ConfigError::Invalid(
                "moves_per_second must be greater than zero".to_owned(),
            ));
        }

        if self.cell_size_px == 0 {
            return Err(ConfigError::Invalid(
                "cell_size_px must be greater than zero".to_owned(),
            ));
        }

        Ok(())
    }

    /// Milliseconds between committed snake moves.
    #[must_use]
    pub fn move_interval_ms(&self) -> u64 {
        1000 / u64::from(self.moves_per_second.max(1))
    }

    #[must_use]
    pub fn countdown_ms(&self) -> u64 {
        u64::from(self.countdown_secs) * 1000
    }

    #[must_use]
    pub fn game_over_ms(&self) -> u64 {
        u64::from(self.game_over_secs) * 1000
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{ConfigError, GameConfig, Rgb};

    #[test]
    fn default_move_interval_is_200ms() {
        assert_eq!(GameConfig::default().move_interval_ms(), 200);
    }

    #[test]
    fn rgb_unpacks_hex_channels() {
        assert_eq!(Rgb::from_hex(0xff69b4), Rgb { r: 0xff, g: 0x69, b: 0xb4 });
        assert_eq!(Rgb::from_hex(0x0080ff), Rgb { r: 0, g: 0x80, b: 0xff });
    }

    #[test]
    fn validate_rejects_tiny_grid_and_zero_speed() {
        let tiny = GameConfig {
            grid_count: 4,
            ..GameConfig::default()
        };
        assert!(matches!(tiny.validate(), Err(ConfigError::Invalid(_))));

        let frozen = GameConfig {
            moves_per_second: 0,
            ..GameConfig::default()
        };
        assert!(matches!(frozen.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let path = unique_test_path("partial");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, r#"{ "grid_count": 40, "moves_per_second": 8 }"#)
            .expect("test file write should succeed");

        let config = GameConfig::load(&path).expect("partial config should load");

        assert_eq!(config.grid_count, 40);
        assert_eq!(config.moves_per_second, 8);
        assert_eq!(config.points_per_food, 20);
        assert_eq!(config.move_interval_ms(), 125);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_reports_malformed_json() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "grid_count = 40").expect("test file write should succeed");

        assert!(matches!(
            GameConfig::load(&path),
            Err(ConfigError::Parse(_))
        ));

        let _ = fs::remove_file(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("color-snake-config-tests")
            .join(format!("{label}-{nanos}.json"))
    }
}
