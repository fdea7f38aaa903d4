use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::{GameConfig, Rgb};
use crate::food::Food;
use crate::input::{Direction, GameInput};
use crate::score::{HighScores, KeyValueStore};
use crate::snake::{Position, Snake};

/// Current high-level state of the session.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum GameState {
    Start,
    Countdown,
    Playing,
    Paused,
    GameOver,
}

/// One game session: snake, food, score and the timers that drive them.
///
/// The host calls [`Game::update`] once per frame with a monotonic
/// millisecond clock and forwards input through [`Game::apply_input`].
/// The snake and food are reset in place between rounds.
#[derive(Debug)]
pub struct Game<K> {
    /// Open for test setup only. During a session only the state machine
    /// mutates the snake.
    pub snake: Snake,
    /// Open for test setup only; relocated by the state machine when eaten.
    pub food: Food,
    config: GameConfig,
    state: GameState,
    score: u32,
    high_scores: HighScores<K>,
    high_score: u32,
    new_record: bool,
    last_move_ms: u64,
    countdown_start_ms: u64,
    game_over_start_ms: u64,
    paused_at_ms: u64,
    countdown_remaining: u32,
    game_over_remaining: u32,
    rng: StdRng,
}

impl<K: KeyValueStore> Game<K> {
    /// Creates a session in the start state with an entropy-seeded RNG.
    #[must_use]
    pub fn new(config: GameConfig, store: K) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    /// Creates a deterministic session for tests and reproducible runs.
    #[must_use]
    pub fn new_with_seed(config: GameConfig, store: K, seed: u64) -> Self {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, store: K, mut rng: StdRng) -> Self {
        let snake = Snake::new(config.grid_count);
        let mut food = Food::new(config.grid_count);
        food.generate(&mut rng, &[]);

        let high_scores = HighScores::new(store);
        let high_score = high_scores.get_high_score();

        Self {
            snake,
            food,
            config,
            state: GameState::Start,
            score: 0,
            high_scores,
            high_score,
            new_record: false,
            last_move_ms: 0,
            countdown_start_ms: 0,
            game_over_start_ms: 0,
            paused_at_ms: 0,
            countdown_remaining: 0,
            game_over_remaining: 0,
            rng,
        }
    }

    /// Advances timers and the simulation to `now_ms`.
    pub fn update(&mut self, now_ms: u64) {
        match self.state {
            GameState::Countdown => self.update_countdown(now_ms),
            GameState::Playing => self.update_gameplay(now_ms),
            GameState::GameOver => self.update_game_over(now_ms),
            GameState::Start | GameState::Paused => {}
        }

        self.food.update(now_ms);
    }

    /// Applies one external input event received at `now_ms`.
    pub fn apply_input(&mut self, input: GameInput, now_ms: u64) {
        match input {
            GameInput::Direction(direction) => self.steer(direction),
            GameInput::TogglePause => self.toggle_pause(now_ms),
            GameInput::SkipCountdown => self.skip_countdown(now_ms),
            GameInput::Start => {
                if self.state == GameState::Start {
                    self.start_new_game(now_ms);
                }
            }
            GameInput::Quit => {}
        }
    }

    /// Resets score, snake and food, then begins the countdown.
    pub fn start_new_game(&mut self, now_ms: u64) {
        self.score = 0;
        self.new_record = false;
        self.snake.reset();
        let occupied = self.snake.occupied_positions();
        self.food.regenerate(&mut self.rng, &occupied);

        self.state = GameState::Countdown;
        self.countdown_start_ms = now_ms;
        self.countdown_remaining = self.config.countdown_secs;

        info!(grid_count = self.config.grid_count, "new game");
    }

    /// Ends the countdown early.
    pub fn skip_countdown(&mut self, now_ms: u64) {
        if self.state == GameState::Countdown {
            self.begin_playing(now_ms);
        }
    }

    /// Switches between playing and paused. Time spent paused does not count
    /// toward the next move.
    pub fn toggle_pause(&mut self, now_ms: u64) {
        match self.state {
            GameState::Playing => {
                self.state = GameState::Paused;
                self.paused_at_ms = now_ms;
                debug!("paused");
            }
            GameState::Paused => {
                self.state = GameState::Playing;
                self.last_move_ms += now_ms.saturating_sub(self.paused_at_ms);
                debug!("resumed");
            }
            _ => {}
        }
    }

    /// Clears the persisted high score.
    pub fn reset_high_score(&mut self) {
        self.high_scores.reset_high_score();
        self.high_score = 0;
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// True when the last finished round set a new high score.
    #[must_use]
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    /// Whole seconds left in the countdown, rounded up.
    #[must_use]
    pub fn countdown_remaining(&self) -> u32 {
        self.countdown_remaining
    }

    /// Whole seconds left before the game-over screen returns to start.
    #[must_use]
    pub fn game_over_remaining(&self) -> u32 {
        self.game_over_remaining
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Owned, read-only view of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            score: self.score,
            high_score: self.high_score,
            new_record: self.new_record,
            countdown_remaining: self.countdown_remaining,
            game_over_remaining: self.game_over_remaining,
            grid_count: self.config.grid_count,
            segments: self
                .snake
                .colored_segments()
                .map(|(position, color)| SegmentView { position, color })
                .collect(),
            heading: self.snake.direction(),
            food: FoodView {
                position: self.food.position(),
                pixel_center: self.food.pixel_position(self.config.cell_size_px),
                radius: self.food.radius(),
                color: self.food.color(),
            },
        }
    }

    fn steer(&mut self, direction: Direction) {
        if matches!(self.state, GameState::Countdown | GameState::Playing) {
            self.snake.set_direction(direction);
        }
    }

    fn begin_playing(&mut self, now_ms: u64) {
        self.state = GameState::Playing;
        self.last_move_ms = now_ms;
        self.countdown_remaining = 0;
        debug!("countdown finished");
    }

    fn update_countdown(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.countdown_start_ms);
        let total = self.config.countdown_ms();

        if elapsed >= total {
            self.begin_playing(now_ms);
            return;
        }

        self.countdown_remaining = remaining_secs(total - elapsed);
    }

    fn update_gameplay(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_move_ms) < self.config.move_interval_ms() {
            return;
        }

        if !self.snake.move_forward() {
            self.game_over(now_ms);
            return;
        }

        if self.snake.check_food_collision(self.food.position()) {
            self.score += self.config.points_per_food;
            self.snake.grow();
            let occupied = self.snake.occupied_positions();
            self.food.regenerate(&mut self.rng, &occupied);
        } else {
            self.snake.remove_tail();
        }

        self.last_move_ms = now_ms;
    }

    fn game_over(&mut self, now_ms: u64) {
        self.state = GameState::GameOver;
        self.game_over_start_ms = now_ms;
        self.game_over_remaining = self.config.game_over_secs;

        self.new_record = self.high_scores.set_high_score(self.score);
        if self.new_record {
            self.high_score = self.score;
        }

        info!(
            score = self.score,
            length = self.snake.len(),
            new_record = self.new_record,
            "game over"
        );
    }

    fn update_game_over(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.game_over_start_ms);
        let remaining_ms = self.config.game_over_ms().saturating_sub(elapsed);

        self.game_over_remaining = remaining_secs(remaining_ms);
        if remaining_ms == 0 {
            self.state = GameState::Start;
            debug!("returned to start");
        }
    }
}

fn remaining_secs(remaining_ms: u64) -> u32 {
    u32::try_from(remaining_ms.div_ceil(1000)).unwrap_or(u32::MAX)
}

/// Immutable frame of session state handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub state: GameState,
    pub score: u32,
    pub high_score: u32,
    pub new_record: bool,
    pub countdown_remaining: u32,
    pub game_over_remaining: u32,
    pub grid_count: u16,
    /// Head first.
    pub segments: Vec<SegmentView>,
    pub heading: Direction,
    pub food: FoodView,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentView {
    pub position: Position,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodView {
    pub position: Position,
    pub pixel_center: (f32, f32),
    pub radius: f32,
    pub color: Rgb,
}
