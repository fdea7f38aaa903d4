use rand::Rng;
use tracing::{debug, warn};

use crate::config::{
    FOOD_BLINK_INTERVAL_MS, FOOD_COLORS, FOOD_MAX_PLACEMENT_ATTEMPTS, FOOD_RADIUS_PX, Rgb,
};
use crate::snake::Position;

/// Outcome of a food placement search.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Placement {
    /// A cell outside the occupied set was found.
    Free,
    /// The attempt bound ran out; the last sample was kept and may overlap.
    Exhausted,
}

/// The single food item on the board and its two-color blink.
#[derive(Debug, Clone)]
pub struct Food {
    position: Position,
    grid_count: u16,
    color_index: usize,
    last_color_change_ms: u64,
}

impl Food {
    /// Creates food on a `grid_count` grid at the origin; call
    /// [`Food::regenerate`] before play.
    #[must_use]
    pub fn new(grid_count: u16) -> Self {
        Self::at(Position::new(0, 0), grid_count)
    }

    /// Creates food at a fixed cell.
    #[must_use]
    pub fn at(position: Position, grid_count: u16) -> Self {
        Self {
            position,
            grid_count,
            color_index: 0,
            last_color_change_ms: 0,
        }
    }

    /// Samples uniform random cells until one is not in `occupied`.
    ///
    /// After [`FOOD_MAX_PLACEMENT_ATTEMPTS`] samples the last candidate is
    /// kept even if occupied.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, occupied: &[Position]) -> Placement {
        let upper = i32::from(self.grid_count);

        for _ in 0..FOOD_MAX_PLACEMENT_ATTEMPTS {
            self.position = Position::new(rng.gen_range(0..upper), rng.gen_range(0..upper));
            if !occupied.contains(&self.position) {
                debug!(x = self.position.x, y = self.position.y, "food placed");
                return Placement::Free;
            }
        }

        warn!(
            x = self.position.x,
            y = self.position.y,
            attempts = FOOD_MAX_PLACEMENT_ATTEMPTS,
            "food placement search exhausted, keeping last candidate"
        );
        Placement::Exhausted
    }

    /// Relocates the food and restarts the blink at the first color.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R, occupied: &[Position]) -> Placement {
        let placement = self.generate(rng, occupied);
        self.color_index = 0;
        self.last_color_change_ms = 0;
        placement
    }

    /// Flips the blink color once at least the blink interval has passed.
    pub fn update(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_color_change_ms) >= FOOD_BLINK_INTERVAL_MS {
            self.color_index = (self.color_index + 1) % FOOD_COLORS.len();
            self.last_color_change_ms = now_ms;
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        FOOD_COLORS[self.color_index]
    }

    #[must_use]
    pub fn radius(&self) -> f32 {
        FOOD_RADIUS_PX
    }

    /// Pixel center of the food cell for a given cell size.
    #[must_use]
    pub fn pixel_position(&self, cell_size_px: u16) -> (f32, f32) {
        let cell = f32::from(cell_size_px);
        (
            self.position.x as f32 * cell + cell / 2.0,
            self.position.y as f32 * cell + cell / 2.0,
        )
    }
}
