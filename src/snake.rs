use std::collections::VecDeque;

use crate::config::{INITIAL_SNAKE_LENGTH, Rgb, SNAKE_BODY_COLORS, SNAKE_HEAD_COLOR};
use crate::input::Direction;

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside a `grid_count` square grid.
    #[must_use]
    pub fn is_within_bounds(self, grid_count: u16) -> bool {
        let upper = i32::from(grid_count);
        self.x >= 0 && self.y >= 0 && self.x < upper && self.y < upper
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body, heading and the pending turn requested by input.
///
/// Movement is split into [`Snake::move_forward`], which only adds a head,
/// and [`Snake::remove_tail`]. Skipping the tail removal is what grows the
/// snake.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Direction,
    grid_count: u16,
}

impl Snake {
    /// Creates a snake in its starting layout on a `grid_count` grid.
    #[must_use]
    pub fn new(grid_count: u16) -> Self {
        let mut snake = Self {
            body: VecDeque::with_capacity(INITIAL_SNAKE_LENGTH),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            grid_count,
        };
        snake.reset();
        snake
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction, grid_count: u16) -> Self {
        Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: direction,
            grid_count,
        }
    }

    /// Restores the four-cell horizontal layout centered on the grid, heading right.
    pub fn reset(&mut self) {
        let center = i32::from(self.grid_count / 2);

        self.body.clear();
        for offset in 0..INITIAL_SNAKE_LENGTH as i32 {
            self.body.push_back(Position::new(center - offset, center));
        }

        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
    }

    /// Requests a heading for the next move. Reversals of the committed
    /// heading are ignored; otherwise the latest request wins.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == self.direction.opposite() {
            return;
        }
        self.pending_direction = direction;
    }

    /// Commits the pending heading and pushes a new head.
    ///
    /// Returns `false` without touching the body when the new head would leave
    /// the grid or land on any segment except the current tail.
    pub fn move_forward(&mut self) -> bool {
        self.direction = self.pending_direction;
        let next_head = self.head().step(self.direction);

        if !next_head.is_within_bounds(self.grid_count) {
            return false;
        }

        if self.hits_body(next_head) {
            return false;
        }

        self.body.push_front(next_head);
        true
    }

    /// Drops the last segment after a move that did not eat.
    pub fn remove_tail(&mut self) {
        let _ = self.body.pop_back();
    }

    /// Growth happens by skipping [`Snake::remove_tail`] after a move; this
    /// only names that step at the call site.
    pub fn grow(&mut self) {}

    /// Returns true iff the head is on `position`.
    #[must_use]
    pub fn check_food_collision(&self, position: Position) -> bool {
        self.body.front() == Some(&position)
    }

    /// Snapshot of every occupied cell, head first.
    #[must_use]
    pub fn occupied_positions(&self) -> Vec<Position> {
        self.body.iter().copied().collect()
    }

    /// Display color for the segment at `index` (0 is the head).
    #[must_use]
    pub fn segment_color(index: usize) -> Rgb {
        if index == 0 {
            return SNAKE_HEAD_COLOR;
        }
        SNAKE_BODY_COLORS[(index - 1) % SNAKE_BODY_COLORS.len()]
    }

    /// Iterates over segments head to tail, paired with their display colors.
    pub fn colored_segments(&self) -> impl Iterator<Item = (Position, Rgb)> + '_ {
        self.body
            .iter()
            .enumerate()
            .map(|(index, segment)| (*segment, Self::segment_color(index)))
    }

    /// Returns the current head position.
    ///
    /// The body is never empty: it starts at four segments and every
    /// `remove_tail` follows a successful `move_forward`.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body.front().copied().unwrap_or_default()
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the committed movement direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the heading the next move will commit.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    // The tail cell is vacated by this move unless food was just eaten, so
    // only segments 0..len-1 count.
    fn hits_body(&self, position: Position) -> bool {
        let checked = self.body.len().saturating_sub(1);
        self.body.iter().take(checked).any(|segment| *segment == position)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{SNAKE_BODY_COLORS, SNAKE_HEAD_COLOR};
    use crate::input::Direction;

    use super::{Position, Snake};

    fn line_snake() -> Snake {
        Snake::from_segments(
            vec![
                Position::new(20, 20),
                Position::new(19, 20),
                Position::new(18, 20),
                Position::new(17, 20),
            ],
            Direction::Right,
            30,
        )
    }

    #[test]
    fn reset_builds_centered_horizontal_line() {
        let snake = Snake::new(30);

        assert_eq!(
            snake.occupied_positions(),
            vec![
                Position::new(15, 15),
                Position::new(14, 15),
                Position::new(13, 15),
                Position::new(12, 15),
            ]
        );
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.pending_direction(), Direction::Right);
    }

    #[test]
    fn reset_restores_layout_after_play() {
        let mut snake = Snake::new(40);
        snake.set_direction(Direction::Down);
        assert!(snake.move_forward());
        snake.remove_tail();

        snake.reset();

        assert_eq!(snake.head(), Position::new(20, 20));
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.direction(), Direction::Right);
    }

    #[test]
    fn move_adds_head_without_removing_tail() {
        let mut snake = line_snake();

        assert!(snake.move_forward());

        assert_eq!(snake.len(), 5);
        assert_eq!(snake.head(), Position::new(21, 20));

        snake.remove_tail();
        assert_eq!(snake.len(), 4);
        assert_eq!(
            snake.segments().last().copied(),
            Some(Position::new(18, 20))
        );
    }

    #[test]
    fn reversal_request_is_ignored() {
        for heading in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let head = Position::new(15, 15);
            let mut segments = vec![head];
            for _ in 1..4 {
                let last = *segments.last().expect("segments start non-empty");
                segments.push(last.step(heading.opposite()));
            }
            let mut snake = Snake::from_segments(segments, heading, 30);

            snake.set_direction(heading.opposite());
            assert!(snake.move_forward(), "{heading:?} snake should move");

            assert_eq!(snake.head(), head.step(heading), "heading {heading:?}");
            assert_eq!(snake.direction(), heading);
        }
    }

    #[test]
    fn latest_direction_request_wins() {
        let mut snake = line_snake();

        snake.set_direction(Direction::Up);
        snake.set_direction(Direction::Down);
        assert!(snake.move_forward());

        assert_eq!(snake.head(), Position::new(20, 21));
    }

    #[test]
    fn reversal_is_checked_against_committed_heading() {
        let mut snake = line_snake();

        // Up is pending but not committed, so Left is still a reversal.
        snake.set_direction(Direction::Up);
        snake.set_direction(Direction::Left);

        assert_eq!(snake.pending_direction(), Direction::Up);
    }

    #[test]
    fn wall_collision_fails_without_mutating_body() {
        let mut snake = Snake::from_segments(
            vec![
                Position::new(29, 5),
                Position::new(28, 5),
                Position::new(27, 5),
                Position::new(26, 5),
            ],
            Direction::Right,
            30,
        );

        assert!(!snake.move_forward());
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(29, 5));
    }

    #[test]
    fn top_wall_collision_fails() {
        let mut snake = Snake::from_segments(
            vec![Position::new(3, 0), Position::new(2, 0)],
            Direction::Right,
            10,
        );

        snake.set_direction(Direction::Up);

        assert!(!snake.move_forward());
    }

    #[test]
    fn moving_into_vacated_tail_is_not_a_collision() {
        // A 2x2 loop: head at (1,0) turns down toward the tail cell (1,1).
        let mut snake = Snake::from_segments(
            vec![
                Position::new(1, 0),
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 1),
            ],
            Direction::Right,
            10,
        );

        snake.set_direction(Direction::Down);

        assert!(snake.move_forward());
        assert_eq!(snake.head(), Position::new(1, 1));
    }

    #[test]
    fn moving_into_body_is_a_collision() {
        let mut snake = Snake::from_segments(
            vec![
                Position::new(2, 2),
                Position::new(1, 2),
                Position::new(1, 3),
                Position::new(2, 3),
                Position::new(3, 3),
                Position::new(3, 2),
            ],
            Direction::Right,
            10,
        );

        snake.set_direction(Direction::Down);

        assert!(!snake.move_forward());
        assert_eq!(snake.len(), 6);
    }

    #[test]
    fn food_collision_only_matches_head() {
        let snake = line_snake();

        assert!(snake.check_food_collision(Position::new(20, 20)));
        assert!(!snake.check_food_collision(Position::new(19, 20)));
    }

    #[test]
    fn segment_colors_cycle_after_head() {
        assert_eq!(Snake::segment_color(0), SNAKE_HEAD_COLOR);
        assert_eq!(Snake::segment_color(1), SNAKE_BODY_COLORS[0]);
        assert_eq!(Snake::segment_color(7), SNAKE_BODY_COLORS[6]);
        assert_eq!(Snake::segment_color(8), SNAKE_BODY_COLORS[0]);

        let colors: Vec<_> = line_snake().colored_segments().map(|(_, c)| c).collect();
        assert_eq!(
            colors,
            vec![
                SNAKE_HEAD_COLOR,
                SNAKE_BODY_COLORS[0],
                SNAKE_BODY_COLORS[1],
                SNAKE_BODY_COLORS[2]
            ]
        );
    }
}
