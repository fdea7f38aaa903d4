use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{FIELD_BACKGROUND, Rgb};
use crate::game::{GameSnapshot, GameState};
use crate::input::Direction;
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{
    render_countdown, render_game_over_menu, render_pause_menu, render_start_menu,
};

/// Terminal columns per grid cell; keeps cells roughly square.
pub const CELL_WIDTH: u16 = 2;

const GLYPH_SNAKE_BODY: &str = "██";
const GLYPH_FOOD: &str = "()";
const GLYPH_SNAKE_HEAD_UP: &str = "/\\";
const GLYPH_SNAKE_HEAD_DOWN: &str = "\\/";
const GLYPH_SNAKE_HEAD_LEFT: &str = "<:";
const GLYPH_SNAKE_HEAD_RIGHT: &str = ":>";

/// Converts a backend-free color into a terminal color.
#[must_use]
pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Renders the full frame from a snapshot.
pub fn render(frame: &mut Frame<'_>, snapshot: &GameSnapshot) {
    let area = frame.area();
    let play_area = render_hud(frame, area, snapshot);

    match snapshot.state {
        GameState::Start => {
            render_start_menu(frame, play_area, snapshot.high_score);
            return;
        }
        GameState::GameOver => {
            render_game_over_menu(frame, play_area, snapshot);
            return;
        }
        GameState::Countdown | GameState::Playing | GameState::Paused => {}
    }

    let field = field_rect(play_area, snapshot.grid_count);
    let block = Block::bordered().border_style(Style::new().fg(Color::DarkGray));
    let inner = block.inner(field);
    frame.render_widget(block, field);
    frame.render_widget(
        Block::new().style(Style::new().bg(to_color(FIELD_BACKGROUND))),
        inner,
    );

    render_food(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);

    match snapshot.state {
        GameState::Countdown if snapshot.countdown_remaining > 0 => {
            render_countdown(frame, inner, snapshot.countdown_remaining);
        }
        GameState::Paused => render_pause_menu(frame, inner),
        _ => {}
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &GameSnapshot) {
    let Some((x, y)) = cell_to_terminal(inner, snapshot.grid_count, snapshot.food.position) else {
        return;
    };

    let style = Style::new()
        .fg(to_color(snapshot.food.color))
        .bg(to_color(FIELD_BACKGROUND))
        .add_modifier(Modifier::BOLD);
    frame.buffer_mut().set_string(x, y, GLYPH_FOOD, style);
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &GameSnapshot) {
    let buffer = frame.buffer_mut();

    // Tail first so the head is drawn last.
    for (index, segment) in snapshot.segments.iter().enumerate().rev() {
        let Some((x, y)) = cell_to_terminal(inner, snapshot.grid_count, segment.position) else {
            continue;
        };

        if index == 0 {
            let style = Style::new()
                .fg(Color::White)
                .bg(to_color(segment.color))
                .add_modifier(Modifier::BOLD);
            buffer.set_string(x, y, head_glyph(snapshot.heading), style);
            continue;
        }

        buffer.set_string(
            x,
            y,
            GLYPH_SNAKE_BODY,
            Style::new().fg(to_color(segment.color)),
        );
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

/// Bordered rectangle sized for the grid, centered in `area` and clipped to it.
#[must_use]
pub fn field_rect(area: Rect, grid_count: u16) -> Rect {
    let width = grid_count.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = grid_count.saturating_add(2);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [field] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    field
}

fn cell_to_terminal(inner: Rect, grid_count: u16, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(grid_count) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::style::Color;

    use crate::config::{GameConfig, SNAKE_BODY_COLORS};
    use crate::game::Game;
    use crate::score::MemoryStore;
    use crate::snake::Position;
    use crate::ui::hud::split_hud;

    use super::{cell_to_terminal, field_rect, render, to_color};

    #[test]
    fn cells_map_to_two_columns() {
        let inner = Rect::new(1, 1, 20, 10);

        assert_eq!(cell_to_terminal(inner, 10, Position::new(0, 0)), Some((1, 1)));
        assert_eq!(cell_to_terminal(inner, 10, Position::new(3, 2)), Some((7, 3)));
        assert_eq!(cell_to_terminal(inner, 10, Position::new(10, 0)), None);
    }

    #[test]
    fn field_is_centered() {
        let field = field_rect(Rect::new(0, 0, 100, 40), 30);

        assert_eq!(field.width, 62);
        assert_eq!(field.height, 32);
        assert_eq!(field.x, 19);
        assert_eq!(field.y, 4);
    }

    #[test]
    fn playing_frame_draws_snake_body_colors() {
        let mut game = Game::new_with_seed(GameConfig::default(), MemoryStore::new(), 2);
        game.start_new_game(0);
        game.skip_countdown(0);
        let snapshot = game.snapshot();

        let mut terminal =
            Terminal::new(TestBackend::new(100, 40)).expect("test terminal should build");
        terminal
            .draw(|frame| render(frame, &snapshot))
            .expect("draw should succeed");

        let (play_area, _) = split_hud(Rect::new(0, 0, 100, 40));
        let area = field_rect(play_area, 30);
        let neck = snapshot.segments[1].position;
        let x = area.x + 1 + u16::try_from(neck.x).expect("in grid") * 2;
        let y = area.y + 1 + u16::try_from(neck.y).expect("in grid");

        let cell = &terminal.backend().buffer()[(x, y)];
        assert_eq!(cell.fg, to_color(SNAKE_BODY_COLORS[0]));
        assert_ne!(cell.fg, Color::Reset);
    }
}
