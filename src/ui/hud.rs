use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::game::{GameSnapshot, GameState};

const HUD_MARGIN_X: u16 = 2;

/// Splits `area` into the play area and the one-line status row below it.
#[must_use]
pub fn split_hud(area: Rect) -> (Rect, Rect) {
    let [play_area, status_row, _bottom_margin] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    (play_area, inset_horizontal(status_row, HUD_MARGIN_X))
}

/// Renders the status row and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &GameSnapshot) -> Rect {
    let (play_area, status_row) = split_hud(area);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(status_row);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            state_label(snapshot.state),
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Left),
        left,
    );

    frame.render_widget(
        Paragraph::new(score_line(snapshot.score, snapshot.high_score)).alignment(Alignment::Right),
        right,
    );

    play_area
}

fn score_line(score: u32, high_score: u32) -> Line<'static> {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    Line::from(vec![
        Span::styled("Score ", label),
        Span::styled(score.to_string(), value),
        Span::styled("   Best ", label),
        Span::styled(high_score.max(score).to_string(), value),
    ])
}

fn state_label(state: GameState) -> &'static str {
    match state {
        GameState::Start => "[Enter] start  [Q] quit",
        GameState::Countdown => "get ready  [Space] skip",
        GameState::Playing => "[Arrows/WASD] steer  [Space/P] pause",
        GameState::Paused => "paused  [Space/P] resume",
        GameState::GameOver => "game over",
    }
}

fn inset_horizontal(area: Rect, margin: u16) -> Rect {
    let inset = margin.min(area.width / 2);
    Rect {
        x: area.x + inset,
        width: area.width - inset * 2,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{inset_horizontal, score_line, split_hud};

    #[test]
    fn hud_takes_two_bottom_rows() {
        let (play, status) = split_hud(Rect::new(0, 0, 80, 30));

        assert_eq!(play, Rect::new(0, 0, 80, 28));
        assert_eq!(status, Rect::new(2, 28, 76, 1));
    }

    #[test]
    fn inset_never_underflows() {
        let narrow = inset_horizontal(Rect::new(0, 0, 3, 1), 2);
        assert_eq!(narrow.width, 1);
    }

    #[test]
    fn best_shows_running_score_when_higher() {
        let line = score_line(120, 80).to_string();
        assert!(line.contains("Best 120"), "{line}");
    }
}
