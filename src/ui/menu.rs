use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::SNAKE_BODY_COLORS;
use crate::game::GameSnapshot;
use crate::renderer::to_color;

const TITLE: &str = "COLORFUL SNAKE";

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, high_score: u32) {
    let popup = centered_popup(area, 44, 11);
    frame.render_widget(Clear, popup);

    let lines = vec![
        rainbow_title(),
        Line::from(""),
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
        Line::from("[Enter]/[Space] Start"),
        Line::from("[Q]/[Esc] Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Arrows/WASD to steer",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        popup,
    );
}

/// Draws the big countdown number over the field.
pub fn render_countdown(frame: &mut Frame<'_>, area: Rect, remaining: u32) {
    let popup = centered_popup(area, 9, 3);
    frame.render_widget(Clear, popup);

    frame.render_widget(
        Paragraph::new(Line::from(remaining.to_string()))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::bordered()),
        popup,
    );
}

/// Draws the pause overlay.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 30, 6);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[Space]/[P] Resume"),
        Line::from("[Q]/[Esc] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over screen with the seconds left before returning to start.
pub fn render_game_over_menu(frame: &mut Frame<'_>, area: Rect, snapshot: &GameSnapshot) {
    let popup = centered_popup(area, 44, 10);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(format!("Score: {}", snapshot.score)),
        Line::from(format!("High score: {}", snapshot.high_score)),
        Line::from(if snapshot.new_record {
            "New high score!"
        } else {
            ""
        }),
        Line::from(""),
        Line::from(Span::styled(
            format!("Back to menu in {}s", snapshot.game_over_remaining),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn rainbow_title() -> Line<'static> {
    let spans: Vec<Span<'static>> = TITLE
        .chars()
        .enumerate()
        .map(|(index, ch)| {
            Span::styled(
                ch.to_string(),
                Style::default()
                    .fg(to_color(SNAKE_BODY_COLORS[index % SNAKE_BODY_COLORS.len()]))
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    Line::from(spans)
}

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
