//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// How a button is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    /// Focused, or the chosen option of a group
    Active,
    Disabled,
}

/// Width a button needs to show `content` without clipping
pub fn button_width(content: &str) -> u16 {
    content.chars().count() as u16 + 4
}

/// Render a bordered button
pub fn render_button(frame: &mut Frame, area: Rect, content: &str, state: ButtonState) {
    let (border_style, text_style) = match state {
        ButtonState::Active => (
            Style::default().fg(Color::Cyan),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        ButtonState::Idle => (Style::default().fg(Color::DarkGray), Style::default()),
        ButtonState::Disabled => (
            Style::default().fg(Color::DarkGray),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    };

    let paragraph = Paragraph::new(format!(" {content} ")).style(text_style);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(paragraph.block(block), area);
}
