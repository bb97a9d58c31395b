//! Layout components (content area, status bar)

use crate::app::App;
use crate::platform::SAVE_SHORTCUT;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const QUIT_HINT: &str = " ^C:quit ";

/// Split the screen into the content area and the status bar line
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {} ", view_hints(app.state.current_view)),
        Style::default().fg(Color::Gray),
    )];

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw("| "));
        spans.push(Span::styled(msg.as_str(), Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_width = QUIT_HINT.len() as u16;
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_width),
        width: quit_width.min(area.width),
        ..area
    };
    let quit_widget =
        Paragraph::new(QUIT_HINT).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the current view
fn view_hints(view: View) -> String {
    match view {
        View::Home => "j/k:nav  Enter/n:new  e:edit  q:quit".to_string(),
        View::Form => format!("Tab:next  {SAVE_SHORTCUT}:save  Esc:back"),
    }
}
