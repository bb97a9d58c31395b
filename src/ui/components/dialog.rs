//! Modal error dialog

use crate::ui::widgets::wrap_text;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const MAX_WIDTH: u16 = 60;
/// Two columns of padding on each side, inside the border
const PADDING: u16 = 4;

/// Render the error at the head of the queue, centered over whatever is below.
/// `waiting` is how many further errors are queued behind it.
pub fn render_error_dialog(frame: &mut Frame, message: &str, waiting: usize) {
    let area = frame.area();
    let text_width = (MAX_WIDTH - PADDING - 2) as usize;
    let lines = wrap_text(message, text_width);

    let widest = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(dismiss_hint_width()) as u16;
    let width = (widest + PADDING + 2).min(MAX_WIDTH).min(area.width);
    // title, blank, message, blank, hint, borders
    let height = (lines.len() as u16 + 6).min(area.height);

    let dialog_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, dialog_area);

    let title = if waiting > 0 {
        format!(" Error ({waiting} more) ")
    } else {
        " Error ".to_string()
    };

    let mut content = vec![Line::from("")];
    content.extend(lines.into_iter().map(|l| Line::from(format!("  {l}"))));
    content.push(Line::from(""));
    content.push(dismiss_hint());

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(Span::styled(
                    title,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(dialog, dialog_area);
}

fn dismiss_hint() -> Line<'static> {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::raw("  Press "),
        Span::styled("Enter", key),
        Span::raw(" or "),
        Span::styled("Esc", key),
        Span::raw(" to dismiss"),
    ])
}

fn dismiss_hint_width() -> usize {
    dismiss_hint().width()
}
