//! Field rendering utilities shared by the input adapters

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Text cursor drawn at the end of the active field
pub const CURSOR: &str = "▌";

/// Border style for a field block
pub fn border_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Bordered block titled with the field label
pub fn field_block(label: &str, is_active: bool) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_style(border_style(is_active))
}

/// Draw a text-like field with a cursor when active and a placeholder when empty
pub fn draw_field_with_value(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: Option<&str>,
    is_active: bool,
    is_multiline: bool,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let (display_value, display_style) = if value.is_empty() && !is_active {
        (placeholder.unwrap_or("(empty)"), Style::default().fg(Color::DarkGray))
    } else {
        (value, style)
    };

    let cursor = if is_active { CURSOR } else { "" };

    let content = if is_multiline {
        let mut lines: Vec<Line> = display_value
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), display_style)))
            .collect();
        if is_active {
            if let Some(last) = lines.last_mut() {
                last.spans
                    .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
            } else {
                lines.push(Line::from(Span::styled(
                    cursor,
                    Style::default().fg(Color::Cyan),
                )));
            }
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display_value, display_style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    frame.render_widget(
        content
            .wrap(Wrap { trim: false })
            .block(field_block(label, is_active)),
        area,
    );
}

/// Draw a one-line validation message under a field
pub fn draw_field_error(frame: &mut Frame, area: Rect, message: &str) {
    let line = Line::from(vec![
        Span::styled(" ! ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled(message, Style::default().fg(Color::Red)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the help line at the bottom of a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(key.to_string(), Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(": {action}  ")));
    }
    let help = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

/// Two-letter initials used in place of an avatar image
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
