//! Home view: the record kinds that can be created or edited

use super::widgets::render_scrollable_list;
use crate::app::App;
use crate::state::RecordKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = RecordKind::ALL
        .iter()
        .enumerate()
        .map(|(i, &kind)| {
            let selected = i == app.state.selected_index;
            let name_style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let count = app.state.record_count(kind);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<14}", kind.label()), name_style),
                Span::styled(
                    format!("{count:>4} saved"),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Portfolio content ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_symbol("▸ ");

    render_scrollable_list(frame, area, list, app.state.selected_index);
}
