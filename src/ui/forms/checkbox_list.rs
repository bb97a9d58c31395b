//! Checkbox list with a removable summary of the current selection

use super::adapter::{bind_for_input, bind_for_render, AdapterAction, FieldSpec, InputAdapter};
use super::field_renderer::{border_style, initials};
use crate::state::{FieldValue, FormContext, OptionLoader, OptionSet, SelectOption};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;

const SUMMARY_HEIGHT: u16 = 4;
const LIST_HEIGHT: u16 = 8;

/// Which half of the adapter has the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListRegion {
    Summary,
    #[default]
    Options,
}

pub struct CheckboxList {
    spec: FieldSpec,
    options: OptionSet,
    region: ListRegion,
    summary_cursor: usize,
    list_cursor: usize,
}

impl CheckboxList {
    pub fn new(
        field: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::with_options(field, label, OptionSet::fixed(options))
    }

    pub fn lazy(
        field: impl Into<String>,
        label: impl Into<String>,
        loader: Arc<dyn OptionLoader>,
    ) -> Self {
        Self::with_options(field, label, OptionSet::lazy(loader))
    }

    fn with_options(field: impl Into<String>, label: impl Into<String>, options: OptionSet) -> Self {
        Self {
            spec: FieldSpec::bound("Checkbox list", field, label),
            options,
            region: ListRegion::default(),
            summary_cursor: 0,
            list_cursor: 0,
        }
    }

    pub fn region(&self) -> ListRegion {
        self.region
    }

    fn selected_ids(ctx: &FormContext, field: &str) -> Vec<FieldValue> {
        ctx.get_value(field)
            .map(|v| v.as_list().to_vec())
            .unwrap_or_default()
    }

    /// Options currently selected, in selection order. Ids without a
    /// matching option are kept so they can still be removed.
    pub fn summary(&self, ctx: &FormContext) -> Vec<SelectOption> {
        Self::selected_ids(ctx, &self.spec.field)
            .into_iter()
            .map(|id| match self.options.position(&id) {
                Some(i) => self.options.options()[i].clone(),
                None => {
                    let label = id.display_value();
                    SelectOption::new(id, label)
                }
            })
            .collect()
    }

    pub fn is_checked(&self, ctx: &FormContext, value: &FieldValue) -> bool {
        Self::selected_ids(ctx, &self.spec.field).contains(value)
    }

    fn write(
        &self,
        ctx: &mut FormContext,
        change: impl FnOnce(&mut Vec<FieldValue>),
    ) -> AdapterAction {
        let Some(mut binding) = bind_for_input(ctx, &self.spec.field) else {
            return AdapterAction::Ignored;
        };
        let mut ids = binding
            .get()
            .map(|v| v.as_list().to_vec())
            .unwrap_or_default();
        change(&mut ids);
        binding.set(FieldValue::List(ids));
        AdapterAction::Handled
    }

    fn toggle_highlighted(&mut self, ctx: &mut FormContext) -> AdapterAction {
        let Some(value) = self.options.get(self.list_cursor).map(|o| o.value.clone()) else {
            return AdapterAction::Handled;
        };
        self.write(ctx, |ids| {
            if let Some(pos) = ids.iter().position(|id| id == &value) {
                ids.remove(pos);
            } else {
                ids.push(value);
            }
        })
    }

    fn remove_from_summary(&mut self, ctx: &mut FormContext) -> AdapterAction {
        let index = self.summary_cursor;
        let action = self.write(ctx, |ids| {
            if index < ids.len() {
                ids.remove(index);
            }
        });
        let remaining = Self::selected_ids(ctx, &self.spec.field).len();
        if remaining == 0 {
            self.summary_cursor = 0;
            self.region = ListRegion::Options;
        } else if self.summary_cursor >= remaining {
            self.summary_cursor = remaining - 1;
        }
        action
    }

    fn move_cursor(&mut self, ctx: &FormContext, forward: bool) {
        let (cursor, count) = match self.region {
            ListRegion::Summary => (
                &mut self.summary_cursor,
                Self::selected_ids(ctx, &self.spec.field).len(),
            ),
            ListRegion::Options => (&mut self.list_cursor, self.options.len()),
        };
        if count == 0 {
            return;
        }
        *cursor = if forward {
            (*cursor + 1) % count
        } else {
            (*cursor + count - 1) % count
        };
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        let active = focused && self.region == ListRegion::Summary;
        let chip = Style::default().fg(Color::Black).bg(Color::Cyan);
        let mut spans = Vec::new();
        for (i, option) in self.summary(ctx).iter().enumerate() {
            let style = if active && i == self.summary_cursor {
                chip.add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                chip
            };
            spans.push(Span::styled(
                format!(" {} {} × ", initials(&option.label), option.label),
                style,
            ));
            spans.push(Span::raw(" "));
        }
        if spans.is_empty() {
            spans.push(Span::styled(
                "Nothing selected",
                Style::default().fg(Color::DarkGray),
            ));
        }

        let block = Block::default()
            .title(format!(" {} ", self.spec.label))
            .borders(Borders::ALL)
            .border_style(border_style(active));
        frame.render_widget(
            Paragraph::new(Line::from(spans))
                .wrap(Wrap { trim: false })
                .block(block),
            area,
        );
    }

    fn render_options(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        let active = focused && self.region == ListRegion::Options;
        let items: Vec<ListItem> = self
            .options
            .options()
            .iter()
            .map(|option| {
                let checkbox = if self.is_checked(ctx, &option.value) {
                    "[x] "
                } else {
                    "[ ] "
                };
                let mut spans = vec![
                    Span::raw(checkbox),
                    Span::styled(
                        format!("({}) ", initials(&option.label)),
                        Style::default().fg(Color::Magenta),
                    ),
                    Span::raw(option.label.clone()),
                ];
                if let Some(secondary) = &option.secondary {
                    spans.push(Span::styled(
                        format!("  {secondary}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(active));
        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let mut state = ListState::default().with_selected(active.then_some(self.list_cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[async_trait]
impl InputAdapter for CheckboxList {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn height(&self) -> u16 {
        SUMMARY_HEIGHT + LIST_HEIGHT
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        if bind_for_render(ctx, &self.spec.field).is_none() {
            return;
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(SUMMARY_HEIGHT), Constraint::Min(3)])
            .split(area);
        self.render_summary(frame, chunks[0], ctx, focused);
        self.render_options(frame, chunks[1], ctx, focused);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FormContext) -> AdapterAction {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                let has_selection = !Self::selected_ids(ctx, &self.spec.field).is_empty();
                self.region = match self.region {
                    ListRegion::Options if has_selection => ListRegion::Summary,
                    _ => ListRegion::Options,
                };
                self.summary_cursor = 0;
                AdapterAction::Handled
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(ctx, true);
                AdapterAction::Handled
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(ctx, false);
                AdapterAction::Handled
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.region {
                ListRegion::Options => self.toggle_highlighted(ctx),
                ListRegion::Summary => self.remove_from_summary(ctx),
            },
            _ => AdapterAction::Ignored,
        }
    }

    async fn load_options(&mut self) {
        self.options.ensure_loaded().await;
        if self.list_cursor >= self.options.len() {
            self.list_cursor = 0;
        }
    }
}
