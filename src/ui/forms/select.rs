//! Single-select input with a "none" sentinel

use super::adapter::{bind_for_input, bind_for_render, AdapterAction, FieldSpec, InputAdapter};
use super::field_renderer::field_block;
use crate::state::{FieldValue, FormContext, OptionLoader, OptionSet, SelectOption};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};
use std::sync::Arc;

/// Most option rows drawn at once
const MAX_VISIBLE_ROWS: u16 = 6;

/// One row of the rendered select
#[derive(Debug, Clone, PartialEq)]
pub struct SelectEntry {
    pub label: String,
    /// `None` for the sentinel row
    pub value: Option<FieldValue>,
    pub disabled: bool,
    pub selected: bool,
}

pub struct SelectInput {
    spec: FieldSpec,
    options: OptionSet,
    none_label: String,
    none_disabled: bool,
    /// Row under the cursor; 0 is the sentinel
    highlight: usize,
}

impl SelectInput {
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
            spec: FieldSpec::bound("Select", field, label),
            options,
            none_label: "None".to_string(),
            none_disabled: false,
            highlight: 0,
        }
    }

    /// Make the "none" row visible but not choosable
    pub fn none_disabled(mut self) -> Self {
        self.none_disabled = true;
        self
    }

    pub fn none_label(mut self, label: impl Into<String>) -> Self {
        self.none_label = label.into();
        self
    }

    fn is_unset(value: Option<&FieldValue>) -> bool {
        match value {
            None => true,
            Some(FieldValue::Text(s)) => s.is_empty(),
            Some(_) => false,
        }
    }

    /// Rows as they are drawn: the sentinel first, then every option
    pub fn entries(&self, ctx: &FormContext) -> Vec<SelectEntry> {
        let current = ctx.get_value(&self.spec.field);
        let mut entries = Vec::with_capacity(self.options.len() + 1);
        entries.push(SelectEntry {
            label: self.none_label.clone(),
            value: None,
            disabled: self.none_disabled,
            selected: Self::is_unset(current),
        });
        entries.extend(self.options.options().iter().map(|o| SelectEntry {
            label: o.label.clone(),
            value: Some(o.value.clone()),
            disabled: false,
            selected: current == Some(&o.value),
        }));
        entries
    }

    fn row_count(&self) -> usize {
        self.options.len() + 1
    }

    fn row_enabled(&self, row: usize) -> bool {
        row != 0 || !self.none_disabled
    }

    fn move_highlight(&mut self, forward: bool) {
        let count = self.row_count();
        let mut row = self.highlight;
        for _ in 0..count {
            row = if forward {
                (row + 1) % count
            } else {
                (row + count - 1) % count
            };
            if self.row_enabled(row) {
                self.highlight = row;
                return;
            }
        }
    }

    fn choose(&mut self, ctx: &mut FormContext) -> AdapterAction {
        if !self.row_enabled(self.highlight) {
            return AdapterAction::Handled;
        }
        let value = match self.highlight {
            0 => FieldValue::Text(String::new()),
            row => match self.options.get(row - 1) {
                Some(option) => option.value.clone(),
                None => return AdapterAction::Handled,
            },
        };
        let Some(mut binding) = bind_for_input(ctx, &self.spec.field) else {
            return AdapterAction::Ignored;
        };
        binding.set(value);
        AdapterAction::Handled
    }
}

#[async_trait]
impl InputAdapter for SelectInput {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn height(&self) -> u16 {
        (self.row_count() as u16).min(MAX_VISIBLE_ROWS) + 2
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        if bind_for_render(ctx, &self.spec.field).is_none() {
            return;
        }

        let items: Vec<ListItem> = self
            .entries(ctx)
            .into_iter()
            .map(|entry| {
                let marker = if entry.selected { "● " } else { "○ " };
                let style = if entry.disabled {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC)
                } else if entry.selected {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(entry.label, style),
                ]))
            })
            .collect();

        let highlight_style = if focused {
            Style::default().bg(Color::DarkGray).fg(Color::Cyan)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(field_block(&self.spec.label, focused))
            .highlight_style(highlight_style);
        let mut state = ListState::default().with_selected(focused.then_some(self.highlight));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FormContext) -> AdapterAction {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_highlight(true);
                AdapterAction::Handled
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_highlight(false);
                AdapterAction::Handled
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.choose(ctx),
            _ => AdapterAction::Ignored,
        }
    }

    async fn load_options(&mut self) {
        self.options.ensure_loaded().await;
        if self.highlight >= self.row_count() {
            self.highlight = 0;
        }
    }
}
