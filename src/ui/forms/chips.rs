//! Multi-select rendered as removable chips

use super::adapter::{bind_for_input, bind_for_render, AdapterAction, FieldSpec, InputAdapter};
use super::field_renderer::field_block;
use crate::state::{FieldValue, FormContext, OptionLoader, OptionSet, SelectOption};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;

/// A selected value with the label it is shown under
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    pub value: FieldValue,
    pub label: String,
}

pub struct ChipSelect {
    spec: FieldSpec,
    options: OptionSet,
    /// Option offered for adding
    candidate: usize,
}

impl ChipSelect {
    pub fn new(
        field: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            spec: FieldSpec::bound("Chip", field, label),
            options: OptionSet::fixed(options),
            candidate: 0,
        }
    }

    pub fn lazy(
        field: impl Into<String>,
        label: impl Into<String>,
        loader: Arc<dyn OptionLoader>,
    ) -> Self {
        Self {
            spec: FieldSpec::bound("Chip", field, label),
            options: OptionSet::lazy(loader),
            candidate: 0,
        }
    }

    fn selected(value: Option<&FieldValue>) -> Vec<FieldValue> {
        value.map(|v| v.as_list().to_vec()).unwrap_or_default()
    }

    /// Chips for the stored values, labels resolved through the options
    pub fn chips(&self, ctx: &FormContext) -> Vec<Chip> {
        Self::selected(ctx.get_value(&self.spec.field))
            .into_iter()
            .map(|value| {
                let label = self
                    .options
                    .label_for(&value)
                    .map(str::to_string)
                    .unwrap_or_else(|| value.display_value());
                Chip { value, label }
            })
            .collect()
    }

    pub fn candidate(&self) -> Option<&SelectOption> {
        self.options.get(self.candidate)
    }

    fn cycle_candidate(&mut self, forward: bool) {
        let count = self.options.len();
        if count == 0 {
            return;
        }
        self.candidate = if forward {
            (self.candidate + 1) % count
        } else {
            (self.candidate + count - 1) % count
        };
    }

    fn update(
        &self,
        ctx: &mut FormContext,
        change: impl FnOnce(&mut Vec<FieldValue>),
    ) -> AdapterAction {
        let Some(mut binding) = bind_for_input(ctx, &self.spec.field) else {
            return AdapterAction::Ignored;
        };
        let mut values = Self::selected(binding.get());
        change(&mut values);
        binding.set(FieldValue::List(values));
        AdapterAction::Handled
    }
}

#[async_trait]
impl InputAdapter for ChipSelect {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn height(&self) -> u16 {
        5
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        if bind_for_render(ctx, &self.spec.field).is_none() {
            return;
        }

        let chip_style = Style::default().fg(Color::Black).bg(Color::Cyan);
        let mut chip_spans: Vec<Span> = Vec::new();
        for chip in self.chips(ctx) {
            chip_spans.push(Span::styled(format!(" {} × ", chip.label), chip_style));
            chip_spans.push(Span::raw(" "));
        }
        if chip_spans.is_empty() {
            let empty = self.spec.placeholder.as_deref().unwrap_or("(none selected)");
            chip_spans.push(Span::styled(empty, Style::default().fg(Color::DarkGray)));
        }

        let candidate = match self.candidate() {
            Some(option) => Span::styled(
                format!("‹ {} ›", option.label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            None => Span::styled("no options", Style::default().fg(Color::DarkGray)),
        };
        let add_line = Line::from(vec![
            Span::styled("Add: ", Style::default().fg(Color::DarkGray)),
            candidate,
        ]);

        let content = vec![Line::from(chip_spans), Line::from(""), add_line];
        frame.render_widget(
            Paragraph::new(content)
                .wrap(Wrap { trim: false })
                .block(field_block(&self.spec.label, focused)),
            area,
        );
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FormContext) -> AdapterAction {
        match key.code {
            KeyCode::Right => {
                self.cycle_candidate(true);
                AdapterAction::Handled
            }
            KeyCode::Left => {
                self.cycle_candidate(false);
                AdapterAction::Handled
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(value) = self.candidate().map(|o| o.value.clone()) else {
                    return AdapterAction::Handled;
                };
                self.update(ctx, |values| {
                    if !values.contains(&value) {
                        values.push(value);
                    }
                })
            }
            KeyCode::Backspace => self.update(ctx, |values| {
                values.pop();
            }),
            KeyCode::Delete => {
                let Some(value) = self.candidate().map(|o| o.value.clone()) else {
                    return AdapterAction::Handled;
                };
                self.update(ctx, |values| values.retain(|v| v != &value))
            }
            _ => AdapterAction::Ignored,
        }
    }

    async fn load_options(&mut self) {
        self.options.ensure_loaded().await;
        self.candidate = 0;
    }
}
