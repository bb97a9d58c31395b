//! Exclusive choice drawn as a row of buttons

use super::adapter::{bind_for_input, bind_for_render, AdapterAction, FieldSpec, InputAdapter};
use super::field_renderer::field_block;
use crate::state::{FormContext, SelectOption};
use crate::ui::components::{button_width, render_button, ButtonState, BUTTON_HEIGHT};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub struct ButtonGroup {
    spec: FieldSpec,
    options: Vec<SelectOption>,
}

impl ButtonGroup {
    pub fn new(
        field: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            spec: FieldSpec::bound("Button group", field, label),
            options,
        }
    }

    /// Index of the option matching the stored value
    pub fn selected_index(&self, ctx: &FormContext) -> Option<usize> {
        let current = ctx.get_value(&self.spec.field)?;
        self.options.iter().position(|o| &o.value == current)
    }

    fn step(&self, ctx: &mut FormContext, forward: bool) -> AdapterAction {
        let count = self.options.len();
        if count == 0 {
            return AdapterAction::Handled;
        }
        let next = match self.selected_index(ctx) {
            Some(i) if forward => (i + 1) % count,
            Some(i) => (i + count - 1) % count,
            None if forward => 0,
            None => count - 1,
        };
        self.choose(ctx, next)
    }

    fn choose(&self, ctx: &mut FormContext, index: usize) -> AdapterAction {
        let Some(value) = self.options.get(index).map(|o| o.value.clone()) else {
            return AdapterAction::Handled;
        };
        let Some(mut binding) = bind_for_input(ctx, &self.spec.field) else {
            return AdapterAction::Ignored;
        };
        binding.set(value);
        AdapterAction::Handled
    }
}

impl InputAdapter for ButtonGroup {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn height(&self) -> u16 {
        BUTTON_HEIGHT + 2
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        if bind_for_render(ctx, &self.spec.field).is_none() {
            return;
        }

        let block = field_block(&self.spec.label, focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let constraints: Vec<Constraint> = self
            .options
            .iter()
            .map(|o| Constraint::Length(button_width(&o.label)))
            .chain(std::iter::once(Constraint::Min(0)))
            .collect();
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(inner);

        let selected = self.selected_index(ctx);
        for (i, option) in self.options.iter().enumerate() {
            let state = if selected == Some(i) {
                ButtonState::Active
            } else {
                ButtonState::Idle
            };
            render_button(frame, cells[i], &option.label, state);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FormContext) -> AdapterAction {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') => self.step(ctx, true),
            KeyCode::Left | KeyCode::Char('h') => self.step(ctx, false),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let Some(index) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) else {
                    return AdapterAction::Ignored;
                };
                if index < self.options.len() {
                    self.choose(ctx, index)
                } else {
                    AdapterAction::Ignored
                }
            }
            _ => AdapterAction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FieldValue, FormValues};
    use crate::test_support::{key, render_to_lines};
    use pretty_assertions::assert_eq;

    fn levels() -> Vec<SelectOption> {
        vec![
            SelectOption::new("basic", "Basic"),
            SelectOption::new("fluent", "Fluent"),
            SelectOption::new("native", "Native"),
        ]
    }

    #[test]
    fn test_arrows_cycle_through_options() {
        let mut ctx = FormContext::new(FormValues::new(), false);
        let mut group = ButtonGroup::new("level", "Level", levels());

        group.handle_key(key(KeyCode::Right), &mut ctx);
        assert_eq!(ctx.get_value("level"), Some(&FieldValue::from("basic")));

        group.handle_key(key(KeyCode::Left), &mut ctx);
        assert_eq!(ctx.get_value("level"), Some(&FieldValue::from("native")));

        group.handle_key(key(KeyCode::Right), &mut ctx);
        assert_eq!(group.selected_index(&ctx), Some(0));
    }

    #[test]
    fn test_digit_picks_directly() {
        let mut ctx = FormContext::new(FormValues::new(), false);
        let mut group = ButtonGroup::new("level", "Level", levels());

        assert_eq!(group.handle_key(key(KeyCode::Char('2')), &mut ctx), AdapterAction::Handled);
        assert_eq!(ctx.get_value("level"), Some(&FieldValue::from("fluent")));
        assert_eq!(group.handle_key(key(KeyCode::Char('9')), &mut ctx), AdapterAction::Ignored);
        assert_eq!(group.handle_key(key(KeyCode::Char('0')), &mut ctx), AdapterAction::Ignored);
    }

    #[test]
    fn test_renders_each_option_as_a_button() {
        let ctx = FormContext::new([("level", "fluent")].into_iter().collect(), false);
        let group = ButtonGroup::new("level", "Level", levels());
        let lines = render_to_lines(40, group.height(), |f| group.render(f, f.area(), &ctx, true));

        assert!(lines[2].contains("Basic"));
        assert!(lines[2].contains("Fluent"));
        assert!(lines[2].contains("Native"));
    }
}
