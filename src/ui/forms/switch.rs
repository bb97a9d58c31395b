//! On/off toggle

use super::adapter::{bind_for_input, bind_for_render, AdapterAction, FieldSpec, InputAdapter};
use super::field_renderer::field_block;
use crate::state::{FieldValue, FormContext};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct SwitchInput {
    spec: FieldSpec,
}

impl SwitchInput {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            spec: FieldSpec::bound("Switch", field, label),
        }
    }

    /// Stored value coerced to a boolean; missing counts as off
    pub fn is_on(&self, ctx: &FormContext) -> bool {
        ctx.get_value(&self.spec.field)
            .is_some_and(FieldValue::is_truthy)
    }
}

impl InputAdapter for SwitchInput {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        if bind_for_render(ctx, &self.spec.field).is_none() {
            return;
        }
        let on = self.is_on(ctx);
        let (checkbox, state, color) = if on {
            ("[x]", "On", Color::Green)
        } else {
            ("[ ]", "Off", Color::DarkGray)
        };
        let line = Line::from(vec![
            Span::styled(format!("{checkbox} "), Style::default().fg(color)),
            Span::raw(state),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(field_block(&self.spec.label, focused)),
            area,
        );
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FormContext) -> AdapterAction {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                let on = self.is_on(ctx);
                let Some(mut binding) = bind_for_input(ctx, &self.spec.field) else {
                    return AdapterAction::Ignored;
                };
                binding.set(FieldValue::Bool(!on));
                AdapterAction::Handled
            }
            _ => AdapterAction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FormValues;
    use crate::test_support::{key, render_to_lines};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_coerces_stored_values() {
        let switch = SwitchInput::new("featured", "Featured");
        let cases = [
            (FieldValue::from("yes"), true),
            (FieldValue::from(""), false),
            (FieldValue::Int(0), false),
            (FieldValue::Int(2), true),
            (FieldValue::Bool(true), true),
        ];
        for (stored, expected) in cases {
            let ctx = FormContext::new([("featured", stored.clone())].into_iter().collect(), false);
            assert_eq!(switch.is_on(&ctx), expected, "stored {stored:?}");
        }
        assert!(!switch.is_on(&FormContext::new(FormValues::new(), false)));
    }

    #[test]
    fn test_toggle_writes_a_bool() {
        let mut ctx = FormContext::new([("featured", "yes")].into_iter().collect(), false);
        let mut switch = SwitchInput::new("featured", "Featured");

        switch.handle_key(key(KeyCode::Char(' ')), &mut ctx);
        assert_eq!(ctx.get_value("featured"), Some(&FieldValue::Bool(false)));

        switch.handle_key(key(KeyCode::Enter), &mut ctx);
        assert_eq!(ctx.get_value("featured"), Some(&FieldValue::Bool(true)));

        assert_eq!(switch.handle_key(key(KeyCode::Char('x')), &mut ctx), AdapterAction::Ignored);
    }

    #[test]
    fn test_render_state() {
        let ctx = FormContext::new([("featured", true)].into_iter().collect(), false);
        let switch = SwitchInput::new("featured", "Featured");
        let lines = render_to_lines(20, 3, |f| switch.render(f, f.area(), &ctx, false));
        assert!(lines[1].contains("[x] On"));
    }
}
