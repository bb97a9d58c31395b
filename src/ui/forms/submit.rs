//! Submit button

use super::adapter::{AdapterAction, FieldSpec, InputAdapter};
use crate::state::FormContext;
use crate::ui::components::{button_width, render_button, ButtonState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{layout::Rect, Frame};

pub const SAVING_LABEL: &str = "Saving…";

pub struct SubmitButton {
    spec: FieldSpec,
}

impl SubmitButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            spec: FieldSpec {
                label: label.into(),
                ..FieldSpec::default()
            },
        }
    }

    /// Text shown on the button for the current submission state
    pub fn caption<'a>(&'a self, ctx: &FormContext) -> &'a str {
        if ctx.is_submitting() {
            SAVING_LABEL
        } else {
            &self.spec.label
        }
    }
}

impl InputAdapter for SubmitButton {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn is_field_bound(&self) -> bool {
        false
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        let caption = self.caption(ctx);
        let area = Rect {
            width: button_width(caption).min(area.width),
            ..area
        };
        let state = if ctx.is_submitting() {
            ButtonState::Disabled
        } else if focused {
            ButtonState::Active
        } else {
            ButtonState::Idle
        };
        render_button(frame, area, caption, state);
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FormContext) -> AdapterAction {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') if ctx.is_submitting() => AdapterAction::Handled,
            KeyCode::Enter | KeyCode::Char(' ') => AdapterAction::Submit,
            _ => AdapterAction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FormValues, SubmitTrigger};
    use crate::test_support::{key, render_to_lines};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_enter_requests_submission() {
        let mut ctx = FormContext::new(FormValues::new(), false);
        let mut button = SubmitButton::new("Save");

        assert!(!button.is_field_bound());
        assert_eq!(button.handle_key(key(KeyCode::Enter), &mut ctx), AdapterAction::Submit);
        assert_eq!(button.handle_key(key(KeyCode::Tab), &mut ctx), AdapterAction::Ignored);
    }

    #[test]
    fn test_shows_saving_while_in_flight() {
        let mut ctx = FormContext::new(FormValues::new(), false);
        let mut button = SubmitButton::new("Save");
        assert_eq!(button.caption(&ctx), "Save");

        let _pending = ctx.begin_submit(SubmitTrigger::SubmitButton);

        assert_eq!(button.caption(&ctx), SAVING_LABEL);
        assert_eq!(button.handle_key(key(KeyCode::Enter), &mut ctx), AdapterAction::Handled);
        let lines = render_to_lines(20, 3, |f| button.render(f, f.area(), &ctx, true));
        assert!(lines[1].contains("Saving…"));
    }
}
