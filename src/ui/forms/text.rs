//! Text and number input

use super::adapter::{bind_for_input, bind_for_render, AdapterAction, FieldSpec, InputAdapter};
use super::field_renderer::draw_field_with_value;
use crate::state::{FieldValue, FormContext, Transform};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};

/// Bounds and step for numeric inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: f64,
    pub integer: bool,
}

impl NumericBounds {
    pub fn integer(min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            min: min.map(|n| n as f64),
            max: max.map(|n| n as f64),
            step: 1.0,
            integer: true,
        }
    }

    pub fn decimal(min: Option<f64>, max: Option<f64>, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            integer: false,
        }
    }

    fn clamp(&self, n: f64) -> f64 {
        let n = self.min.map_or(n, |min| n.max(min));
        self.max.map_or(n, |max| n.min(max))
    }

    fn to_value(&self, n: f64) -> FieldValue {
        if self.integer {
            FieldValue::Int(n.round() as i64)
        } else {
            FieldValue::Float(n)
        }
    }

    /// Number in typed text. `None` for text with no number yet ("", "-").
    fn parse(&self, raw: &str) -> Option<f64> {
        let raw = raw.strip_suffix('.').unwrap_or(raw);
        if self.integer {
            raw.parse::<i64>().ok().map(|n| n as f64)
        } else {
            raw.parse::<f64>().ok()
        }
    }

    fn accepts(&self, raw: &str, c: char) -> bool {
        match c {
            '0'..='9' => true,
            '-' => raw.is_empty() && !matches!(self.min, Some(min) if min >= 0.0),
            '.' => !self.integer && !raw.contains('.'),
            _ => false,
        }
    }
}

/// Single scalar input. Free text by default; numeric when given bounds.
pub struct TextInput {
    spec: FieldSpec,
    multiline: bool,
    numeric: Option<NumericBounds>,
    transform: Option<Transform>,
    /// Text as typed into a numeric field, with the field revision it was stored at
    draft: Option<(u64, String)>,
}

impl TextInput {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            spec: FieldSpec::bound("Text", field, label),
            multiline: false,
            numeric: None,
            transform: None,
            draft: None,
        }
    }

    pub fn number(field: impl Into<String>, label: impl Into<String>, bounds: NumericBounds) -> Self {
        Self {
            spec: FieldSpec::bound("Number", field, label),
            multiline: false,
            numeric: Some(bounds),
            transform: None,
            draft: None,
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Pass raw input through `transform` before it is stored
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    fn current_text(value: Option<&FieldValue>) -> String {
        match value {
            Some(FieldValue::Text(s)) => s.clone(),
            Some(other) => other.display_value(),
            None => String::new(),
        }
    }

    /// Draft text if nothing else wrote the field since it was typed
    fn draft_at(&self, revision: u64) -> Option<&str> {
        self.draft
            .as_ref()
            .filter(|(at, _)| *at == revision)
            .map(|(_, text)| text.as_str())
    }

    fn raw_text(&self, ctx: &FormContext) -> String {
        let Ok(binding) = ctx.bind(&self.spec.field) else {
            return String::new();
        };
        match self.draft_at(binding.revision()) {
            Some(draft) => draft.to_string(),
            None => Self::current_text(binding.get()),
        }
    }

    fn accepts_char(&self, raw: &str, c: char) -> bool {
        match &self.numeric {
            Some(bounds) => bounds.accepts(raw, c),
            None => true,
        }
    }

    fn step(&mut self, ctx: &mut FormContext, direction: f64) -> AdapterAction {
        let Some(bounds) = self.numeric else {
            return AdapterAction::Ignored;
        };
        let Some(mut binding) = bind_for_input(ctx, &self.spec.field) else {
            return AdapterAction::Ignored;
        };
        let current = binding
            .get()
            .and_then(FieldValue::as_f64)
            .or(bounds.min)
            .unwrap_or(0.0);
        let next = bounds.clamp(current + direction * bounds.step);
        binding.set(bounds.to_value(next));
        self.draft = None;
        AdapterAction::Handled
    }

    fn edit(&mut self, ctx: &mut FormContext, edit: impl FnOnce(&mut String)) -> AdapterAction {
        let mut raw = self.raw_text(ctx);
        let Some(mut binding) = bind_for_input(ctx, &self.spec.field) else {
            return AdapterAction::Ignored;
        };
        edit(&mut raw);
        let raw = match &self.transform {
            Some(transform) => transform(&raw),
            None => raw,
        };

        let Some(bounds) = self.numeric else {
            binding.set(FieldValue::Text(raw));
            return AdapterAction::Handled;
        };
        // Out-of-range input snaps to the bound and the text follows it
        let shown = match bounds.parse(&raw) {
            Some(n) => {
                let clamped = bounds.clamp(n);
                let value = bounds.to_value(clamped);
                let shown = if clamped == n { raw } else { value.display_value() };
                binding.set(value);
                shown
            }
            None => {
                binding.set(FieldValue::Text(String::new()));
                raw
            }
        };
        self.draft = Some((binding.revision(), shown));
        AdapterAction::Handled
    }
}

impl InputAdapter for TextInput {
    fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    fn spec_mut(&mut self) -> &mut FieldSpec {
        &mut self.spec
    }

    fn height(&self) -> u16 {
        if self.multiline {
            6
        } else {
            3
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool) {
        let Some(binding) = bind_for_render(ctx, &self.spec.field) else {
            return;
        };
        let value = match self.draft_at(binding.revision()) {
            Some(draft) => draft.to_string(),
            None => Self::current_text(binding.get()),
        };
        draw_field_with_value(
            frame,
            area,
            &self.spec.label,
            &value,
            self.spec.placeholder.as_deref(),
            focused,
            self.multiline,
        );
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FormContext) -> AdapterAction {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
        {
            return AdapterAction::Ignored;
        }

        match key.code {
            KeyCode::Char(c) if self.accepts_char(&self.raw_text(ctx), c) => {
                self.edit(ctx, |raw| raw.push(c))
            }
            KeyCode::Char(_) => AdapterAction::Handled,
            KeyCode::Backspace => self.edit(ctx, |raw| {
                raw.pop();
            }),
            KeyCode::Enter if self.multiline => self.edit(ctx, |raw| raw.push('\n')),
            KeyCode::Up => self.step(ctx, 1.0),
            KeyCode::Down => self.step(ctx, -1.0),
            _ => AdapterAction::Ignored,
        }
    }
}
