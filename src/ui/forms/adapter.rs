//! The contract every input adapter implements

use crate::state::{FieldMut, FieldRef, FormContext};
use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// What the page should do after an adapter saw a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterAction {
    /// Key not used; the page may interpret it
    Ignored,
    Handled,
    /// Start a submission
    Submit,
}

/// Whether an adapter shows up when creating, editing, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Always,
    CreateOnly,
    EditOnly,
}

impl Visibility {
    pub fn shown_in(self, edit_mode: bool) -> bool {
        match self {
            Visibility::Always => true,
            Visibility::CreateOnly => !edit_mode,
            Visibility::EditOnly => edit_mode,
        }
    }
}

/// Configuration common to all adapters
#[derive(Debug, Clone, Default)]
pub struct FieldSpec {
    pub field: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub visibility: Visibility,
}

impl FieldSpec {
    /// Build the spec for a field-bound adapter. An empty field name is a
    /// wiring mistake: it is reported here and the adapter stays inert.
    pub fn bound(kind: &str, field: impl Into<String>, label: impl Into<String>) -> Self {
        let field = field.into();
        let label = label.into();
        if field.trim().is_empty() {
            tracing::warn!("{kind} input \"{label}\" has no field name and will not render");
        }
        Self {
            field,
            label,
            placeholder: None,
            visibility: Visibility::Always,
        }
    }
}

/// Binding between one field of a [`FormContext`] and a terminal widget
#[async_trait]
pub trait InputAdapter: Send {
    fn spec(&self) -> &FieldSpec;

    fn spec_mut(&mut self) -> &mut FieldSpec;

    /// Rows needed to draw the adapter, borders included
    fn height(&self) -> u16 {
        3
    }

    /// True while the adapter wants every key, Tab and Esc included
    fn is_capturing(&self) -> bool {
        false
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &FormContext, focused: bool);

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut FormContext) -> AdapterAction;

    /// Fetch lazily loaded options, at most once per adapter
    async fn load_options(&mut self) {}

    fn field(&self) -> &str {
        &self.spec().field
    }

    fn label(&self) -> &str {
        &self.spec().label
    }

    fn is_field_bound(&self) -> bool {
        true
    }

    fn visible_in(&self, edit_mode: bool) -> bool {
        self.spec().visibility.shown_in(edit_mode)
    }

    fn placeholder(mut self, text: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.spec_mut().placeholder = Some(text.into());
        self
    }

    fn visibility(mut self, visibility: Visibility) -> Self
    where
        Self: Sized,
    {
        self.spec_mut().visibility = visibility;
        self
    }
}

/// Bind for reading during render. Misconfigured adapters simply draw nothing;
/// the warning was already emitted when they were built.
pub(crate) fn bind_for_render<'a>(ctx: &'a FormContext, field: &str) -> Option<FieldRef<'a>> {
    match ctx.bind(field) {
        Ok(binding) => Some(binding),
        Err(e) => {
            tracing::trace!("Skipping render of \"{field}\": {e}");
            None
        }
    }
}

/// Bind for writing on user interaction
pub(crate) fn bind_for_input<'a>(ctx: &'a mut FormContext, field: &str) -> Option<FieldMut<'a>> {
    match ctx.bind_mut(field) {
        Ok(binding) => Some(binding),
        Err(e) => {
            tracing::warn!("Ignoring input for \"{field}\": {e}");
            None
        }
    }
}
