//! Form context: the handle every input adapter reads and writes through

use super::lifecycle::SubmitState;
use super::store::FieldStore;
use super::value::{FieldValue, FormErrors, FormValues};
use super::ResponseError;
use thiserror::Error;
use uuid::Uuid;

/// Programmer errors raised when an adapter is wired up wrongly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormConfigError {
    #[error("input adapter has no field name")]
    MissingFieldName,
    #[error("form {form_id} is not mounted")]
    NotMounted { form_id: Uuid },
}

/// State shared by every adapter of one form instance.
///
/// Owns the field store, the form-scoped response error and the submission
/// bookkeeping. Adapters receive it explicitly and go through [`FormContext::bind`]
/// or [`FormContext::bind_mut`] so a misconfigured adapter fails loudly instead
/// of writing somewhere unexpected.
#[derive(Debug)]
pub struct FormContext {
    pub(super) id: Uuid,
    pub(super) store: FieldStore,
    pub(super) response_error: Option<ResponseError>,
    pub(super) edit_mode: bool,
    pub(super) mounted: bool,
    pub(super) in_flight: usize,
    pub(super) next_attempt: u64,
}

impl FormContext {
    /// Mount a new form with its initial snapshot
    pub fn new(initial: FormValues, edit_mode: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            store: FieldStore::new(initial),
            response_error: None,
            edit_mode,
            mounted: true,
            in_flight: 0,
            next_attempt: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the form edits an existing record rather than creating one
    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tear the form down. Pending submissions settle into nothing afterwards.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn get_value(&self, field: &str) -> Option<&FieldValue> {
        self.store.get_value(field)
    }

    pub fn set_field_value(&mut self, field: &str, value: FieldValue) {
        self.store.set_field_value(field, value);
    }

    pub fn set_field_error(&mut self, field: &str, message: Option<String>) {
        self.store.set_field_error(field, message);
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.store.field_error(field)
    }

    pub fn set_response_error(&mut self, error: Option<ResponseError>) {
        self.response_error = error;
    }

    pub fn response_error(&self) -> Option<&ResponseError> {
        self.response_error.as_ref()
    }

    /// Restore the initial snapshot and clear field errors.
    /// The response error is owned by the submission lifecycle and left alone.
    pub fn reset_form(&mut self) {
        self.store.reset();
    }

    pub fn values(&self) -> &FormValues {
        self.store.values()
    }

    pub fn errors(&self) -> &FormErrors {
        self.store.errors()
    }

    /// Whether any value differs from the initial snapshot
    pub fn is_dirty(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn field_revision(&self, field: &str) -> u64 {
        self.store.field_revision(field)
    }

    /// True while at least one submission has not settled yet
    pub fn is_submitting(&self) -> bool {
        self.in_flight > 0
    }

    pub fn state(&self) -> SubmitState {
        if self.in_flight > 0 {
            SubmitState::Submitting
        } else if self.response_error.is_some() {
            SubmitState::SettledError
        } else {
            SubmitState::Idle
        }
    }

    /// Read-only binding to one field
    pub fn bind(&self, field: &str) -> Result<FieldRef<'_>, FormConfigError> {
        self.check_binding(field)?;
        Ok(FieldRef { ctx: self, field: field.to_string() })
    }

    /// Read-write binding to one field
    pub fn bind_mut(&mut self, field: &str) -> Result<FieldMut<'_>, FormConfigError> {
        self.check_binding(field)?;
        Ok(FieldMut { ctx: self, field: field.to_string() })
    }

    fn check_binding(&self, field: &str) -> Result<(), FormConfigError> {
        if field.trim().is_empty() {
            return Err(FormConfigError::MissingFieldName);
        }
        if !self.mounted {
            return Err(FormConfigError::NotMounted { form_id: self.id });
        }
        Ok(())
    }
}

/// Read access to a single bound field
pub struct FieldRef<'a> {
    ctx: &'a FormContext,
    field: String,
}

impl<'a> FieldRef<'a> {
    pub fn get(&self) -> Option<&'a FieldValue> {
        self.ctx.get_value(&self.field)
    }

    pub fn error(&self) -> Option<&'a str> {
        self.ctx.field_error(&self.field)
    }

    /// Revision of this field, moves on every write to its value or error slot
    pub fn revision(&self) -> u64 {
        self.ctx.field_revision(&self.field)
    }
}

/// Write access to a single bound field
pub struct FieldMut<'a> {
    ctx: &'a mut FormContext,
    field: String,
}

impl FieldMut<'_> {
    pub fn get(&self) -> Option<&FieldValue> {
        self.ctx.get_value(&self.field)
    }

    pub fn set(&mut self, value: FieldValue) {
        self.ctx.set_field_value(&self.field, value);
    }

    pub fn set_error(&mut self, message: Option<String>) {
        self.ctx.set_field_error(&self.field, message);
    }

    pub fn revision(&self) -> u64 {
        self.ctx.field_revision(&self.field)
    }
}
