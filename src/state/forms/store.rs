//! Field value store and per-field error slots

use super::value::{FieldValue, FormErrors, FormValues};
use std::collections::HashMap;

/// Holds the current values of one form instance, the snapshot they reset to,
/// and the per-field error slots.
///
/// Every mutation bumps a store-wide revision, so a renderer that redraws on
/// any change can compare one number. Each field also carries its own revision
/// for renderers that only care about one field.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    initial: FormValues,
    values: FormValues,
    errors: FormErrors,
    revision: u64,
    field_revisions: HashMap<String, u64>,
}

impl FieldStore {
    /// Create a store seeded from the initial snapshot
    pub fn new(initial: FormValues) -> Self {
        Self {
            values: initial.clone(),
            initial,
            errors: FormErrors::default(),
            revision: 0,
            field_revisions: HashMap::new(),
        }
    }

    /// Current value of a field, `None` if it was never set
    pub fn get_value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Replace the value of one field. No validation happens here.
    pub fn set_field_value(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field, value);
        self.touch(field);
    }

    /// Set or clear one field's error slot
    pub fn set_field_error(&mut self, field: &str, message: Option<String>) {
        self.errors.set(field, message);
        self.touch(field);
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    /// Restore the initial snapshot and clear all field errors
    pub fn reset(&mut self) {
        let touched: Vec<String> = self
            .values
            .iter()
            .map(|(name, _)| name.clone())
            .chain(self.initial.iter().map(|(name, _)| name.clone()))
            .chain(self.errors.fields().map(str::to_string))
            .collect();

        self.values = self.initial.clone();
        self.errors.clear();
        for field in touched {
            self.touch(&field);
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Whether any value differs from the initial snapshot
    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    /// Store-wide revision, bumped by every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Revision of one field, 0 if it was never touched
    pub fn field_revision(&self, field: &str) -> u64 {
        self.field_revisions.get(field).copied().unwrap_or(0)
    }

    fn touch(&mut self, field: &str) {
        self.revision += 1;
        *self.field_revisions.entry(field.to_string()).or_insert(0) = self.revision;
    }
}
