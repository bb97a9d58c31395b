//! Application state definitions

use super::records::RecordKind;
use std::collections::{HashMap, VecDeque};

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Record kinds to pick from
    #[default]
    Home,
    /// A create or edit form is open
    Form,
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Selection
    pub selected_index: usize,

    // Data
    pub record_counts: HashMap<RecordKind, usize>,

    // UI state
    pub status_message: Option<String>,
    errors: VecDeque<String>,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Record kind under the cursor on the home view
    pub fn selected_kind(&self) -> RecordKind {
        RecordKind::ALL
            .get(self.selected_index)
            .copied()
            .unwrap_or(RecordKind::Company)
    }

    pub fn record_count(&self, kind: RecordKind) -> usize {
        self.record_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Queue an error for the modal dialog
    pub fn push_error(&mut self, message: String) {
        tracing::error!("{message}");
        self.errors.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Error currently shown, and how many more are waiting behind it
    pub fn current_error(&self) -> Option<(&str, usize)> {
        self.errors
            .front()
            .map(|e| (e.as_str(), self.errors.len() - 1))
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }
}
