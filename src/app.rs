//! Application state and core logic

use crate::backend::{Backend, LocalStore};
use crate::config::AdminConfig;
use crate::state::{
    AppState, FormContext, RecordKind, ResponseError, SubmitOutcome, SubmitTicket, View,
};
use crate::ui::forms::{build_form, FormPage, PageAction};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Outcome of a background submission, delivered back to the UI loop
#[derive(Debug)]
pub struct SubmitResult {
    pub ticket: SubmitTicket,
    pub kind: RecordKind,
    pub outcome: SubmitOutcome,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Open form, if any
    pub form: Option<FormPage>,
    /// Kind of record the open form edits
    form_kind: RecordKind,
    backend: Arc<dyn Backend>,
    config: AdminConfig,
    /// Whether the app should quit
    quit: bool,
    results_tx: UnboundedSender<SubmitResult>,
    results_rx: UnboundedReceiver<SubmitResult>,
}

impl App {
    /// Create a new App instance backed by the local record store
    pub async fn new(config: AdminConfig) -> Result<Self> {
        let store = LocalStore::open(config.store_path()).await?;
        tracing::info!("Using record store at {}", store.path().display());

        let mut app = Self::with_backend(Arc::new(store), config);
        app.refresh_counts().await;
        Ok(app)
    }

    pub fn with_backend(backend: Arc<dyn Backend>, config: AdminConfig) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::default(),
            form: None,
            form_kind: RecordKind::Company,
            backend,
            config,
            quit: false,
            results_tx,
            results_rx,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Reload how many records of each kind exist
    pub async fn refresh_counts(&mut self) {
        for kind in RecordKind::ALL {
            match self.backend.list(kind).await {
                Ok(records) => {
                    self.state.record_counts.insert(kind, records.len());
                }
                Err(e) => {
                    self.push_error(format!("Failed to load {}: {e:#}", kind.label()));
                    return;
                }
            }
        }
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        match self.state.current_view {
            View::Home => {
                if let Err(e) = self.handle_home_key(key).await {
                    self.push_error(format!("Failed to open form: {e:#}"));
                }
            }
            View::Form => self.handle_form_key(key),
        }
        Ok(())
    }

    /// Handle keys in the Home view
    async fn handle_home_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.move_selection_down(RecordKind::ALL.len())
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Enter | KeyCode::Char('n') => {
                self.open_form(self.state.selected_kind(), false).await?
            }
            KeyCode::Char('e') => self.open_form(self.state.selected_kind(), true).await?,
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    /// Open the form for `kind`. Editing starts from the first stored record.
    pub async fn open_form(&mut self, kind: RecordKind, edit: bool) -> Result<()> {
        self.state.status_message = None;
        let existing = if edit {
            let first = self.backend.list(kind).await?.into_iter().next();
            if first.is_none() {
                self.state.status_message = Some(format!("No {} to edit yet", kind.label()));
                return Ok(());
            }
            first
        } else {
            None
        };

        let mut page = build_form(
            kind,
            Arc::clone(&self.backend),
            existing.as_ref(),
            &self.config,
        );
        page.load_options().await;
        tracing::debug!("Opened {} form (edit: {edit})", kind.label());

        self.form = Some(page);
        self.form_kind = kind;
        self.state.current_view = View::Form;
        Ok(())
    }

    /// Leave the form; results still in flight are dropped when they arrive
    pub fn close_form(&mut self) {
        if let Some(mut page) = self.form.take() {
            page.unmount();
            tracing::debug!("Closed {} form", page.title());
        }
        self.state.current_view = View::Home;
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(page) = self.form.as_mut() else {
            self.state.current_view = View::Home;
            return;
        };
        let revision = page.ctx().revision();
        let action = page.handle_key(key);
        if page.ctx().revision() != revision {
            self.state.status_message = None;
        }
        match action {
            PageAction::None => {}
            PageAction::Cancel => self.close_form(),
            PageAction::Submit(pending) => {
                let kind = self.form_kind;
                let handler = page.handler();
                let tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let ticket = pending.ticket;
                    let task = tokio::spawn(async move {
                        handler
                            .submit(pending.values, pending.errors, pending.trigger)
                            .await
                    });
                    // A panicking handler still has to settle the form
                    let outcome = task.await.unwrap_or_else(|e| {
                        tracing::error!("Submit handler failed: {e}");
                        Err(ResponseError::unexpected())
                    });
                    if tx.send(SubmitResult { ticket, kind, outcome }).is_err() {
                        tracing::debug!("Submission finished after shutdown");
                    }
                });
            }
        }
    }

    /// Apply finished submissions to the open form
    pub async fn drain_submissions(&mut self) {
        let mut saved = false;
        while let Ok(result) = self.results_rx.try_recv() {
            let Some(page) = self.form.as_mut() else {
                tracing::debug!("Dropping {} result: form closed", result.kind.label());
                continue;
            };
            if page.ctx().id() != result.ticket.form_id {
                tracing::debug!("Dropping {} result: form replaced", result.kind.label());
                continue;
            }

            let edit_mode = page.ctx().edit_mode();
            let saved_suffix = result.outcome.as_ref().ok().map(|reply| {
                reply
                    .get("id")
                    .map(|id| format!(" (#{id})"))
                    .unwrap_or_default()
            });
            let field_error = result.outcome.as_ref().err().and_then(|e| {
                let field = e.metadata.get("field").and_then(Value::as_str)?;
                Some((field.to_string(), e.message.clone()))
            });
            let failed = result.outcome.is_err();
            page.settle(result.ticket, result.outcome);

            if failed {
                show_field_errors(page.ctx_mut(), field_error);
            }

            if let Some(suffix) = saved_suffix {
                saved = true;
                self.state.status_message =
                    Some(format!("{} saved{suffix}", result.kind.label()));
                if edit_mode {
                    self.close_form();
                }
            }
        }
        if saved {
            self.refresh_counts().await;
        }
    }
}

/// Replace the field errors of the previous attempt with the field this
/// rejection names, if any
fn show_field_errors(ctx: &mut FormContext, rejected: Option<(String, String)>) {
    let stale: Vec<String> = ctx.errors().fields().map(str::to_string).collect();
    for field in stale {
        ctx.set_field_error(&field, None);
    }
    let Some((field, message)) = rejected else {
        return;
    };
    match ctx.bind_mut(&field) {
        Ok(mut binding) => binding.set_error(Some(message)),
        Err(e) => tracing::warn!("Cannot flag field \"{field}\": {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::state::{FieldValue, Record};
    use crate::test_support::{ctrl, key, render_to_lines, type_text};
    use serde_json::json;
    use std::time::Duration;

    fn backend_with(records: Vec<Record>) -> MockBackend {
        let mut backend = MockBackend::new();
        backend.expect_list().returning(move |kind| {
            Ok(records.iter().filter(|r| r.kind == kind).cloned().collect())
        });
        backend
    }

    fn app(backend: MockBackend) -> App {
        App::with_backend(Arc::new(backend), AdminConfig::default())
    }

    async fn settle_all(app: &mut App) {
        for _ in 0..100 {
            app.drain_submissions().await;
            if !app.form.as_ref().is_some_and(|f| f.ctx().is_submitting()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("submission never settled");
    }

    mod home {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_enter_opens_create_form_for_selected_kind() {
            let mut app = app(backend_with(Vec::new()));

            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            assert_eq!(app.state.current_view, View::Form);
            let form = app.form.as_ref().unwrap();
            assert_eq!(form.title(), "Skill");
            assert!(!form.ctx().edit_mode());
        }

        #[tokio::test]
        async fn test_edit_without_records_stays_home() {
            let mut app = app(backend_with(Vec::new()));

            app.handle_key(key(KeyCode::Char('e'))).await.unwrap();

            assert_eq!(app.state.current_view, View::Home);
            assert_eq!(
                app.state.status_message.as_deref(),
                Some("No Company to edit yet")
            );
        }

        #[tokio::test]
        async fn test_edit_starts_from_first_record() {
            let record = Record {
                id: 1,
                kind: RecordKind::Company,
                values: [("name", "Acme")].into_iter().collect(),
            };
            let mut app = app(backend_with(vec![record]));

            app.handle_key(key(KeyCode::Char('e'))).await.unwrap();

            let form = app.form.as_ref().unwrap();
            assert!(form.ctx().edit_mode());
            assert_eq!(form.ctx().get_value("name"), Some(&FieldValue::from("Acme")));
        }

        #[tokio::test]
        async fn test_refresh_counts() {
            let records = vec![
                Record {
                    id: 1,
                    kind: RecordKind::Skill,
                    values: [("name", "Rust")].into_iter().collect(),
                },
                Record {
                    id: 2,
                    kind: RecordKind::Skill,
                    values: [("name", "Go")].into_iter().collect(),
                },
            ];
            let mut app = app(backend_with(records));

            app.refresh_counts().await;

            assert_eq!(app.state.record_count(RecordKind::Skill), 2);
            assert_eq!(app.state.record_count(RecordKind::Company), 0);
        }

        #[tokio::test]
        async fn test_error_dialog_is_modal() {
            let mut app = app(backend_with(Vec::new()));
            app.push_error("Disk unavailable");

            app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
            assert!(!app.should_quit());

            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            app.handle_key(key(KeyCode::Char('q'))).await.unwrap();
            assert!(app.should_quit());
        }
    }

    mod submissions {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_successful_create_resets_form_and_reports() {
            let mut backend = backend_with(Vec::new());
            backend
                .expect_save()
                .times(1)
                .returning(|_, _, _| Ok(Some(json!({ "success": true, "id": 5 }))));
            let mut app = app(backend);
            app.open_form(RecordKind::Company, false).await.unwrap();

            for k in type_text("Acme") {
                app.handle_key(k).await.unwrap();
            }
            app.handle_key(ctrl('s')).await.unwrap();
            assert!(app.form.as_ref().unwrap().ctx().is_submitting());

            settle_all(&mut app).await;

            let form = app.form.as_ref().unwrap();
            assert_eq!(form.ctx().get_value("name"), None);
            assert!(form.ctx().response_error().is_none());
            assert_eq!(app.state.status_message.as_deref(), Some("Company saved (#5)"));
        }

        #[tokio::test]
        async fn test_rejected_save_keeps_input_and_shows_error() {
            let mut backend = backend_with(Vec::new());
            backend.expect_save().returning(|_, _, _| {
                Ok(Some(json!({ "success": false, "message": "Name is required" })))
            });
            let mut app = app(backend);
            app.open_form(RecordKind::Company, false).await.unwrap();

            app.handle_key(key(KeyCode::Char(' '))).await.unwrap();
            app.handle_key(ctrl('s')).await.unwrap();
            settle_all(&mut app).await;

            let form = app.form.as_ref().unwrap();
            assert_eq!(form.ctx().get_value("name"), Some(&FieldValue::from(" ")));
            assert_eq!(
                form.ctx().response_error().map(|e| e.message.as_str()),
                Some("Name is required")
            );
            assert_eq!(app.state.status_message, None);
        }

        #[tokio::test]
        async fn test_rejection_naming_a_field_flags_that_field() {
            let mut backend = backend_with(Vec::new());
            backend.expect_save().returning(|_, _, _| {
                Ok(Some(json!({
                    "success": false,
                    "message": "Name is required",
                    "field": "name",
                })))
            });
            let mut app = app(backend);
            app.open_form(RecordKind::Company, false).await.unwrap();

            app.handle_key(ctrl('s')).await.unwrap();
            settle_all(&mut app).await;

            let form = app.form.as_ref().unwrap();
            assert_eq!(form.ctx().field_error("name"), Some("Name is required"));
            let lines = render_to_lines(50, 24, |f| form.render(f, f.area()));
            assert!(lines[2].contains("Name"));
            assert!(lines[5].contains("! Name is required"));
        }

        #[tokio::test]
        async fn test_editing_after_save_clears_status() {
            let mut backend = backend_with(Vec::new());
            backend
                .expect_save()
                .returning(|_, _, _| Ok(Some(json!({ "success": true, "id": 2 }))));
            let mut app = app(backend);
            app.open_form(RecordKind::Skill, false).await.unwrap();

            for k in type_text("Go") {
                app.handle_key(k).await.unwrap();
            }
            app.handle_key(ctrl('s')).await.unwrap();
            settle_all(&mut app).await;
            assert_eq!(app.state.status_message.as_deref(), Some("Skill saved (#2)"));

            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            assert_eq!(app.state.status_message.as_deref(), Some("Skill saved (#2)"));

            app.handle_key(key(KeyCode::BackTab)).await.unwrap();
            app.handle_key(key(KeyCode::Char('R'))).await.unwrap();
            assert_eq!(app.state.status_message, None);
        }

        #[tokio::test]
        async fn test_successful_edit_returns_home() {
            let record = Record {
                id: 1,
                kind: RecordKind::Company,
                values: [("name", "Acme")].into_iter().collect(),
            };
            let mut backend = backend_with(vec![record]);
            backend
                .expect_save()
                .returning(|_, id, _| Ok(Some(json!({ "success": true, "id": id }))));
            let mut app = app(backend);
            app.open_form(RecordKind::Company, true).await.unwrap();

            app.handle_key(ctrl('s')).await.unwrap();
            for _ in 0..100 {
                app.drain_submissions().await;
                if app.form.is_none() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }

            assert_eq!(app.state.current_view, View::Home);
            assert_eq!(app.state.status_message.as_deref(), Some("Company saved (#1)"));
        }

        #[tokio::test]
        async fn test_result_after_cancel_is_dropped() {
            let mut backend = backend_with(Vec::new());
            backend
                .expect_save()
                .returning(|_, _, _| Ok(Some(json!({ "success": true, "id": 9 }))));
            let mut app = app(backend);
            app.open_form(RecordKind::Skill, false).await.unwrap();

            app.handle_key(ctrl('s')).await.unwrap();
            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert_eq!(app.state.current_view, View::Home);

            tokio::time::sleep(Duration::from_millis(10)).await;
            app.drain_submissions().await;

            assert!(app.form.is_none());
            assert_eq!(app.state.status_message, None);
        }
    }
}
