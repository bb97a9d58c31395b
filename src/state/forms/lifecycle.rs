//! Submission lifecycle: hand the current values to a handler, then either
//! reset the form or surface a single form-wide error

use super::context::FormContext;
use super::value::{FormErrors, FormValues};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Message used when a handler gives back nothing usable
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Form-wide error produced by the last submission attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ResponseError {
    #[serde(default)]
    pub message: String,
    /// Anything else the handler attached (status codes, flags, ids)
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ResponseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            metadata: Map::new(),
        }
    }

    /// The error synthesized when a handler resolves to nothing
    pub fn unexpected() -> Self {
        Self::new(UNEXPECTED_ERROR_MESSAGE).with_meta("error", Value::Bool(true))
    }

    pub fn with_meta(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Build an error from a failed reply. Object replies keep all their keys
    /// as metadata; the message comes from `message`, or from `error` when that
    /// is a string.
    pub fn from_reply(reply: Value) -> Self {
        match reply {
            Value::Object(mut map) => {
                let message = match map.remove("message") {
                    Some(Value::String(message)) => Some(message),
                    Some(other) => {
                        map.insert("message".to_string(), other);
                        None
                    }
                    None => None,
                };
                let message = message
                    .or_else(|| map.get("error").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_else(|| UNEXPECTED_ERROR_MESSAGE.to_string());
                Self {
                    message,
                    metadata: map,
                }
            }
            Value::String(message) => Self::new(message),
            _ => Self::unexpected(),
        }
    }
}

impl From<anyhow::Error> for ResponseError {
    fn from(err: anyhow::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Outcome a submit handler reports
pub type SubmitOutcome = Result<Value, ResponseError>;

/// Loose falsiness of a JSON reply
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n == 0.0 || n.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Normalize a loosely shaped reply into a [`SubmitOutcome`].
///
/// A missing or falsy reply, a truthy `error` key, or `success: false` each
/// count as failure. Anything else is success.
pub fn interpret_reply(reply: Option<Value>) -> SubmitOutcome {
    let Some(reply) = reply.filter(|r| !is_falsy(r)) else {
        return Err(ResponseError::unexpected());
    };

    let has_error = reply.get("error").is_some_and(|e| !is_falsy(e));
    let explicit_failure = reply.get("success") == Some(&Value::Bool(false));

    if has_error || explicit_failure {
        Err(ResponseError::from_reply(reply))
    } else {
        Ok(reply)
    }
}

/// What set the submission off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmitTrigger {
    /// Enter on the submit button
    SubmitButton,
    /// The save shortcut pressed from any field
    Shortcut,
}

/// Persistence collaborator injected by the page that owns the form
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn submit(
        &self,
        values: FormValues,
        errors: FormErrors,
        trigger: SubmitTrigger,
    ) -> SubmitOutcome;
}

/// Observable submission state of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    SettledError,
}

/// Identifies one submission attempt of one form instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    pub form_id: Uuid,
    pub attempt: u64,
}

/// Everything a handler needs for one attempt, captured when it started
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    pub ticket: SubmitTicket,
    pub values: FormValues,
    pub errors: FormErrors,
    pub trigger: SubmitTrigger,
}

impl FormContext {
    /// Start an attempt: raise the loading flag and snapshot values and errors.
    ///
    /// Nothing is cleared here; the previous response error stays visible until
    /// this attempt settles. A second call before the first settles is not
    /// rejected, both attempts settle independently.
    pub fn begin_submit(&mut self, trigger: SubmitTrigger) -> PendingSubmit {
        self.in_flight += 1;
        self.next_attempt += 1;
        let ticket = SubmitTicket {
            form_id: self.id,
            attempt: self.next_attempt,
        };
        tracing::debug!("Form {} submitting (attempt {})", self.id, ticket.attempt);
        PendingSubmit {
            ticket,
            values: self.store.values().clone(),
            errors: self.store.errors().clone(),
            trigger,
        }
    }

    /// Apply the outcome of an attempt.
    ///
    /// Success resets the store and clears the response error. Failure stores
    /// the error and leaves the values as the user typed them. Tickets from
    /// another form, or any ticket once the form is unmounted, are dropped.
    pub fn settle(&mut self, ticket: SubmitTicket, outcome: SubmitOutcome) -> SubmitState {
        if ticket.form_id != self.id || !self.is_mounted() {
            tracing::debug!(
                "Dropping result of attempt {} for form {}: no longer mounted",
                ticket.attempt,
                ticket.form_id
            );
            return self.state();
        }

        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome {
            Ok(_) => {
                self.reset_form();
                self.set_response_error(None);
                tracing::info!("Form {} submitted (attempt {})", self.id, ticket.attempt);
            }
            Err(err) => {
                tracing::warn!("Form {} submission failed: {}", self.id, err.message);
                self.set_response_error(Some(err));
            }
        }
        self.state()
    }

    /// Run one attempt inline against `handler`
    #[allow(dead_code)] // the app splits this into begin_submit and settle around a spawned task
    pub async fn submit<H>(&mut self, handler: &H, trigger: SubmitTrigger) -> SubmitState
    where
        H: SubmitHandler + ?Sized,
    {
        let PendingSubmit {
            ticket,
            values,
            errors,
            trigger,
        } = self.begin_submit(trigger);
        let outcome = handler.submit(values, errors, trigger).await;
        self.settle(ticket, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::FieldValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn form() -> FormContext {
        FormContext::new([("name", "A")].into_iter().collect(), false)
    }

    fn handler_returning(outcome: SubmitOutcome) -> MockSubmitHandler {
        let mut handler = MockSubmitHandler::new();
        handler
            .expect_submit()
            .times(1)
            .return_once(move |_, _, _| outcome);
        handler
    }

    mod interpret {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_success_object_passes_through() {
            let reply = json!({ "success": true, "id": "c-1" });
            assert_eq!(interpret_reply(Some(reply.clone())), Ok(reply));
        }

        #[test]
        fn test_object_without_flags_is_success() {
            assert!(interpret_reply(Some(json!({ "id": 4 }))).is_ok());
        }

        #[test]
        fn test_missing_reply_synthesizes_unexpected_error() {
            let err = interpret_reply(None).unwrap_err();
            assert_eq!(
                serde_json::to_value(&err).unwrap(),
                json!({ "error": true, "message": "An unexpected error occurred" })
            );
        }

        #[test]
        fn test_falsy_replies_fail() {
            for reply in [json!(null), json!(false), json!(0), json!("")] {
                assert_eq!(interpret_reply(Some(reply)), Err(ResponseError::unexpected()));
            }
        }

        #[test]
        fn test_success_false_keeps_message_and_metadata() {
            let err = interpret_reply(Some(json!({ "success": false, "message": "X", "code": 409 })))
                .unwrap_err();
            assert_eq!(err.message, "X");
            assert_eq!(err.metadata.get("code"), Some(&json!(409)));
            assert_eq!(err.metadata.get("success"), Some(&json!(false)));
        }

        #[test]
        fn test_truthy_error_flag_fails() {
            let err = interpret_reply(Some(json!({ "error": "Name taken" }))).unwrap_err();
            assert_eq!(err.message, "Name taken");
        }

        #[test]
        fn test_falsy_error_flag_is_ignored() {
            assert!(interpret_reply(Some(json!({ "error": false, "success": true }))).is_ok());
            assert!(interpret_reply(Some(json!({ "error": null }))).is_ok());
        }
    }

    mod lifecycle {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_success_resets_values_and_clears_error() {
            let mut ctx = form();
            ctx.set_field_value("name", "B".into());
            ctx.set_field_error("name", Some("meh".to_string()));
            ctx.set_response_error(Some(ResponseError::new("old")));

            let handler = handler_returning(Ok(json!({ "success": true })));
            let state = ctx.submit(&handler, SubmitTrigger::SubmitButton).await;

            assert_eq!(state, SubmitState::Idle);
            assert_eq!(ctx.get_value("name"), Some(&FieldValue::from("A")));
            assert!(ctx.errors().is_empty());
            assert!(ctx.response_error().is_none());
            assert!(!ctx.is_submitting());
        }

        #[tokio::test]
        async fn test_explicit_failure_keeps_user_input() {
            let mut ctx = form();
            ctx.set_field_value("name", "B".into());
            let before = ctx.values().clone();

            let handler = handler_returning(interpret_reply(Some(
                json!({ "success": false, "message": "X" }),
            )));
            let state = ctx.submit(&handler, SubmitTrigger::Shortcut).await;

            assert_eq!(state, SubmitState::SettledError);
            assert_eq!(ctx.response_error().unwrap().message, "X");
            assert_eq!(ctx.values(), &before);
        }

        #[tokio::test]
        async fn test_thrown_error_is_stored_and_loading_cleared() {
            let mut ctx = form();
            let thrown = ResponseError::new("connection refused").with_meta("status", json!(503));
            let handler = handler_returning(Err(thrown.clone()));

            ctx.submit(&handler, SubmitTrigger::SubmitButton).await;

            assert_eq!(ctx.response_error(), Some(&thrown));
            assert!(!ctx.is_submitting());
        }

        #[tokio::test]
        async fn test_empty_reply_yields_unexpected_error() {
            let mut ctx = form();
            let handler = handler_returning(interpret_reply(None));

            ctx.submit(&handler, SubmitTrigger::SubmitButton).await;

            let err = ctx.response_error().unwrap();
            assert_eq!(err.message, UNEXPECTED_ERROR_MESSAGE);
            assert_eq!(err.metadata.get("error"), Some(&json!(true)));
        }

        #[tokio::test]
        async fn test_handler_receives_current_snapshot() {
            let mut ctx = form();
            ctx.set_field_value("name", "B".into());
            ctx.set_field_error("slug", Some("Taken".to_string()));

            let mut handler = MockSubmitHandler::new();
            handler
                .expect_submit()
                .withf(|values, errors, trigger| {
                    values.text("name") == "B"
                        && errors.get("slug") == Some("Taken")
                        && *trigger == SubmitTrigger::Shortcut
                })
                .times(1)
                .returning(|_, _, _| Ok(json!({ "success": true })));

            ctx.submit(&handler, SubmitTrigger::Shortcut).await;
        }

        #[test]
        fn test_begin_submit_keeps_previous_error_until_settled() {
            let mut ctx = form();
            ctx.set_response_error(Some(ResponseError::new("first")));

            let pending = ctx.begin_submit(SubmitTrigger::SubmitButton);
            assert_eq!(ctx.state(), SubmitState::Submitting);
            assert_eq!(ctx.response_error().unwrap().message, "first");

            ctx.settle(pending.ticket, Err(ResponseError::new("second")));
            assert_eq!(ctx.response_error().unwrap().message, "second");
        }

        #[test]
        fn test_retry_after_error_succeeds() {
            let mut ctx = form();
            ctx.set_field_value("name", "B".into());
            let first = ctx.begin_submit(SubmitTrigger::SubmitButton);
            assert_eq!(
                ctx.settle(first.ticket, Err(ResponseError::new("nope"))),
                SubmitState::SettledError
            );

            let second = ctx.begin_submit(SubmitTrigger::SubmitButton);
            assert_eq!(ctx.settle(second.ticket, Ok(json!({}))), SubmitState::Idle);
            assert_eq!(ctx.get_value("name"), Some(&FieldValue::from("A")));
        }

        #[test]
        fn test_concurrent_attempts_settle_independently() {
            let mut ctx = form();
            let first = ctx.begin_submit(SubmitTrigger::SubmitButton);
            let second = ctx.begin_submit(SubmitTrigger::SubmitButton);
            assert_ne!(first.ticket, second.ticket);

            ctx.settle(second.ticket, Err(ResponseError::new("late one failed")));
            assert!(ctx.is_submitting());

            ctx.settle(first.ticket, Ok(json!({ "success": true })));
            assert!(!ctx.is_submitting());
            assert!(ctx.response_error().is_none());
        }

        #[test]
        fn test_result_after_unmount_is_dropped() {
            let mut ctx = form();
            ctx.set_field_value("name", "B".into());
            let pending = ctx.begin_submit(SubmitTrigger::SubmitButton);
            ctx.unmount();

            ctx.settle(pending.ticket, Ok(json!({ "success": true })));

            assert_eq!(ctx.get_value("name"), Some(&FieldValue::from("B")));
        }

        #[test]
        fn test_ticket_from_other_form_is_ignored() {
            let mut ctx = form();
            let mut other = form();
            let foreign = other.begin_submit(SubmitTrigger::SubmitButton);

            ctx.set_field_value("name", "B".into());
            ctx.settle(foreign.ticket, Ok(json!({})));

            assert_eq!(ctx.get_value("name"), Some(&FieldValue::from("B")));
        }
    }

    #[test]
    fn test_response_error_displays_message() {
        assert_eq!(ResponseError::new("Boom").to_string(), "Boom");
    }

    #[test]
    fn test_block_on_submit_outside_runtime() {
        let mut ctx = form();
        let handler = handler_returning(Ok(json!({ "success": true })));
        let state = tokio_test::block_on(ctx.submit(&handler, SubmitTrigger::SubmitButton));
        assert_eq!(state, SubmitState::Idle);
    }
}
