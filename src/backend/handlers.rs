//! Form-facing adapters over a [`Backend`]

use super::traits::Backend;
use crate::state::{
    interpret_reply, FieldValue, FormErrors, FormValues, OptionLoader, RecordKind, SelectOption,
    SubmitHandler, SubmitOutcome, SubmitTrigger,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Saves a form's values as one record
pub struct RecordSubmitHandler {
    backend: Arc<dyn Backend>,
    kind: RecordKind,
    /// Record being edited; `None` creates a new one
    id: Option<u64>,
}

impl RecordSubmitHandler {
    pub fn new(backend: Arc<dyn Backend>, kind: RecordKind, id: Option<u64>) -> Self {
        Self { backend, kind, id }
    }
}

#[async_trait]
impl SubmitHandler for RecordSubmitHandler {
    async fn submit(
        &self,
        values: FormValues,
        _errors: FormErrors,
        trigger: SubmitTrigger,
    ) -> SubmitOutcome {
        tracing::debug!(
            "Saving {} ({:?}, {} fields)",
            self.kind.label(),
            trigger,
            values.len()
        );
        let reply = self.backend.save(self.kind, self.id, values).await?;
        interpret_reply(reply)
    }
}

/// Offers stored records of one kind as options, valued by record id
pub struct RecordOptionLoader {
    backend: Arc<dyn Backend>,
    kind: RecordKind,
}

impl RecordOptionLoader {
    pub fn new(backend: Arc<dyn Backend>, kind: RecordKind) -> Self {
        Self { backend, kind }
    }
}

#[async_trait]
impl OptionLoader for RecordOptionLoader {
    async fn load(&self) -> Result<Vec<SelectOption>> {
        let records = self.backend.list(self.kind).await?;
        Ok(records
            .into_iter()
            .filter_map(|record| {
                let Ok(id) = i64::try_from(record.id) else {
                    tracing::warn!("Skipping {} #{}: id out of range", self.kind.label(), record.id);
                    return None;
                };
                let mut option = SelectOption::new(FieldValue::Int(id), record.display_name());
                let secondary = match self.kind {
                    RecordKind::Company => record.values.text("website"),
                    RecordKind::Skill => record.values.text("category"),
                    _ => "",
                };
                if !secondary.is_empty() {
                    option = option.with_secondary(secondary);
                }
                let logo = record.values.text("logo_url");
                if !logo.is_empty() {
                    option = option.with_avatar(logo);
                }
                Some(option)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::state::{Record, ResponseError};
    use anyhow::anyhow;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn submit_with(backend: MockBackend) -> SubmitOutcome {
        let handler = RecordSubmitHandler::new(Arc::new(backend), RecordKind::Company, Some(3));
        tokio_test::block_on(handler.submit(
            [("name", "Acme")].into_iter().collect(),
            FormErrors::default(),
            SubmitTrigger::Shortcut,
        ))
    }

    #[test]
    fn test_success_reply_passes_through() {
        let mut backend = MockBackend::new();
        backend
            .expect_save()
            .with(eq(RecordKind::Company), eq(Some(3)), mockall::predicate::always())
            .times(1)
            .returning(|_, _, _| Ok(Some(json!({ "success": true, "id": 3 }))));

        assert_eq!(submit_with(backend), Ok(json!({ "success": true, "id": 3 })));
    }

    #[test]
    fn test_rejection_reply_becomes_response_error() {
        let mut backend = MockBackend::new();
        backend.expect_save().returning(|_, _, _| {
            Ok(Some(json!({ "success": false, "message": "Name taken" })))
        });

        let err = submit_with(backend).unwrap_err();
        assert_eq!(err.message, "Name taken");
        assert_eq!(err.metadata.get("success"), Some(&json!(false)));
    }

    #[test]
    fn test_io_failure_becomes_response_error() {
        let mut backend = MockBackend::new();
        backend
            .expect_save()
            .returning(|_, _, _| Err(anyhow!("disk full")));

        assert_eq!(submit_with(backend).unwrap_err().message, "disk full");
    }

    #[test]
    fn test_empty_reply_is_unexpected() {
        let mut backend = MockBackend::new();
        backend.expect_save().returning(|_, _, _| Ok(None));

        assert_eq!(submit_with(backend).unwrap_err(), ResponseError::unexpected());
    }

    #[tokio::test]
    async fn test_loader_maps_records_to_options() {
        let mut backend = MockBackend::new();
        backend
            .expect_list()
            .with(eq(RecordKind::Company))
            .times(1)
            .returning(|kind| {
                Ok(vec![Record {
                    id: 4,
                    kind,
                    values: [("name", "Acme"), ("website", "acme.dev"), ("logo_url", "l.png")]
                        .into_iter()
                        .collect(),
                }])
            });

        let loader = RecordOptionLoader::new(Arc::new(backend), RecordKind::Company);
        let options = loader.load().await.unwrap();

        assert_eq!(
            options,
            vec![SelectOption::new(4i64, "Acme")
                .with_secondary("acme.dev")
                .with_avatar("l.png")]
        );
    }

    #[tokio::test]
    async fn test_loader_skips_ids_beyond_i64() {
        let mut backend = MockBackend::new();
        backend.expect_list().returning(|kind| {
            Ok(vec![
                Record {
                    id: u64::MAX,
                    kind,
                    values: [("name", "Overflow")].into_iter().collect(),
                },
                Record {
                    id: 7,
                    kind,
                    values: [("name", "Rust")].into_iter().collect(),
                },
            ])
        });

        let loader = RecordOptionLoader::new(Arc::new(backend), RecordKind::Skill);
        let options = loader.load().await.unwrap();

        assert_eq!(options, vec![SelectOption::new(7i64, "Rust")]);
    }
}
