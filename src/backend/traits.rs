//! Trait abstraction for record persistence to enable mocking in tests

use crate::state::{FormValues, Record, RecordKind};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Record persistence used by the forms and the option loaders
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// List stored records of one kind, oldest first
    async fn list(&self, kind: RecordKind) -> Result<Vec<Record>>;

    /// Create a record (`id` is `None`) or update one.
    ///
    /// Validation problems come back as a reply, not as `Err`:
    /// `{ "success": false, "message": … }` or `{ "error": … }`. `Err` is
    /// reserved for I/O failures. `None` means nothing was produced.
    async fn save(
        &self,
        kind: RecordKind,
        id: Option<u64>,
        values: FormValues,
    ) -> Result<Option<Value>>;
}
