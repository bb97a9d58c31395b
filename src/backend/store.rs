//! JSON file record store
//!
//! Records live in a single file. Every save rewrites it; the whole file is
//! small enough that partial updates are not worth the trouble.

use super::traits::Backend;
use crate::state::{slugify, FieldValue, FormValues, Record, RecordKind};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not a valid record store: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: u64,
    records: Vec<Record>,
}

/// Records kept in a JSON file on local disk
pub struct LocalStore {
    path: PathBuf,
    data: Mutex<StoreFile>,
}

impl LocalStore {
    /// Open the store at `path`, starting empty when the file does not exist yet
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No record store at {}, starting empty", path.display());
                StoreFile::default()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, data: &StoreFile) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(data).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(write_err)
    }

    /// Reply describing why `values` cannot be saved, if anything is wrong
    fn rejection(
        data: &StoreFile,
        kind: RecordKind,
        id: Option<u64>,
        values: &FormValues,
    ) -> Option<Value> {
        let required = kind.required_field();
        if values.text(required).trim().is_empty() {
            return Some(json!({
                "success": false,
                "message": format!("{} is required", capitalize(required)),
                "field": required,
            }));
        }

        if kind == RecordKind::Company {
            let name = values.text("name").trim();
            let taken = data.records.iter().any(|r| {
                r.kind == kind
                    && Some(r.id) != id
                    && r.values.text("name").trim().eq_ignore_ascii_case(name)
            });
            if taken {
                return Some(json!({
                    "success": false,
                    "message": format!("A company named \"{name}\" already exists"),
                }));
            }
        }
        None
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fill in values derived from others
fn normalize(kind: RecordKind, mut values: FormValues) -> FormValues {
    if kind == RecordKind::Company && values.text("slug").is_empty() {
        let slug = slugify(values.text("name"));
        values.insert("slug", FieldValue::Text(slug));
    }
    values
}

#[async_trait]
impl Backend for LocalStore {
    async fn list(&self, kind: RecordKind) -> Result<Vec<Record>> {
        let data = self.data.lock().await;
        Ok(data
            .records
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect())
    }

    async fn save(
        &self,
        kind: RecordKind,
        id: Option<u64>,
        values: FormValues,
    ) -> Result<Option<Value>> {
        let mut data = self.data.lock().await;

        if let Some(reply) = Self::rejection(&data, kind, id, &values) {
            tracing::debug!("Rejected {} save: {reply}", kind.label());
            return Ok(Some(reply));
        }
        let values = normalize(kind, values);

        let saved_id = match id {
            Some(id) => {
                let existing = data
                    .records
                    .iter_mut()
                    .find(|r| r.id == id && r.kind == kind);
                let Some(record) = existing else {
                    return Ok(Some(json!({ "error": "Record not found", "id": id })));
                };
                record.values = values;
                id
            }
            None => {
                data.next_id += 1;
                let id = data.next_id;
                data.records.push(Record { id, kind, values });
                id
            }
        };

        self.persist(&data).await?;
        tracing::info!("Saved {} #{saved_id}", kind.label());
        Ok(Some(json!({ "success": true, "id": saved_id })))
    }
}
