//! Option lists for select-style adapters, static or loaded once on demand

use super::value::FieldValue;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A selectable option.
///
/// Plain selects only use `value` and `label`. List-style adapters also show
/// `secondary` text and an avatar; for those the value doubles as the item id
/// and the label as its primary text.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: FieldValue,
    pub label: String,
    pub secondary: Option<String>,
    pub avatar_url: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<FieldValue>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            secondary: None,
            avatar_url: None,
        }
    }

    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }

    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

/// Async source of options, injected by the page
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<SelectOption>>;
}

/// Options held by one adapter instance
#[derive(Default)]
pub struct OptionSet {
    options: Vec<SelectOption>,
    loader: Option<Arc<dyn OptionLoader>>,
    loaded: bool,
}

impl fmt::Debug for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSet")
            .field("options", &self.options)
            .field("lazy", &self.loader.is_some())
            .field("loaded", &self.loaded)
            .finish()
    }
}

impl OptionSet {
    /// Options known up front
    pub fn fixed(options: Vec<SelectOption>) -> Self {
        Self {
            options,
            loader: None,
            loaded: true,
        }
    }

    /// Options fetched through `loader` the first time they are needed
    pub fn lazy(loader: Arc<dyn OptionLoader>) -> Self {
        Self {
            options: Vec::new(),
            loader: Some(loader),
            loaded: false,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn needs_load(&self) -> bool {
        self.loader.is_some() && !self.loaded
    }

    /// Fetch the options once. The loaded flag is raised before awaiting, so a
    /// second call while the first is pending does not fetch again. A failed
    /// load is logged and keeps whatever options were there.
    pub async fn ensure_loaded(&mut self) {
        if !self.needs_load() {
            return;
        }
        self.loaded = true;

        let Some(loader) = self.loader.clone() else {
            return;
        };
        match loader.load().await {
            Ok(options) => {
                tracing::debug!("Loaded {} options", options.len());
                self.options = options;
            }
            Err(e) => {
                tracing::warn!("Failed to load options: {e:#}");
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&SelectOption> {
        self.options.get(index)
    }

    pub fn position(&self, value: &FieldValue) -> Option<usize> {
        self.options.iter().position(|o| &o.value == value)
    }

    pub fn label_for(&self, value: &FieldValue) -> Option<&str> {
        self.options
            .iter()
            .find(|o| &o.value == value)
            .map(|o| o.label.as_str())
    }
}
