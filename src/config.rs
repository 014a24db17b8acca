//! Configuration types for model configuration validation

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// What to do when two entries in the same array share a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
    /// Fail the load with a schema error
    #[default]
    Reject,
    /// Keep loading; the later entry's attributes replace the earlier ones and
    /// the name is listed once per declaration
    LastWins,
}

/// Options controlling the validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Duplicate input/output name handling
    pub duplicate_names: DuplicateNamePolicy,

    /// Accept dimensions written as decimal strings (`"224"`)
    pub allow_string_dims: bool,

    /// Model name used to label log output
    pub model_name: Option<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            duplicate_names: DuplicateNamePolicy::default(),
            allow_string_dims: true, // protobuf JSON renders int64 as strings
            model_name: None,
        }
    }
}

impl ValidatorConfig {
    /// Create a new configuration builder
    ///
    /// # Examples
    ///
    /// ```rust
    /// use oneflow_backend::{DuplicateNamePolicy, ValidatorConfig};
    ///
    /// let config = ValidatorConfig::builder()
    ///     .duplicate_names(DuplicateNamePolicy::LastWins)
    ///     .model_name("resnet50")
    ///     .build();
    /// assert_eq!(config.model_name.as_deref(), Some("resnet50"));
    /// ```
    #[must_use]
    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::default()
    }

    /// Name used in log output, `"<unnamed>"` when not configured
    #[must_use]
    pub fn display_model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Builder for `ValidatorConfig`
#[derive(Debug, Default)]
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Set duplicate name policy
    #[must_use]
    pub fn duplicate_names(mut self, policy: DuplicateNamePolicy) -> Self {
        self.config.duplicate_names = policy;
        self
    }

    /// Allow or reject string-encoded dimensions
    #[must_use]
    pub fn allow_string_dims(mut self, allow: bool) -> Self {
        self.config.allow_string_dims = allow;
        self
    }

    /// Set the model name used in log output
    #[must_use]
    pub fn model_name<S: Into<String>>(mut self, name: S) -> Self {
        self.config.model_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ValidatorConfig {
        self.config
    }
}

/// An in-memory model configuration document
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfigDocument {
    root: Value,
}

impl ModelConfigDocument {
    /// Wrap an already-parsed JSON tree
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse a document from JSON text
    ///
    /// # Errors
    /// - `ConfigError::Document` if the text is not valid JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_value(serde_json::from_str(json)?))
    }

    /// Read and parse a document from a JSON file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Document` if the contents are not valid JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read model config '{}': {e}", path.display()),
            ))
        })?;
        Self::from_json(&content)
    }

    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The `name` field of the document, if present
    #[must_use]
    pub fn model_name(&self) -> Option<&str> {
        self.root.get("name").and_then(Value::as_str)
    }
}

impl From<Value> for ModelConfigDocument {
    fn from(root: Value) -> Self {
        Self::from_value(root)
    }
}
