//! Validation of a single `input` or `output` entry

use crate::{
    dtype::DataType,
    error::{ConfigError, Result},
    shape::{ShapeResolver, DYNAMIC_DIM},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which configuration array an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoKind {
    Input,
    Output,
}

impl IoKind {
    /// Key of the array holding entries of this kind
    #[must_use]
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for IoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Normalized description of one input or output tensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoAttribute {
    /// Element type
    pub data_type: DataType,
    /// Dimension sizes, `-1` marks a dynamic dimension
    pub shape: Vec<i64>,
    /// Reserved ordinal, always zero
    pub order_index: u32,
}

impl IoAttribute {
    #[must_use]
    pub fn new(data_type: DataType, shape: Vec<i64>) -> Self {
        Self {
            data_type,
            shape,
            order_index: 0,
        }
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// True if any dimension is only known at request time
    #[must_use]
    pub fn has_dynamic_dims(&self) -> bool {
        self.shape.contains(&DYNAMIC_DIM)
    }

    /// Number of elements for a fully static shape, `None` if any dimension
    /// is dynamic or the product overflows
    #[must_use]
    pub fn element_count(&self) -> Option<i64> {
        if self.has_dynamic_dims() {
            return None;
        }
        self.shape
            .iter()
            .try_fold(1_i64, |acc, &dim| acc.checked_mul(dim))
    }
}

/// Turns one configuration entry into a `(name, IoAttribute)` pair
#[derive(Debug, Clone, Copy, Default)]
pub struct IoEntryValidator {
    shapes: ShapeResolver,
}

impl IoEntryValidator {
    #[must_use]
    pub fn new(shapes: ShapeResolver) -> Self {
        Self { shapes }
    }

    /// Validate entry `index` of the `kind` array
    ///
    /// No partial record is produced: the first failing field aborts the entry.
    ///
    /// # Errors
    /// - `ConfigError::Schema` for a non-object entry or a missing, mistyped or
    ///   empty `name` / `data_type`
    /// - `ConfigError::Convention` / `ConfigError::TypeResolution` from data
    ///   type resolution
    /// - `ConfigError::Schema` / `ConfigError::ShapeParse` from shape resolution
    pub fn validate(&self, kind: IoKind, index: usize, entry: &Value) -> Result<(String, IoAttribute)> {
        let location = format!("{kind}[{index}]");
        let object = entry
            .as_object()
            .ok_or_else(|| ConfigError::wrong_type(&location, "object", entry))?;

        let name = required_string(object, &location, "name")?;
        if name.is_empty() {
            return Err(ConfigError::schema(
                format!("{location}.name"),
                "name must not be empty",
            ));
        }

        let data_type_location = format!("{location}.data_type");
        let data_type_tag = required_string(object, &location, "data_type")?;
        let shape = self.shapes.resolve(object, &location)?;
        let data_type = DataType::from_config_tag(data_type_tag, &data_type_location)?;

        tracing::debug!(
            kind = %kind,
            index = index,
            name = %name,
            data_type = %data_type,
            shape = ?shape,
            "Validated configuration entry"
        );

        Ok((name.to_string(), IoAttribute::new(data_type, shape)))
    }
}

fn required_string<'a>(
    object: &'a serde_json::Map<String, Value>,
    location: &str,
    field: &str,
) -> Result<&'a str> {
    let field_location = format!("{location}.{field}");
    let value = object
        .get(field)
        .ok_or_else(|| ConfigError::missing_field(&field_location))?;
    value
        .as_str()
        .ok_or_else(|| ConfigError::wrong_type(&field_location, "string", value))
}
