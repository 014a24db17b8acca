//! Error types for model configuration validation

use thiserror::Error;

/// Result type alias for configuration validation
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Fatal errors raised while validating a model configuration document.
///
/// Every variant except `Document` and `Io` carries the location of the
/// offending field (for example `input[1].data_type`), so the host can report
/// exactly which entry made the model unloadable.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File access errors when loading a document from disk
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON
    #[error("Malformed configuration document: {0}")]
    Document(#[from] serde_json::Error),

    /// Required field missing or a field has the wrong JSON type
    #[error("Schema error at '{location}': {message}")]
    Schema { location: String, message: String },

    /// `data_type` does not follow the `TYPE_<TAG>` convention
    #[error("Convention error at '{location}': data type '{value}' must start with TYPE_ (expected TYPE_<TAG>)")]
    Convention { location: String, value: String },

    /// `data_type` prefix is present but the tag is not a known type
    #[error("Type resolution error at '{location}': unknown data type tag '{tag}'")]
    TypeResolution { location: String, tag: String },

    /// A dimension array holds a non-integer or out-of-range element
    #[error("Shape parse error at '{location}': {message}")]
    ShapeParse { location: String, message: String },
}

impl ConfigError {
    /// Create a new schema error
    pub fn schema<L: Into<String>, S: Into<String>>(location: L, message: S) -> Self {
        Self::Schema {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a new convention error for a data type missing its prefix
    pub fn convention<L: Into<String>, S: Into<String>>(location: L, value: S) -> Self {
        Self::Convention {
            location: location.into(),
            value: value.into(),
        }
    }

    /// Create a new type resolution error
    pub fn type_resolution<L: Into<String>, S: Into<String>>(location: L, tag: S) -> Self {
        Self::TypeResolution {
            location: location.into(),
            tag: tag.into(),
        }
    }

    /// Create a new shape parse error
    pub fn shape_parse<L: Into<String>, S: Into<String>>(location: L, message: S) -> Self {
        Self::ShapeParse {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a missing-field schema error
    pub fn missing_field<L: Into<String>>(location: L) -> Self {
        Self::schema(location, "required field is missing")
    }

    /// Create a wrong-type schema error
    pub fn wrong_type<L: Into<String>>(location: L, expected: &str, found: &serde_json::Value) -> Self {
        Self::schema(
            location,
            format!("expected {expected}, found {}", json_type_name(found)),
        )
    }

    /// Create a duplicate-name schema error
    pub fn duplicate_name<L: Into<String>>(location: L, name: &str, first_index: usize) -> Self {
        Self::schema(
            location,
            format!("duplicate name '{name}' (first declared at index {first_index})"),
        )
    }

    /// Location of the offending field, if the error is tied to one
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Schema { location, .. }
            | Self::Convention { location, .. }
            | Self::TypeResolution { location, .. }
            | Self::ShapeParse { location, .. } => Some(location),
            Self::Io(_) | Self::Document(_) => None,
        }
    }
}

/// Human-readable JSON type name used in schema messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
