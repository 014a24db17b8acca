//! Shape resolution for input and output entries
//!
//! An entry's shape comes from `reshape.shape` when a `reshape` object is
//! present, otherwise from the entry's own `dims`. The two are never merged.

use crate::error::{json_type_name, ConfigError, Result};
use serde_json::{Map, Value};

/// Dimension value meaning "size known only at request time"
pub const DYNAMIC_DIM: i64 = -1;

/// Resolves the dimension list of a single configuration entry
#[derive(Debug, Clone, Copy)]
pub struct ShapeResolver {
    allow_string_dims: bool,
}

impl Default for ShapeResolver {
    fn default() -> Self {
        Self {
            allow_string_dims: true,
        }
    }
}

impl ShapeResolver {
    #[must_use]
    pub fn new(allow_string_dims: bool) -> Self {
        Self { allow_string_dims }
    }

    /// Resolve the shape of `entry`, whose location is `entry_location`
    /// (e.g. `input[0]`)
    ///
    /// # Errors
    /// - `ConfigError::Schema` if `reshape` is not an object, `reshape.shape`
    ///   is missing, or neither `reshape` nor `dims` is present
    /// - `ConfigError::ShapeParse` for malformed dimension values
    pub fn resolve(&self, entry: &Map<String, Value>, entry_location: &str) -> Result<Vec<i64>> {
        if let Some(reshape) = entry.get("reshape") {
            let location = format!("{entry_location}.reshape");
            let reshape = reshape
                .as_object()
                .ok_or_else(|| ConfigError::wrong_type(&location, "object", reshape))?;
            let shape_location = format!("{location}.shape");
            let shape = reshape
                .get("shape")
                .ok_or_else(|| ConfigError::missing_field(&shape_location))?;
            return self.parse_dims(shape, &shape_location);
        }

        let dims_location = format!("{entry_location}.dims");
        let dims = entry
            .get("dims")
            .ok_or_else(|| ConfigError::missing_field(&dims_location))?;
        self.parse_dims(dims, &dims_location)
    }

    /// Parse a JSON array of dimension sizes
    ///
    /// Each element must be an integer that is either [`DYNAMIC_DIM`] or
    /// non-negative. When string dimensions are allowed, decimal strings are
    /// accepted too.
    ///
    /// # Errors
    /// - `ConfigError::Schema` if `value` is not an array
    /// - `ConfigError::ShapeParse` naming the first bad element
    pub fn parse_dims(&self, value: &Value, location: &str) -> Result<Vec<i64>> {
        let array = value
            .as_array()
            .ok_or_else(|| ConfigError::wrong_type(location, "array", value))?;

        array
            .iter()
            .enumerate()
            .map(|(index, element)| self.parse_dim(element, &format!("{location}[{index}]")))
            .collect()
    }

    fn parse_dim(&self, element: &Value, location: &str) -> Result<i64> {
        let dim = match element {
            Value::Number(number) => number.as_i64().ok_or_else(|| {
                ConfigError::shape_parse(
                    location,
                    format!("expected a 64-bit integer, found {number}"),
                )
            })?,
            Value::String(text) if self.allow_string_dims => {
                text.trim().parse::<i64>().map_err(|_| {
                    ConfigError::shape_parse(
                        location,
                        format!("expected an integer string, found '{text}'"),
                    )
                })?
            },
            other => {
                return Err(ConfigError::shape_parse(
                    location,
                    format!("expected an integer, found {}", json_type_name(other)),
                ))
            },
        };

        if dim < DYNAMIC_DIM {
            return Err(ConfigError::shape_parse(
                location,
                format!("dimension {dim} is invalid, use -1 for a dynamic dimension"),
            ));
        }

        Ok(dim)
    }
}
