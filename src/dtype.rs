//! Tensor element data types as declared in model configuration
//!
//! Configuration documents spell data types as `TYPE_<TAG>`, e.g. `TYPE_FP32`.
//! Resolution is a two-step parse: validate and strip the prefix, then look
//! the remaining tag up in a closed table. The two failure modes are reported
//! as distinct errors.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix every `data_type` value must carry
pub const TYPE_PREFIX: &str = "TYPE_";

/// Element type of an input or output tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    Bool,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Fp16,
    Fp32,
    Fp64,
    Bf16,
    /// Variable-length byte strings (`TYPE_STRING` in configuration)
    Bytes,
}

impl DataType {
    /// All supported types, in type-table order
    pub const ALL: [DataType; 14] = [
        Self::Bool,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Fp16,
        Self::Fp32,
        Self::Fp64,
        Self::Bf16,
        Self::Bytes,
    ];

    /// Resolve a configuration `data_type` value such as `TYPE_INT64`
    ///
    /// `location` names the field being resolved and is carried into the error.
    ///
    /// # Errors
    /// - `ConfigError::Convention` if the value lacks the `TYPE_` prefix
    /// - `ConfigError::TypeResolution` if the tag after the prefix is unknown
    pub fn from_config_tag(value: &str, location: &str) -> Result<Self> {
        let tag = value
            .strip_prefix(TYPE_PREFIX)
            .ok_or_else(|| ConfigError::convention(location, value))?;

        tag.parse()
            .map_err(|_| ConfigError::type_resolution(location, tag))
    }

    /// Canonical tag name, as the host's type table spells it
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Uint8 => "UINT8",
            Self::Uint16 => "UINT16",
            Self::Uint32 => "UINT32",
            Self::Uint64 => "UINT64",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Fp16 => "FP16",
            Self::Fp32 => "FP32",
            Self::Fp64 => "FP64",
            Self::Bf16 => "BF16",
            Self::Bytes => "BYTES",
        }
    }

    /// Size of one element in bytes, `None` for variable-length strings
    #[must_use]
    pub fn element_size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Uint8 | Self::Int8 => Some(1),
            Self::Uint16 | Self::Int16 | Self::Fp16 | Self::Bf16 => Some(2),
            Self::Uint32 | Self::Int32 | Self::Fp32 => Some(4),
            Self::Uint64 | Self::Int64 | Self::Fp64 => Some(8),
            Self::Bytes => None,
        }
    }
}

/// Error returned when a bare tag is not in the type table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDataType(pub String);

impl fmt::Display for UnknownDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown data type tag: {}", self.0)
    }
}

impl std::error::Error for UnknownDataType {}

impl FromStr for DataType {
    type Err = UnknownDataType;

    /// Parse a bare tag (without the `TYPE_` prefix)
    fn from_str(tag: &str) -> std::result::Result<Self, Self::Err> {
        match tag {
            "BOOL" => Ok(Self::Bool),
            "UINT8" => Ok(Self::Uint8),
            "UINT16" => Ok(Self::Uint16),
            "UINT32" => Ok(Self::Uint32),
            "UINT64" => Ok(Self::Uint64),
            "INT8" => Ok(Self::Int8),
            "INT16" => Ok(Self::Int16),
            "INT32" => Ok(Self::Int32),
            "INT64" => Ok(Self::Int64),
            "FP16" => Ok(Self::Fp16),
            "FP32" => Ok(Self::Fp32),
            "FP64" => Ok(Self::Fp64),
            "BF16" => Ok(Self::Bf16),
            // configuration spells byte strings STRING, the wire type table BYTES
            "STRING" | "BYTES" => Ok(Self::Bytes),
            other => Err(UnknownDataType(other.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
