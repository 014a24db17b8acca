//! Execution backend selection from `parameters.xrt`
//!
//! ```json
//! { "parameters": { "xrt": { "string_value": "tensorrt" } } }
//! ```
//!
//! Resolution never fails: a missing or unrecognized tag selects the default
//! OneFlow runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Execution engine variant used to run the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Plain OneFlow runtime
    #[default]
    OneFlow,
    /// OneFlow with the TensorRT XRT engine
    TensorRt,
    /// OneFlow with the OpenVINO XRT engine
    OpenVino,
}

/// Outcome of looking up the backend kind in a configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKindResolution {
    /// A recognized tag was found
    Selected(BackendKind),
    /// No usable tag; the default applies. `value` holds the unrecognized tag
    /// if one was present.
    Fallback { value: Option<String> },
}

impl BackendKindResolution {
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Selected(kind) => *kind,
            Self::Fallback { .. } => BackendKind::default(),
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

impl BackendKind {
    /// Look up `parameters.xrt.string_value` in the configuration root
    ///
    /// Absent `parameters`, absent `xrt`, a missing or non-string
    /// `string_value`, and unknown tags all resolve to a fallback.
    #[must_use]
    pub fn resolve(config: &Value) -> BackendKindResolution {
        let raw = config
            .get("parameters")
            .and_then(|params| params.get("xrt"))
            .and_then(|xrt| xrt.get("string_value"));

        match raw {
            Some(Value::String(tag)) => match tag.parse() {
                Ok(kind) => BackendKindResolution::Selected(kind),
                Err(_) => BackendKindResolution::Fallback {
                    value: Some(tag.clone()),
                },
            },
            Some(other) => BackendKindResolution::Fallback {
                value: Some(other.to_string()),
            },
            None => BackendKindResolution::Fallback { value: None },
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneFlow => "oneflow",
            Self::TensorRt => "tensorrt",
            Self::OpenVino => "openvino",
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "oneflow" => Ok(Self::OneFlow),
            "tensorrt" => Ok(Self::TensorRt),
            "openvino" => Ok(Self::OpenVino),
            _ => Err(format!("Unknown xrt tag: {tag}. Supported: oneflow, tensorrt, openvino")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
