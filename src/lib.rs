#![allow(clippy::missing_errors_doc)]

//! # OneFlow Backend Model Configuration
//!
//! Validates and parses a model's declarative I/O configuration at model-load
//! time, producing a typed, queryable description of every input and output
//! tensor plus the execution backend selected through `parameters.xrt`.
//!
//! ## Configuration format
//!
//! ```json
//! {
//!   "input":  [ { "name": "IMAGE", "data_type": "TYPE_FP32", "dims": [3, 224, 224] } ],
//!   "output": [ { "name": "PROB",  "data_type": "TYPE_FP32", "dims": [1000],
//!                 "reshape": { "shape": [1, 1000] } } ],
//!   "parameters": { "xrt": { "string_value": "tensorrt" } }
//! }
//! ```
//!
//! - `data_type` must be `TYPE_` followed by a known tag.
//! - `reshape.shape`, when present, replaces `dims` entirely.
//! - `parameters.xrt.string_value` is optional; unknown or missing values fall
//!   back to the plain OneFlow runtime with an informational notice.
//!
//! ## Quick Start
//!
//! ```rust
//! use oneflow_backend::{BackendKind, ConfigValidator, DataType, ModelConfigDocument};
//!
//! # fn main() -> oneflow_backend::Result<()> {
//! let document = ModelConfigDocument::from_json(r#"{
//!     "input":  [{"name": "IMAGE", "data_type": "TYPE_FP32", "dims": [3, 224, 224]}],
//!     "output": [{"name": "PROB",  "data_type": "TYPE_FP32", "dims": [1000]}]
//! }"#)?;
//!
//! let store = ConfigValidator::default().validate(&document)?;
//! assert_eq!(store.input_names(), ["IMAGE"]);
//! assert_eq!(store.input_attributes()["IMAGE"].data_type, DataType::Fp32);
//! assert_eq!(store.backend_kind(), BackendKind::OneFlow);
//! # Ok(())
//! # }
//! ```
//!
//! ## Reloading
//!
//! A validated store is immutable. [`ModelStateHandle`] hands out `Arc`
//! snapshots to request paths and swaps in a freshly validated store on
//! reload, leaving the old one untouched for readers still holding it.
//!
//! ## Feature Flags
//!
//! - `cli` (default): the `oneflow-config-check` binary and subscriber setup
//! - `tracing-json`: JSON log output for the CLI
//! - `tracing-files`: log to a file instead of stderr

pub mod backend_kind;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dtype;
pub mod error;
pub mod io_entry;
pub mod shape;
pub mod store;
pub mod tracing_config;
pub mod validator;

// Public API exports
pub use backend_kind::{BackendKind, BackendKindResolution};
pub use config::{DuplicateNamePolicy, ModelConfigDocument, ValidatorConfig, ValidatorConfigBuilder};
pub use dtype::{DataType, TYPE_PREFIX};
pub use error::{ConfigError, Result};
pub use io_entry::{IoAttribute, IoEntryValidator, IoKind};
pub use shape::{ShapeResolver, DYNAMIC_DIM};
pub use store::{ModelAttributeStore, ModelStateHandle};
pub use validator::{ConfigValidator, LoadObserver, TracingObserver, ValidationStage};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat, TracingGuard, TracingOutput};

/// Validate a JSON configuration string with default options
///
/// # Examples
///
/// ```rust
/// let err = oneflow_backend::validate_model_config(
///     r#"{"input": [{"name": "x", "data_type": "FP32", "dims": [1]}], "output": []}"#,
/// )
/// .unwrap_err();
/// assert!(matches!(err, oneflow_backend::ConfigError::Convention { .. }));
/// ```
pub fn validate_model_config(json: &str) -> Result<ModelAttributeStore> {
    let document = ModelConfigDocument::from_json(json)?;
    ConfigValidator::default().validate(&document)
}
