//! Finalized, read-only description of a loaded model's inputs and outputs
//!
//! A [`ModelAttributeStore`] is built once by the validator and never mutated.
//! Reloading a model builds a fresh store and swaps it into a
//! [`ModelStateHandle`]; readers holding the previous `Arc` keep a consistent
//! view until they drop it.

use crate::{
    backend_kind::BackendKind,
    config::ModelConfigDocument,
    error::Result,
    io_entry::IoAttribute,
    validator::ConfigValidator,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Validated input/output description of one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelAttributeStore {
    input_names: Vec<String>,
    output_names: Vec<String>,
    input_attributes: HashMap<String, IoAttribute>,
    output_attributes: HashMap<String, IoAttribute>,
    backend_kind: BackendKind,
}

impl ModelAttributeStore {
    pub(crate) fn new(
        input_names: Vec<String>,
        output_names: Vec<String>,
        input_attributes: HashMap<String, IoAttribute>,
        output_attributes: HashMap<String, IoAttribute>,
        backend_kind: BackendKind,
    ) -> Self {
        Self {
            input_names,
            output_names,
            input_attributes,
            output_attributes,
            backend_kind,
        }
    }

    /// Input names in document order
    #[must_use]
    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    /// Output names in document order
    #[must_use]
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    #[must_use]
    pub fn input_attributes(&self) -> &HashMap<String, IoAttribute> {
        &self.input_attributes
    }

    #[must_use]
    pub fn output_attributes(&self) -> &HashMap<String, IoAttribute> {
        &self.output_attributes
    }

    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        self.backend_kind
    }

    #[must_use]
    pub fn input(&self, name: &str) -> Option<&IoAttribute> {
        self.input_attributes.get(name)
    }

    #[must_use]
    pub fn output(&self, name: &str) -> Option<&IoAttribute> {
        self.output_attributes.get(name)
    }

    #[must_use]
    pub fn num_inputs(&self) -> usize {
        self.input_names.len()
    }

    #[must_use]
    pub fn num_outputs(&self) -> usize {
        self.output_names.len()
    }
}

/// Shared, swappable reference to the current store of a loaded model
#[derive(Debug)]
pub struct ModelStateHandle {
    current: RwLock<Arc<ModelAttributeStore>>,
}

impl ModelStateHandle {
    #[must_use]
    pub fn new(store: ModelAttributeStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// Validate `document` and wrap the result in a new handle
    ///
    /// # Errors
    /// Any fatal validation error; no handle is created.
    pub fn load(validator: &ConfigValidator, document: &ModelConfigDocument) -> Result<Self> {
        Ok(Self::new(validator.validate(document)?))
    }

    /// Snapshot of the current store
    #[must_use]
    pub fn current(&self) -> Arc<ModelAttributeStore> {
        // the guarded value is a single Arc, a poisoned lock cannot hold a torn store
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Validate `document` and, on success, atomically replace the current
    /// store. On failure the current store is left untouched.
    ///
    /// # Errors
    /// Any fatal validation error from the new document.
    pub fn reload(
        &self,
        validator: &ConfigValidator,
        document: &ModelConfigDocument,
    ) -> Result<Arc<ModelAttributeStore>> {
        let store = Arc::new(validator.validate(document)?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&store);
        tracing::info!(
            inputs = store.num_inputs(),
            outputs = store.num_outputs(),
            backend_kind = %store.backend_kind(),
            "Model configuration reloaded"
        );
        Ok(store)
    }
}
