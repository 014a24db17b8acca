//! Model configuration validation pass
//!
//! Runs once per model load:
//!
//! `Start -> ValidatingInputs -> ValidatingOutputs -> ResolvingBackendKind -> Done`
//!
//! Any failure in the first three stages moves to `Failed` and aborts the load;
//! no store is produced. Backend kind resolution never fails, it only falls
//! back to the default and reports that through the [`LoadObserver`].

use crate::{
    backend_kind::{BackendKind, BackendKindResolution},
    config::{DuplicateNamePolicy, ModelConfigDocument, ValidatorConfig},
    error::{ConfigError, Result},
    io_entry::{IoAttribute, IoEntryValidator, IoKind},
    shape::ShapeResolver,
    store::ModelAttributeStore,
    tracing_config::{events, spans},
};
use serde_json::{Map, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Stage of the validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationStage {
    Start,
    ValidatingInputs,
    ValidatingOutputs,
    ResolvingBackendKind,
    Done,
    Failed,
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::ValidatingInputs => "validating_inputs",
            Self::ValidatingOutputs => "validating_outputs",
            Self::ResolvingBackendKind => "resolving_backend_kind",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Receives non-fatal notices from the validation pass
pub trait LoadObserver: Send + Sync {
    /// The backend kind tag was absent or unrecognized and the default
    /// runtime will be used. `value` is the rejected tag, if any.
    fn on_backend_fallback(&self, model: &str, value: Option<&str>);

    /// The pass entered `stage`
    fn on_stage(&self, _model: &str, _stage: ValidationStage) {}
}

/// Observer that forwards notices to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_backend_fallback(&self, model: &str, value: Option<&str>) {
        events::backend_fallback(model, value, BackendKind::default());
    }

    fn on_stage(&self, model: &str, stage: ValidationStage) {
        tracing::trace!(model = %model, stage = %stage, "Validation stage");
    }
}

/// Validates a model configuration document into a [`ModelAttributeStore`]
pub struct ConfigValidator {
    config: ValidatorConfig,
    entries: IoEntryValidator,
    observer: Arc<dyn LoadObserver>,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl ConfigValidator {
    /// Create a validator that reports notices through `tracing`
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    /// Create a validator with a custom notice observer
    #[must_use]
    pub fn with_observer(config: ValidatorConfig, observer: Arc<dyn LoadObserver>) -> Self {
        let entries = IoEntryValidator::new(ShapeResolver::new(config.allow_string_dims));
        Self {
            config,
            entries,
            observer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Run the full validation pass over `document`
    ///
    /// # Errors
    /// The first fatal `ConfigError` encountered; validation stops there.
    pub fn validate(&self, document: &ModelConfigDocument) -> Result<ModelAttributeStore> {
        let model = self.model_label(document);
        let span = spans::model_config(&model);
        let _enter = span.enter();

        let mut stage = ValidationStage::Start;
        self.observer.on_stage(&model, stage);

        match self.run(document.root(), &model, &mut stage) {
            Ok(store) => {
                self.observer.on_stage(&model, ValidationStage::Done);
                tracing::info!(
                    model = %model,
                    inputs = store.num_inputs(),
                    outputs = store.num_outputs(),
                    backend_kind = %store.backend_kind(),
                    "Model configuration validated"
                );
                Ok(store)
            },
            Err(err) => {
                events::validation_failed(&model, stage, &err);
                self.observer.on_stage(&model, ValidationStage::Failed);
                Err(err)
            },
        }
    }

    /// Convenience wrapper over [`ConfigValidator::validate`] for a raw JSON tree
    ///
    /// # Errors
    /// See [`ConfigValidator::validate`].
    pub fn validate_value(&self, root: Value) -> Result<ModelAttributeStore> {
        self.validate(&ModelConfigDocument::from_value(root))
    }

    fn run(&self, root: &Value, model: &str, stage: &mut ValidationStage) -> Result<ModelAttributeStore> {
        let object = root
            .as_object()
            .ok_or_else(|| ConfigError::wrong_type("<root>", "object", root))?;

        self.advance(model, stage, ValidationStage::ValidatingInputs);
        let (input_names, input_attributes) = self.validate_entries(object, IoKind::Input)?;

        self.advance(model, stage, ValidationStage::ValidatingOutputs);
        let (output_names, output_attributes) = self.validate_entries(object, IoKind::Output)?;

        self.advance(model, stage, ValidationStage::ResolvingBackendKind);
        let resolution = BackendKind::resolve(root);
        if let BackendKindResolution::Fallback { value } = &resolution {
            self.observer.on_backend_fallback(model, value.as_deref());
        }

        Ok(ModelAttributeStore::new(
            input_names,
            output_names,
            input_attributes,
            output_attributes,
            resolution.kind(),
        ))
    }

    fn advance(&self, model: &str, stage: &mut ValidationStage, next: ValidationStage) {
        *stage = next;
        self.observer.on_stage(model, next);
    }

    fn validate_entries(
        &self,
        root: &Map<String, Value>,
        kind: IoKind,
    ) -> Result<(Vec<String>, HashMap<String, IoAttribute>)> {
        let key = kind.config_key();
        let value = root.get(key).ok_or_else(|| ConfigError::missing_field(key))?;
        let entries = value
            .as_array()
            .ok_or_else(|| ConfigError::wrong_type(key, "array", value))?;

        let mut names = Vec::with_capacity(entries.len());
        let mut attributes = HashMap::with_capacity(entries.len());
        let mut first_index: HashMap<String, usize> = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let (name, attribute) = self.entries.validate(kind, index, entry)?;

            match first_index.entry(name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                },
                Entry::Occupied(slot) => match self.config.duplicate_names {
                    DuplicateNamePolicy::Reject => {
                        return Err(ConfigError::duplicate_name(
                            format!("{kind}[{index}].name"),
                            &name,
                            *slot.get(),
                        ));
                    },
                    DuplicateNamePolicy::LastWins => {
                        tracing::warn!(
                            kind = %kind,
                            name = %name,
                            first_index = *slot.get(),
                            index = index,
                            "Duplicate name, later entry replaces earlier attributes"
                        );
                    },
                },
            }

            names.push(name.clone());
            attributes.insert(name, attribute);
        }

        Ok((names, attributes))
    }

    fn model_label(&self, document: &ModelConfigDocument) -> String {
        self.config
            .model_name
            .as_deref()
            .or_else(|| document.model_name())
            .unwrap_or("<unnamed>")
            .to_string()
    }
}
