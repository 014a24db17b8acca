//! Loading from disk, reload semantics and concurrent readers

use oneflow_backend::{
    BackendKind, ConfigError, ConfigValidator, ModelConfigDocument, ModelStateHandle,
};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::thread;
use tempfile::NamedTempFile;

fn document(input_name: &str, xrt: &str) -> ModelConfigDocument {
    ModelConfigDocument::from_value(json!({
        "input": [{"name": input_name, "data_type": "TYPE_FP32", "dims": [-1, 3]}],
        "output": [{"name": "OUT", "data_type": "TYPE_FP32", "dims": [-1, 10]}],
        "parameters": {"xrt": {"string_value": xrt}}
    }))
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "name": "resnet50_oneflow",
            "input": [{{"name": "INPUT_0", "data_type": "TYPE_FP32", "dims": [1, 3, 224, 224]}}],
            "output": [{{"name": "OUTPUT_0", "data_type": "TYPE_FP32", "dims": [1, 1000]}}]
        }}"#
    )
    .unwrap();

    let document = ModelConfigDocument::from_file(file.path()).unwrap();
    assert_eq!(document.model_name(), Some("resnet50_oneflow"));

    let handle = ModelStateHandle::load(&ConfigValidator::default(), &document).unwrap();
    let store = handle.current();
    assert_eq!(store.input_names(), ["INPUT_0"]);
    assert_eq!(store.output("OUTPUT_0").unwrap().shape, vec![1, 1000]);
}

#[test]
fn test_load_rejects_malformed_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "input: [").unwrap();

    let err = ModelConfigDocument::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Document(_)));
}

#[test]
fn test_reload_swaps_without_touching_old_snapshot() {
    let validator = ConfigValidator::default();
    let handle = ModelStateHandle::load(&validator, &document("A", "oneflow")).unwrap();

    let before = handle.current();
    let after = handle
        .reload(&validator, &document("B", "tensorrt"))
        .unwrap();

    // readers holding the old snapshot still see the old model
    assert_eq!(before.input_names(), ["A"]);
    assert_eq!(before.backend_kind(), BackendKind::OneFlow);

    assert_eq!(after.input_names(), ["B"]);
    assert_eq!(after.backend_kind(), BackendKind::TensorRt);
    assert!(Arc::ptr_eq(&after, &handle.current()));
}

#[test]
fn test_failed_reload_keeps_current_store() {
    let validator = ConfigValidator::default();
    let handle = ModelStateHandle::load(&validator, &document("A", "openvino")).unwrap();
    let before = handle.current();

    let broken = ModelConfigDocument::from_value(json!({
        "input": [{"name": "A", "data_type": "FP32", "dims": [1]}],
        "output": []
    }));
    let err = handle.reload(&validator, &broken).unwrap_err();
    assert!(matches!(err, ConfigError::Convention { .. }));

    assert!(Arc::ptr_eq(&before, &handle.current()));
}

#[test]
fn test_concurrent_readers_during_reload() {
    let validator = Arc::new(ConfigValidator::default());
    let handle = Arc::new(ModelStateHandle::load(&validator, &document("A", "oneflow")).unwrap());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let handle = Arc::clone(&handle);
            thread::spawn(move || {
                for _ in 0..200 {
                    let store = handle.current();
                    // every snapshot is internally consistent
                    let name = &store.input_names()[0];
                    assert!(store.input(name).is_some());
                    let expected = if name == "A" {
                        BackendKind::OneFlow
                    } else {
                        BackendKind::TensorRt
                    };
                    assert_eq!(store.backend_kind(), expected);
                }
            })
        })
        .collect();

    for _ in 0..20 {
        handle.reload(&validator, &document("B", "tensorrt")).unwrap();
        handle.reload(&validator, &document("A", "oneflow")).unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
}
