//! End-to-end validation of model configuration documents
//!
//! Covers the load-time scenarios a host relies on: successful loads, the
//! reshape-over-dims rule, data type convention failures and the backend kind
//! fallback.

use oneflow_backend::{
    BackendKind, ConfigError, ConfigValidator, DataType, DuplicateNamePolicy, LoadObserver,
    ModelConfigDocument, ValidatorConfig,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct NoticeLog {
    notices: Mutex<Vec<Option<String>>>,
}

impl LoadObserver for NoticeLog {
    fn on_backend_fallback(&self, _model: &str, value: Option<&str>) {
        self.notices.lock().unwrap().push(value.map(str::to_string));
    }
}

fn image_classifier(data_type: &str) -> Value {
    json!({
        "name": "resnet50",
        "input": [{"name": "IMAGE", "data_type": data_type, "dims": [3, 224, 224]}],
        "output": [{"name": "PROB", "data_type": "TYPE_FP32", "dims": [1000]}]
    })
}

fn validate(value: Value) -> oneflow_backend::Result<oneflow_backend::ModelAttributeStore> {
    ConfigValidator::default().validate(&ModelConfigDocument::from_value(value))
}

#[test]
fn test_image_classifier_loads_with_default_backend() {
    let log = Arc::new(NoticeLog::default());
    let validator = ConfigValidator::with_observer(ValidatorConfig::default(), log.clone());

    let store = validator
        .validate(&ModelConfigDocument::from_value(image_classifier("TYPE_FP32")))
        .unwrap();

    assert_eq!(store.input_names(), ["IMAGE"]);
    assert_eq!(store.output_names(), ["PROB"]);

    let image = &store.input_attributes()["IMAGE"];
    assert_eq!(image.data_type, DataType::Fp32);
    assert_eq!(image.shape, vec![3, 224, 224]);
    assert_eq!(image.order_index, 0);

    let prob = &store.output_attributes()["PROB"];
    assert_eq!(prob.data_type, DataType::Fp32);
    assert_eq!(prob.shape, vec![1000]);

    assert_eq!(store.backend_kind(), BackendKind::OneFlow);
    assert_eq!(*log.notices.lock().unwrap(), vec![None]);
}

#[test]
fn test_missing_type_prefix_aborts_load() {
    let err = validate(image_classifier("FP32")).unwrap_err();

    match &err {
        ConfigError::Convention { location, value } => {
            assert_eq!(location, "input[0].data_type");
            assert_eq!(value, "FP32");
        },
        other => panic!("expected convention error, got {other}"),
    }
    assert!(err.to_string().contains("TYPE_"));
}

#[test]
fn test_unknown_type_tag_is_distinct_from_missing_prefix() {
    let err = validate(image_classifier("TYPE_FLOAT")).unwrap_err();
    assert!(matches!(err, ConfigError::TypeResolution { ref tag, .. } if tag == "FLOAT"));
}

#[test]
fn test_reshape_takes_precedence_over_dims() {
    let store = validate(json!({
        "input": [{
            "name": "FLAT",
            "data_type": "TYPE_INT32",
            "dims": [1, 2, 3],
            "reshape": {"shape": [6]}
        }],
        "output": [{
            "name": "OUT",
            "data_type": "TYPE_INT32",
            "dims": [6],
            "reshape": {"shape": []}
        }]
    }))
    .unwrap();

    assert_eq!(store.input("FLAT").unwrap().shape, vec![6]);
    assert!(store.output("OUT").unwrap().shape.is_empty());
}

#[test]
fn test_names_preserve_document_order() {
    let entry = |name: &str| json!({"name": name, "data_type": "TYPE_BOOL", "dims": [1]});
    let store = validate(json!({
        "input": [entry("b"), entry("a"), entry("c")],
        "output": [entry("z"), entry("y")]
    }))
    .unwrap();

    assert_eq!(store.input_names(), ["b", "a", "c"]);
    assert_eq!(store.output_names(), ["z", "y"]);
}

#[test]
fn test_unknown_xrt_tag_falls_back_without_error() {
    let mut config = image_classifier("TYPE_FP32");
    config["parameters"] = json!({"xrt": {"string_value": "tvm"}});

    let log = Arc::new(NoticeLog::default());
    let validator = ConfigValidator::with_observer(ValidatorConfig::default(), log.clone());
    let store = validator
        .validate(&ModelConfigDocument::from_value(config))
        .unwrap();

    assert_eq!(store.backend_kind(), BackendKind::default());
    assert_eq!(*log.notices.lock().unwrap(), vec![Some("tvm".to_string())]);
}

#[test]
fn test_recognized_xrt_tags_select_backend() {
    for (tag, expected) in [
        ("oneflow", BackendKind::OneFlow),
        ("tensorrt", BackendKind::TensorRt),
        ("openvino", BackendKind::OpenVino),
    ] {
        let mut config = image_classifier("TYPE_FP32");
        config["parameters"] = json!({"xrt": {"string_value": tag}});
        assert_eq!(validate(config).unwrap().backend_kind(), expected);
    }
}

#[test]
fn test_dynamic_batch_and_string_dims() {
    let store = validate(json!({
        "input": [{"name": "TOKENS", "data_type": "TYPE_INT64", "dims": ["-1", "128"]}],
        "output": [{"name": "TEXT", "data_type": "TYPE_STRING", "dims": [-1]}]
    }))
    .unwrap();

    let tokens = store.input("TOKENS").unwrap();
    assert_eq!(tokens.shape, vec![-1, 128]);
    assert!(tokens.has_dynamic_dims());
    assert_eq!(store.output("TEXT").unwrap().data_type, DataType::Bytes);
}

#[test]
fn test_failure_in_outputs_reports_output_index() {
    let err = validate(json!({
        "input": [{"name": "A", "data_type": "TYPE_FP32", "dims": [1]}],
        "output": [
            {"name": "B", "data_type": "TYPE_FP32", "dims": [1]},
            {"name": "C", "data_type": "TYPE_FP32", "dims": [1, "x"]}
        ]
    }))
    .unwrap_err();

    assert!(matches!(err, ConfigError::ShapeParse { .. }));
    assert_eq!(err.location(), Some("output[1].dims[1]"));
}

#[test]
fn test_duplicate_policy_is_explicit() {
    let config = json!({
        "input": [
            {"name": "X", "data_type": "TYPE_FP32", "dims": [1]},
            {"name": "X", "data_type": "TYPE_FP16", "dims": [2]}
        ],
        "output": []
    });

    let err = validate(config.clone()).unwrap_err();
    assert!(matches!(err, ConfigError::Schema { .. }));
    assert_eq!(err.location(), Some("input[1].name"));

    let lenient = ConfigValidator::new(
        ValidatorConfig::builder()
            .duplicate_names(DuplicateNamePolicy::LastWins)
            .build(),
    );
    let store = lenient
        .validate(&ModelConfigDocument::from_value(config))
        .unwrap();
    assert_eq!(store.input_names(), ["X", "X"]);
    assert_eq!(store.input("X").unwrap().data_type, DataType::Fp16);
}

#[test]
fn test_validate_model_config_from_text() {
    let store = oneflow_backend::validate_model_config(
        r#"{
            "input": [{"name": "INPUT_0", "data_type": "TYPE_FP32", "dims": [1, 3, 224, 224]}],
            "output": [{"name": "OUTPUT_0", "data_type": "TYPE_FP32", "dims": [1, 1000]}],
            "parameters": {"xrt": {"string_value": "tensorrt"}}
        }"#,
    )
    .unwrap();
    assert_eq!(store.backend_kind(), BackendKind::TensorRt);
    assert_eq!(store.input("INPUT_0").unwrap().element_count(), Some(3 * 224 * 224));

    let err = oneflow_backend::validate_model_config("{").unwrap_err();
    assert!(matches!(err, ConfigError::Document(_)));
}
