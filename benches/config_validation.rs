use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use oneflow_backend::{ConfigValidator, ModelConfigDocument, ValidatorConfig};
use serde_json::{json, Value};

/// Build a configuration with `width` inputs and `width` outputs
fn wide_config(width: usize) -> Value {
    let entries = |prefix: &str| {
        (0..width)
            .map(|i| {
                if i % 2 == 0 {
                    json!({
                        "name": format!("{prefix}_{i}"),
                        "data_type": "TYPE_FP32",
                        "dims": [-1, 3, 224, 224]
                    })
                } else {
                    json!({
                        "name": format!("{prefix}_{i}"),
                        "data_type": "TYPE_INT64",
                        "dims": ["-1", "128"],
                        "reshape": {"shape": [128]}
                    })
                }
            })
            .collect::<Vec<_>>()
    };

    json!({
        "name": "bench_model",
        "input": entries("INPUT"),
        "output": entries("OUTPUT"),
        "parameters": {"xrt": {"string_value": "tensorrt"}}
    })
}

fn bench_validation(c: &mut Criterion) {
    let validator = ConfigValidator::new(ValidatorConfig::default());
    let mut group = c.benchmark_group("config_validation");

    for width in [1_usize, 16, 256] {
        let document = ModelConfigDocument::from_value(wide_config(width));
        group.bench_with_input(BenchmarkId::from_parameter(width), &document, |b, document| {
            b.iter(|| validator.validate(black_box(document)).unwrap());
        });
    }

    group.finish();
}

fn bench_parse_and_validate(c: &mut Criterion) {
    let text = wide_config(16).to_string();
    c.bench_function("parse_and_validate_16", |b| {
        b.iter(|| oneflow_backend::validate_model_config(black_box(&text)).unwrap());
    });
}

criterion_group!(benches, bench_validation, bench_parse_and_validate);
criterion_main!(benches);
