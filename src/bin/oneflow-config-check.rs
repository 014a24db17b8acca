//! OneFlow model configuration checker
//!
//! Validates a model configuration document the same way the backend does at
//! model-load time and prints the resulting input/output description.

#[cfg(feature = "cli")]
use oneflow_backend::cli;

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    cli::main()
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
