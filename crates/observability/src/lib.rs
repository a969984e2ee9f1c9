//! Process-wide tracing setup shared by the `restock` binaries.

pub mod tracing;

pub use crate::tracing::{LogFormat, TracingConfig};

/// Install the subscriber from `RUST_LOG` / `RESTOCK_LOG_FORMAT`.
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    tracing::init(&TracingConfig::from_env());
}
