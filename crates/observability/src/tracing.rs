//! Subscriber configuration.
//!
//! JSON lines by default so batch runs can be shipped to a log pipeline as-is;
//! `RESTOCK_LOG_FORMAT=pretty` switches to human-readable output for local runs.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub format: LogFormat,
    /// Used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl TracingConfig {
    pub fn from_env() -> Self {
        let format = std::env::var("RESTOCK_LOG_FORMAT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }
}

/// Initialize tracing for the process. Subsequent calls are no-ops.
pub fn init(config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
