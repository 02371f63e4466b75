//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` wins over the configured level
//! - Logs go to stderr; stdout belongs to command output

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::settings::{LogFormat, ObservabilityConfig};

/// Filter directive for long-running server processes.
pub fn server_directive(config: &ObservabilityConfig) -> String {
    format!("lbx={0},tower_http={0}", config.log_level)
}

/// Install the global subscriber.
///
/// `directive` applies when `RUST_LOG` is unset, e.g. `"lbx=warn"` for
/// one-shot CLI commands.
pub fn init(config: &ObservabilityConfig, directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("lbx=info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init(),
    };

    if let Err(e) = result {
        eprintln!("Failed to install log subscriber: {}", e);
    }
}
