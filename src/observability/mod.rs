//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! workflow + API handlers produce:
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stderr, JSON when configured)
//!     → Metrics endpoint (Prometheus scrape, `lbx api` only)
//! ```

pub mod logging;
pub mod metrics;
