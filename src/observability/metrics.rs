//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lbx_config_saves_total` (counter): saves by outcome
//! - `lbx_config_deletes_total` (counter): deletes by outcome
//! - `lbx_validation_defects_total` (counter): defects found in rejected documents
//! - `lbx_api_requests_total` (counter): API requests by method, status
//! - `lbx_api_request_duration_seconds` (histogram): API latency
//!
//! Without an installed recorder every call here is a no-op, so the CLI can
//! record freely and only `lbx api` pays for exposition.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::config::loader::ConfigError;
use crate::workflow::{SaveOutcome, WorkflowError};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the result of a save or create.
pub fn record_save(result: &Result<SaveOutcome, WorkflowError>) {
    let outcome = match result {
        Ok(outcome) => outcome.as_str(),
        Err(e) => error_label(e),
    };
    counter!("lbx_config_saves_total", "outcome" => outcome).increment(1);
}

/// Record the result of a delete.
pub fn record_delete(result: &Result<(), WorkflowError>) {
    let outcome = match result {
        Ok(()) => "deleted",
        Err(e) => error_label(e),
    };
    counter!("lbx_config_deletes_total", "outcome" => outcome).increment(1);
}

/// Record how many defects a rejected document had.
pub fn record_defects(count: usize) {
    counter!("lbx_validation_defects_total").increment(count as u64);
}

/// Record a completed API request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let status = status.to_string();
    counter!("lbx_api_requests_total", "method" => method.clone(), "status" => status.clone()).increment(1);
    histogram!("lbx_api_request_duration_seconds", "method" => method, "status" => status)
        .record(start.elapsed().as_secs_f64());
}

fn error_label(e: &WorkflowError) -> &'static str {
    match e {
        WorkflowError::Config(ConfigError::Invalid(_)) => "invalid",
        WorkflowError::Config(_) => "decode_error",
        WorkflowError::ConfigNotFound(_) => "not_found",
        WorkflowError::AlreadyExists(_) => "already_exists",
        WorkflowError::AbortedByOperator => "aborted",
        WorkflowError::Backend(_) => "backend_error",
    }
}
