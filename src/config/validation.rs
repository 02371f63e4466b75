//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required fields (names, description, listeners, backends)
//! - Validate listener protocol/port pairing and TLS material
//! - Validate backend port ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Errors follow document order: top-level fields, then listeners, then backends
//! - Validation is pure function: Config → Result<(), Vec<String>>

use crate::config::loader::decode_document;
use crate::config::schema::{Backend, Config, Listener};

const MAX_PORT: i64 = 65_535;

/// Validate raw document bytes.
///
/// An empty result means the document is valid. A document that cannot be
/// decoded yields exactly one defect: the decode error.
pub fn validate(raw: &[u8]) -> Vec<String> {
    match decode_document(raw) {
        Ok(config) => validate_config(&config).err().unwrap_or_default(),
        Err(e) => vec![e.to_string()],
    }
}

/// Validate an already decoded configuration.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.name.is_empty() {
        errors.push("missing name of your LB configuration".to_string());
    }

    if config.description.is_empty() {
        errors.push("missing description of your LB configuration".to_string());
    }

    if config.listeners.is_empty() {
        errors.push("missing or empty listener config".to_string());
    } else {
        for (i, listener) in config.listeners.iter().enumerate() {
            check_listener(i + 1, listener, &mut errors);
        }
    }

    if config.backends.is_empty() {
        errors.push("missing or empty backend config".to_string());
    } else {
        for (i, backend) in config.backends.iter().enumerate() {
            check_backend(i + 1, backend, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_listener(n: usize, listener: &Listener, errors: &mut Vec<String>) {
    if listener.name.is_empty() {
        errors.push(format!("listener {}: Missing name", n));
    }

    let protocol = listener.protocol.as_str();
    if protocol.is_empty() {
        errors.push(format!("listener {}: Missing protocol", n));
    } else if protocol != "http" && protocol != "https" {
        errors.push(format!("listener {}: Invalid protocol \"{}\"", n, protocol));
    }

    if listener.port == 0 {
        errors.push(format!("listener {}: Missing port number", n));
    } else if (protocol == "http" && listener.port != 80) || (protocol == "https" && listener.port != 443) {
        errors.push(format!(
            "listener {}: Invalid port {} for protocol \"{}\"",
            n, listener.port, protocol
        ));
    }

    // One defect per listener, whichever half of the pair is missing.
    if listener.is_https() && (listener.tls_cert.is_empty() || listener.tls_key.is_empty()) {
        errors.push(format!("listener {}: Missing certificate information", n));
    }
}

fn check_backend(n: usize, backend: &Backend, errors: &mut Vec<String>) {
    if backend.name.is_empty() {
        errors.push(format!("backend {}: Missing name", n));
    }

    if backend.port == 0 {
        errors.push(format!("backend {}: Missing port", n));
    } else if !(1..=MAX_PORT).contains(&backend.port) {
        errors.push(format!("backend {}: Invalid port {}", n, backend.port));
    }
}
