//! Load balancer configuration document schema.
//!
//! These types mirror the YAML documents users submit. Decoding is closed:
//! every struct denies unknown fields, so a typo in a key is a decode error
//! instead of a silently ignored setting.

use serde::{Deserialize, Deserializer, Serialize};

/// A named load balancer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Configuration identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// Free-form description.
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    /// Inbound listeners, in document order.
    #[serde(deserialize_with = "null_as_default")]
    pub listeners: Vec<Listener>,

    /// Upstream targets, in document order.
    #[serde(deserialize_with = "null_as_default")]
    pub backends: Vec<Backend>,

    /// Health check block. Carried through untouched by validation.
    #[serde(alias = "healthCheck", skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
}

/// Listener definition (protocol and port the balancer would accept on).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Listener {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// Either `http` or `https`.
    #[serde(deserialize_with = "null_as_default")]
    pub protocol: String,

    /// Zero means the port was not given.
    #[serde(deserialize_with = "null_as_default")]
    pub port: i64,

    /// Path to the certificate (PEM). Required for `https`.
    #[serde(
        alias = "tlsCert",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub tls_cert: String,

    /// Path to the private key (PEM). Required for `https`.
    #[serde(
        alias = "tlsKey",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub tls_key: String,
}

impl Listener {
    pub fn is_https(&self) -> bool {
        self.protocol == "https"
    }
}

/// Upstream server definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Backend {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// Host or IP of the upstream. Not validated.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub address: String,

    /// Zero means the port was not given.
    #[serde(deserialize_with = "null_as_default")]
    pub port: i64,
}

/// Health check settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthCheck {
    /// Path to probe, e.g. `/health`.
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,

    /// Probe interval, e.g. `10s`.
    #[serde(deserialize_with = "null_as_default")]
    pub interval: String,

    /// Probe timeout, e.g. `2s`.
    #[serde(deserialize_with = "null_as_default")]
    pub timeout: String,

    /// Consecutive failures before a backend is marked unhealthy.
    #[serde(deserialize_with = "null_as_default")]
    pub unhealthy_threshold: u32,

    /// Consecutive successes before a backend is marked healthy.
    #[serde(deserialize_with = "null_as_default")]
    pub healthy_threshold: u32,
}

/// An explicit YAML `null` (`listeners:` with nothing after it) behaves like
/// the key being absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
