//! Configuration document loading.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::Config;
use crate::config::validation::validate_config;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode configuration: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("error(s) parsing YAML:\n{}", render_defects(.0))]
    Invalid(Vec<String>),
}

impl ConfigError {
    /// Defects to report to the user. A decode failure counts as one defect.
    pub fn defects(&self) -> Vec<String> {
        match self {
            ConfigError::Invalid(defects) => defects.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// Render defects as a hyphen-bulleted list, one per line.
pub fn render_defects(defects: &[String]) -> String {
    defects
        .iter()
        .map(|d| format!(" - {}", d))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strictly decode a YAML document without semantic checks.
///
/// A blank document decodes as an empty configuration so that it is reported
/// field by field instead of as a parse failure.
pub fn decode_document(raw: &[u8]) -> Result<Config, ConfigError> {
    if raw.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_slice(raw)?)
}

/// Decode and validate a YAML document.
pub fn parse_document(raw: &[u8]) -> Result<Config, ConfigError> {
    let config = decode_document(raw)?;
    validate_config(&config).map_err(ConfigError::Invalid)?;
    Ok(config)
}

/// Read a document from disk without decoding it.
pub fn read_document(path: &Path) -> Result<Vec<u8>, ConfigError> {
    fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load, decode and validate a document from disk.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = read_document(path)?;
    parse_document(&raw)
}
