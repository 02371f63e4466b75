//! `lbx` command-line interface.
//!
//! Commands write their results to an injected sink so they can be driven
//! from tests; `main` passes stdout and maps errors to exit code 1.

use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

use crate::config::loader::{load_config, read_document, ConfigError};
use crate::config::settings::SettingsError;
use crate::store::StoreError;
use crate::workflow::{ConfigService, ReplacePrompt, SaveOutcome, WorkflowError};

#[derive(Debug, Parser)]
#[command(name = "lbx")]
#[command(about = "Central command for all functionalities within the load balancer", long_about = None)]
pub struct Cli {
    /// Path to the lbx settings file (TOML).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse YAML configuration files
    Parse {
        /// Path to YAML config file
        #[arg(short, long)]
        filepath: PathBuf,
    },
    /// Save load balancer configuration
    Save {
        /// Path to YAML config file
        #[arg(short, long)]
        filepath: PathBuf,
        /// Name of the load balancer configuration
        #[arg(short, long)]
        name: String,
    },
    /// Delete load balancer configuration
    Delete {
        /// Name of the load balancer configuration
        #[arg(short, long)]
        name: String,
    },
    /// List stored configuration names
    List,
    /// Print a stored configuration
    Get {
        /// Name of the load balancer configuration
        #[arg(short, long)]
        name: String,
    },
    /// Run the API server
    Api,
}

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or malformed command-line arguments.
    #[error("{}", .0.to_string().trim_end())]
    Usage(clap::Error),

    #[error("error retrieving file content: {0}")]
    Input(ConfigError),

    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parse `args` (program name first).
///
/// Help and version requests stay clap errors so the caller can print them
/// and exit 0; everything else becomes [`CliError::Usage`].
pub fn parse_args<I, T>(args: I) -> Result<Result<Cli, clap::Error>, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Ok(cli)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => Ok(Err(e)),
        Err(e) => Err(CliError::Usage(e)),
    }
}

/// `lbx parse`: validate a file without touching the store.
pub async fn parse<W>(filepath: &Path, out: &mut W) -> Result<(), CliError>
where
    W: AsyncWrite + Unpin,
{
    load_config(filepath).map_err(|e| match e {
        ConfigError::Io { .. } => CliError::Input(e),
        e => CliError::Config(e),
    })?;
    out.write_all(b"Valid YAML configuration!!\n").await?;
    Ok(())
}

/// `lbx save`: validate a file and store it under `name`.
pub async fn save<R, W>(
    service: &ConfigService,
    filepath: &Path,
    name: &str,
    input: R,
    out: &mut W,
) -> Result<SaveOutcome, CliError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let raw = read_document(filepath).map_err(CliError::Input)?;

    let outcome = {
        let mut prompt = ReplacePrompt::new(input, &mut *out);
        service.save(name, &raw, &mut prompt).await?
    };

    let message = match outcome {
        SaveOutcome::Created => format!("Saved config {}\n", name),
        SaveOutcome::Replaced => format!("Replaced config {}\n", name),
        SaveOutcome::Inconclusive => format!("\nNo answer given, config {} left unchanged\n", name),
    };
    out.write_all(message.as_bytes()).await?;
    Ok(outcome)
}

/// `lbx delete`: remove a stored configuration.
pub async fn delete<W>(service: &ConfigService, name: &str, out: &mut W) -> Result<(), CliError>
where
    W: AsyncWrite + Unpin,
{
    service.delete(name).await?;
    out.write_all(format!("Deleted config {}\n", name).as_bytes()).await?;
    Ok(())
}

/// `lbx list`: one name per line.
pub async fn list<W>(service: &ConfigService, out: &mut W) -> Result<(), CliError>
where
    W: AsyncWrite + Unpin,
{
    for name in service.list().await? {
        out.write_all(format!("{}\n", name).as_bytes()).await?;
    }
    Ok(())
}

/// `lbx get`: print the stored document as-is.
pub async fn get<W>(service: &ConfigService, name: &str, out: &mut W) -> Result<(), CliError>
where
    W: AsyncWrite + Unpin,
{
    let document = service.get(name).await?;
    out.write_all(&document).await?;
    Ok(())
}
