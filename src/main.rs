//! lbx: load balancer configuration manager.
//!
//! # Architecture Overview
//!
//! ```text
//!   lbx parse/save/delete/list/get          HTTP  /configs
//!   ───────────────┬───────────────          ───────┬───────
//!                  │                                │
//!                  ▼                                ▼
//!            ┌───────────┐                  ┌──────────────┐
//!            │    cli    │                  │ http server  │
//!            └─────┬─────┘                  └──────┬───────┘
//!                  │                               │
//!                  └──────────────┬────────────────┘
//!                                 ▼
//!                  ┌─────────────────────────────┐
//!                  │ workflow::ConfigService     │
//!                  │  validate → exists? → write │
//!                  └──────┬───────────────┬──────┘
//!                         │               │
//!                         ▼               ▼
//!                 ┌──────────────┐ ┌──────────────┐
//!                 │ config       │ │ store        │
//!                 │ loader +     │ │ redis/memory │
//!                 │ validation   │ └──────────────┘
//!                 └──────────────┘
//! ```

use std::process::ExitCode;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use lbx::cli::{self, Cli, CliError, Commands};
use lbx::config::Settings;
use lbx::http::HttpServer;
use lbx::lifecycle::{wait_for_signal, Shutdown};
use lbx::observability::{logging, metrics};
use lbx::store;
use lbx::workflow::ConfigService;

#[tokio::main]
async fn main() -> ExitCode {
    let result = match cli::parse_args(std::env::args_os()) {
        Ok(Ok(args)) => run(args).await,
        Ok(Err(info)) => info.exit(),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<(), CliError> {
    let settings = Settings::load(args.config.as_deref())?;

    let directive = match args.command {
        Commands::Api => logging::server_directive(&settings.observability),
        _ => "lbx=warn".to_string(),
    };
    logging::init(&settings.observability, &directive);

    let mut stdout = tokio::io::stdout();

    match args.command {
        Commands::Parse { filepath } => cli::parse(&filepath, &mut stdout).await?,
        Commands::Save { filepath, name } => {
            let service = connect(&settings).await?;
            let stdin = BufReader::new(tokio::io::stdin());
            cli::save(&service, &filepath, &name, stdin, &mut stdout).await?;
        }
        Commands::Delete { name } => cli::delete(&connect(&settings).await?, &name, &mut stdout).await?,
        Commands::List => cli::list(&connect(&settings).await?, &mut stdout).await?,
        Commands::Get { name } => cli::get(&connect(&settings).await?, &name, &mut stdout).await?,
        Commands::Api => {
            let service = connect(&settings).await?;
            serve(settings, service).await?;
        }
    }

    stdout.flush().await?;
    Ok(())
}

async fn connect(settings: &Settings) -> Result<ConfigService, CliError> {
    let store = store::connect(&settings.store).await?;
    Ok(ConfigService::new(store))
}

async fn serve(settings: Settings, service: ConfigService) -> Result<(), CliError> {
    tracing::info!(
        bind_address = %settings.api.bind_address,
        store = ?settings.store.backend,
        tls = settings.api.tls.is_some(),
        "lbx API v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&settings.api.bind_address).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    let server = HttpServer::new(settings.api, service);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
