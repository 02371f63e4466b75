//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the `/configs` handlers
//! - Wire up middleware (tracing, timeout, body limit, request ID)
//! - Serve over plain TCP or TLS with graceful shutdown

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::settings::ApiSettings;
use crate::http::handlers::{delete_config, get_config, list_configs, save_config};
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::net::tls::load_tls_config;
use crate::observability::metrics;
use crate::workflow::ConfigService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ConfigService,
}

/// HTTP API server.
pub struct HttpServer {
    router: Router,
    settings: ApiSettings,
}

impl HttpServer {
    /// Create a new HTTP server serving `service`.
    pub fn new(settings: ApiSettings, service: ConfigService) -> Self {
        let router = build_router(&settings, AppState { service });
        Self { router, settings }
    }

    /// The router with every layer applied. Useful for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        if let Some(tls) = &self.settings.tls {
            let tls_config = load_tls_config(tls).await?;
            let handle = axum_server::Handle::new();
            let drain = handle.clone();
            tokio::spawn(async move {
                let _ = shutdown.recv().await;
                drain.graceful_shutdown(Some(Duration::from_secs(10)));
            });

            tracing::info!(address = %addr, "HTTPS API server starting");
            axum_server::from_tcp_rustls(listener.into_std()?, tls_config)
                .handle(handle)
                .serve(self.router.into_make_service())
                .await?;
        } else {
            tracing::info!(address = %addr, "HTTP API server starting");
            axum::serve(listener, self.router.into_make_service())
                .with_graceful_shutdown(async move {
                    let _ = shutdown.recv().await;
                })
                .await?;
        }

        tracing::info!("HTTP API server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(settings: &ApiSettings, state: AppState) -> Router {
    Router::new()
        .route("/configs", get(list_configs).post(save_config).delete(delete_config))
        .route("/configs/{name}", get(get_config))
        .with_state(state)
        .layer(DefaultBodyLimit::max(settings.max_body_size))
        .layer(middleware::from_fn(record_request))
        .layer(TimeoutLayer::new(Duration::from_secs(settings.request_timeout_secs)))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
}

/// Log and count each request once the handler has produced a response.
async fn record_request(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(&request).to_string();

    let response = next.run(request).await;
    let status = response.status();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = status.as_u16(),
        "Request completed"
    );
    metrics::record_request(method.as_str(), status.as_u16(), start);
    response
}
