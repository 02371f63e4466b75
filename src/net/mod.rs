//! Network plumbing for the API server.
//!
//! The API listens on plain TCP (`tokio::net::TcpListener` handed to axum)
//! unless `api.tls` is set, in which case tls.rs loads the PEM pair for
//! axum-server's rustls acceptor.

pub mod tls;
