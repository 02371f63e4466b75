//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID assigned and propagated)
//!     → handlers.rs (/configs → ConfigService)
//!     → status code + body
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
