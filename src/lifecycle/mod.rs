//! Lifecycle management for `lbx api`.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load settings → Init logging → Connect store → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → stop accepting → drain → exit
//! ```

pub mod shutdown;

pub use shutdown::{wait_for_signal, Shutdown};
