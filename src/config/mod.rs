//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! YAML document (file or HTTP body)
//!     → loader.rs (strict decode, unknown keys rejected)
//!     → validation.rs (semantic checks, ordered defects)
//!     → Config (validated) or the full defect list
//!
//! lbx.toml (optional) + environment
//!     → settings.rs
//!     → Settings for store, API and observability
//! ```
//!
//! # Design Decisions
//! - Syntactic failures (serde) supersede semantic checks
//! - Semantic checks report every defect in one pass
//! - Missing keys decode as empty values so the validator can name them

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{Backend, Config, HealthCheck, Listener};
pub use settings::Settings;
pub use validation::{validate, validate_config};
