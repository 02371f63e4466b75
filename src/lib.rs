//! lbx: validation and storage of load balancer configuration documents.

pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod store;
pub mod workflow;

pub use config::schema::Config;
pub use http::HttpServer;
pub use store::{ConfigStore, MemoryStore, RedisStore, StoreError};
pub use workflow::{ConfigService, SaveOutcome, WorkflowError};
