//! Momnect Forms Infrastructure Layer
//!
//! Adapters behind the `mf-core` ports: the user-service HTTP client, the
//! in-memory fixtures used when no backend is reachable, the system clock
//! and the configuration loader.

pub mod clock;
pub mod config;
pub mod fixtures;
pub mod http;

pub use clock::SystemClock;
pub use config::{load_config, BackendMode, ConfigError};
pub use http::{UserServiceClient, UserServiceError};
