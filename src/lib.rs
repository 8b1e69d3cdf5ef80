//! Momnect Forms
//!
//! Entry point that wires the form sessions of `mf-app` to either the
//! user-service HTTP client or the in-memory fixtures of `mf-infra`.

pub mod bootstrap;

pub use bootstrap::{init_tracing_subscriber, load_config, FormsRuntime};
