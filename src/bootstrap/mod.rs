pub mod runtime;
pub mod tracing;
pub mod wiring;

pub use mf_infra::load_config;
pub use runtime::FormsRuntime;
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{wire_dependencies, FormDeps, WiringError, WiringResult};
