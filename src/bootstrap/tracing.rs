//! Tracing configuration for the form sessions.
//!
//! `RUST_LOG` wins when set. Otherwise debug builds log at `debug` and
//! release builds at `info`, with the same level pinned for the workspace
//! crates so a coarse global directive does not silence them.

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

fn is_development() -> bool {
    cfg!(debug_assertions)
}

fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("mf_app={level}"),
        format!("mf_infra={level}"),
        format!("momnect_forms={level}"),
        "hyper=warn".to_string(),
        "reqwest=info".to_string(),
    ]
}

/// Initialize the global tracing subscriber.
///
/// Output format: `2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message`.
///
/// # Errors
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives.join(",")));

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)));

    registry().with(env_filter).with(stdout_layer).try_init()?;

    Ok(())
}
