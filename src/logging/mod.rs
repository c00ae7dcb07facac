//! Tracing initialisation.
//!
//! Inside GitHub Actions events go to stdout as workflow commands so the
//! runner turns warnings and errors into annotations. Elsewhere a compact
//! human format goes to stderr. `RUST_LOG` overrides the default `info` level.

pub mod workflow;

use std::io;

use tracing_subscriber::EnvFilter;

pub use workflow::{Group, WorkflowFormat, add_path, escape_data, is_actions};

/// Install the global subscriber. Later calls are ignored.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if is_actions() {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stdout)
            .event_format(WorkflowFormat)
            .try_init()
            .ok();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(io::stderr)
            .with_target(false)
            .without_time()
            .compact()
            .try_init()
            .ok();
    }
}

/// Report the job as failed with `message`.
///
/// Rendered as an `::error::` command under Actions; the caller is
/// responsible for the non-zero exit.
pub fn set_failed(message: &str) {
    tracing::error!("{message}");
}
