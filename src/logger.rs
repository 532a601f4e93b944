use std::io;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

type StderrWriter = fn() -> io::Stderr;

/// Installs the global subscriber. `RUST_LOG` wins over `{app}={log_level}`.
pub fn setup(app: &str, log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{app}={log_level}")));
    get_subscriber(filter).init();
}

pub fn get_subscriber(
    filter: EnvFilter,
) -> SubscriberBuilder<DefaultFields, Format, EnvFilter, StderrWriter> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr as StderrWriter)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
}
