use tracing_subscriber::EnvFilter;

/// Workspace targets that receive log output.
const CRATE_TARGETS: &[&str] = &[
    "drift",
    "drift_aggregate",
    "drift_calendar",
    "drift_io",
    "drift_report",
];

/// Filter directive for a `-v` count: 0 warn, 1 info, 2 debug, 3+ trace.
fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing on stderr; stdout carries the progress lines.
///
/// `RUST_LOG` overrides the CLI verbosity if set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
