//! Tracing setup for the `applint` binary.
//!
//! The runner parses stdout for `::error`/`::warning` workflow commands, so
//! every log line goes to stderr. `RUST_LOG` overrides the default filter.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const APPLINT_TARGETS: &[&str] = &["applint", "applint_core", "applint_github"];

/// Filter used when `RUST_LOG` is unset: applint crates at `level`,
/// dependencies (HTTP stack included) at `warn`.
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(APPLINT_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Install the global subscriber; `json` selects newline-delimited JSON.
/// Later calls are no-ops.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let plain = (!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr));
    let structured = json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(structured)
        .try_init()
        .ok();
}
