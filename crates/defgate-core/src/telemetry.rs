//! Log output for the `defgate` binary.
//!
//! The validators log suppressed context diagnostics at `debug`, and
//! rejections (hash drift, invalid templates, refused store keys) at `warn`,
//! inside spans keyed by revision name. Stdout carries command results, so
//! this subscriber writes to stderr; `--json` switches it to one object per
//! line for log shippers.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `level` applies. Events go to
/// stderr, one JSON object per line with `json`. Later calls are no-ops.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    // A subscriber was already set (tests, embedding callers).
    installed.ok();
}
