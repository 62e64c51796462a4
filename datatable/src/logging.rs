//! Logging setup for the CLI.
//!
//! Library diagnostics go through `tracing`; this installs a plain fmt
//! subscriber on stderr so stdout stays clean for table and JSON output.
//! `RUST_LOG` selects the filter, defaulting to `warn`. `-v` forces `debug`.

use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A second init (tests calling into main twice) is harmless.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}
