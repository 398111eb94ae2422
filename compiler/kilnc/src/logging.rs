//! Log output for the `kiln` binary.

use std::sync::Once;

/// Environment variable holding an `EnvFilter` directive, e.g. `kiln_driver=debug`.
pub const LOG_ENV: &str = "KILN_LOG";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber, writing to stderr.
///
/// `KILN_LOG` wins when set; otherwise the level is `info`, or `debug`
/// when `verbose`. Calling this more than once has no effect.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .without_time(),
            )
            .with(filter)
            .init();
    });
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}
