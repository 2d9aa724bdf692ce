use std::io;
use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout stays machine-readable.
///
/// `CALCKIT_LOG` (or `RUST_LOG`) takes precedence; otherwise the level is
/// `warn`, `-v` raises it to `debug` and `-vv` to `trace`.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env("CALCKIT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}
