//! Tracing subscriber setup for the CLI

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` 0/1/2+ selects
/// warn/info/debug for this crate.
pub fn init_tracing(verbosity: u8) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // A second call (tests, embedding in another binary) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,hybrid_nl_search=info,nlq=info",
        _ => "info,hybrid_nl_search=debug,nlq=debug",
    }
}
