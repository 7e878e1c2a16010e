//! Diagnostics go to stderr so stdout carries only query results.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable consulted when `RUST_LOG` is not set.
pub const LOG_ENV: &str = "ROADNET_LOG";

/// Install the global subscriber.
///
/// `RUST_LOG` or `ROADNET_LOG` win over the flags. Otherwise `--log-level`
/// is used as given (a bare level applies to the roadnet crates only), and
/// `-v` means debug. The default is warn.
pub fn init_tracing(verbose: bool, log_level: Option<&str>, log_json: bool) -> Result<(), TryInitError> {
    let directive = match (verbose, log_level) {
        (_, Some(level)) if level.contains('=') => level.to_string(),
        (_, Some(level)) => format!("roadnet={level}"),
        (true, None) => "roadnet=debug".to_string(),
        (false, None) => "roadnet=warn".to_string(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV))
        .unwrap_or_else(|_| EnvFilter::new(directive));

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()
    }
}
