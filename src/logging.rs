//! Tracing setup for the scanjob CLI.
//!
//! Logs always go to stderr so `results` and `status` output on stdout can be
//! piped. `RUST_LOG` overrides the level chosen from `--verbose`.

use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Default)]
pub struct LogConfig {
    pub json: bool,
    pub verbose: bool,
}

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> String {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    format!("{}={}", env!("CARGO_CRATE_NAME"), level.as_str().to_lowercase())
}

pub fn init(config: LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config.verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(true),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .init();
    }
}

/// Remembers the last progress value reported while polling a scan.
///
/// Services tend to answer the same percentage for many polls in a row;
/// only changes are worth an info line.
#[derive(Debug, Default)]
pub struct ProgressLog {
    last: Option<u8>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `progress`, returning true when it differs from the previous value.
    pub fn changed(&mut self, progress: u8) -> bool {
        if self.last == Some(progress) {
            return false;
        }
        self.last = Some(progress);
        true
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}
