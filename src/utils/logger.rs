use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line records.
    Compact,
    /// One JSON object per line.
    Json,
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "office_locator=debug,info"
    } else {
        "office_locator=info"
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the built-in filter.
///
/// Logs go to stderr so stdout stays free for the command output.
pub fn init_logger(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let base = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let output = match format {
        LogFormat::Compact => base.compact().boxed(),
        LogFormat::Json => base.json().boxed(),
    };

    tracing_subscriber::registry().with(filter).with(output).init();
}
