use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Installs the global subscriber.
///
/// Filtering follows `RUST_LOG`, falling back to `info` with debug output for
/// this crate:
///
/// ```bash
/// RUST_LOG=order_lifecycle=trace,tower_http=debug order_lifecycle serve
/// ```
pub fn setup_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,order_lifecycle=debug"));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    match format {
        LogFormat::Text => builder.with_timer(tracing_subscriber::fmt::time::uptime()).compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}
