//! Diagnostic logging for the shell.

use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Install a stderr subscriber filtered by `$RUST_LOG`.
///
/// Nothing is logged unless `$RUST_LOG` asks for it, so diagnostics never
/// show up between the prompt and command output during normal use.
pub fn set_up_logging() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_ansi(stderr_supports_color())
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter(&directives))
        .with(fmt_layer)
        .init();
}

fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .parse_lossy(directives)
}

fn stderr_supports_color() -> bool {
    isatty::stderr_isatty() && std::env::var_os("NO_COLOR").is_none()
}
