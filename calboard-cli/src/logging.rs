use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_LEVEL_ENV: &str = "CALBOARD_LOG";

/// Log to stderr so command output on stdout stays clean.
pub fn init_logging() {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time();

    tracing_subscriber::registry()
        .with(build_log_filter())
        .with(stderr_layer)
        .init();
}

fn build_log_filter() -> EnvFilter {
    let default_level = "warn";
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|raw| normalize_log_level(raw.as_str()))
        .unwrap_or(default_level);
    EnvFilter::new(format!("{level},calboard_core={level},calboard={level}"))
}

fn normalize_log_level(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        "off" | "none" => Some("off"),
        _ => None,
    }
}
