use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console-only logging.
///
/// Used when the `observability` feature is compiled out or disabled at
/// runtime with `OBSERVABILITY_ENABLED=false`.
///
/// # Configuration
///
/// - **Log Level**: `LOG_LEVEL` environment variable (default: "info"), or a
///   full `RUST_LOG` filter which takes precedence
/// - **Filtering**: noisy dependencies held at warn
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "gatehouse={log_level},gatehouse_auth={log_level},gatehouse_db={log_level},gatehouse_cli={log_level},tower_http=warn,hyper=warn,sqlx=warn"
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    // `try_init` so a second call (e.g. from tests) is harmless.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
