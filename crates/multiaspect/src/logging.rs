//! Logging initialization.
//!
//! The level comes from `MULTIASPECT_LOG_LEVEL`, then `logging.level` in the
//! config, then `warn`. `--verbose` forces `debug`. Output goes to stderr so
//! stdout stays free for index data.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable selecting the log level.
pub const LOG_LEVEL_ENV: &str = "MULTIASPECT_LOG_LEVEL";

const DEFAULT_LEVEL: &str = "warn";

/// Map common level spellings onto `tracing` level names.
pub fn normalize_level(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    match level.as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        "" => DEFAULT_LEVEL.to_string(),
        _ => level,
    }
}

/// Pick the effective level from the environment value, config value, and
/// verbose flag.
pub fn resolve_level(env_level: Option<&str>, config_level: &str, verbose: bool) -> String {
    if verbose {
        return "debug".to_string();
    }
    normalize_level(env_level.unwrap_or(config_level))
}

/// Install the global subscriber.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from config with CLI overrides.
pub fn init_from_config(
    config: &multiaspect_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    let level = resolve_level(env_level.as_deref(), &config.logging.level, verbose_override);
    let json_format = json_logs_override || config.logging.format == "json";
    init(&level, json_format);
}
