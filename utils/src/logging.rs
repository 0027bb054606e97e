use std::env;

use chrono::Local;
use log::LevelFilter;

/// Reads `LOG_LEVEL`, defaulting to `Warn` when unset or unrecognized.
pub fn level_from_env() -> LevelFilter {
    parse_level(env::var("LOG_LEVEL").ok().as_deref())
}

fn parse_level(value: Option<&str>) -> LevelFilter {
    match value.map(str::to_lowercase).as_deref() {
        Some("trace") => LevelFilter::Trace,
        Some("debug") => LevelFilter::Debug,
        Some("info") => LevelFilter::Info,
        Some("warn") => LevelFilter::Warn,
        Some("error") => LevelFilter::Error,
        _ => LevelFilter::Warn,
    }
}

/// Installs the global logger on stderr. `level` overrides `LOG_LEVEL`.
pub fn setup_logging(level: Option<LevelFilter>) -> Result<(), fern::InitError> {
    let level = level.unwrap_or_else(level_from_env);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}: {}",
                Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        // Keeps stdout free for the build log
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}
