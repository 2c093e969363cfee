//! Logger initialization.

use std::io::Write;

use colored::*;
use log::{Level, LevelFilter};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies whose logs are capped regardless of the requested level.
const QUIET_DEPENDENCIES: &[(&str, LevelFilter)] = &[
    ("html5ever", LevelFilter::Error),
    ("markup5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("cookie_store", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
];

const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Drops the crate name from this crate's log targets ("crawl" rather than
/// "listing_harvest::crawl"); dependency targets are left as they are.
fn short_target(target: &str) -> &str {
    target.strip_prefix(CRATE_PREFIX).unwrap_or(target)
}

fn level_marker(level: Level) -> (&'static str, ColoredString) {
    let name = level.to_string();
    match level {
        Level::Error => ("❌", name.red()),
        Level::Warn => ("⚠️", name.yellow()),
        Level::Info => ("✔️", name.green()),
        Level::Debug => ("🔍", name.blue()),
        Level::Trace => ("🔬", name.purple()),
    }
}

/// One JSON log line: `{"ts":..,"level":..,"target":..,"msg":..}`.
fn json_line(ts_millis: i64, level: Level, target: &str, msg: &str) -> String {
    serde_json::json!({
        "ts": ts_millis,
        "level": level.as_str(),
        "target": short_target(target),
        "msg": msg,
    })
    .to_string()
}

/// Initializes the logger with the given level and format.
///
/// `RUST_LOG` is read first; `level` overrides it for this crate, and the
/// parser and HTTP stacks are capped at quieter levels. `Plain`
/// writes coloured lines with an emoji marker; `Json` writes one object per
/// line for log collectors.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// listing_harvest --log-level debug list "https://www.amazon.com/s?k=lamp"
/// RUST_LOG=listing_harvest::batch=trace listing_harvest --log-format json batch urls.txt
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, cap) in QUIET_DEPENDENCIES {
        builder.filter_module(module, (*cap).min(level));
    }
    builder.filter_module(env!("CARGO_CRATE_NAME"), level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            colored::control::set_override(true);
            builder.format(|buf, record| {
                let (marker, level) = level_marker(record.level());
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    marker,
                    short_target(record.target()).cyan(),
                    level,
                    record.args()
                )
            });
        }
    }

    // try_init: tests may install a logger more than once
    builder.try_init().map_err(InitializationError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_target_strips_own_crate_only() {
        assert_eq!(short_target("listing_harvest::crawl"), "crawl");
        assert_eq!(short_target("listing_harvest::batch::control"), "batch::control");
        assert_eq!(short_target("reqwest::connect"), "reqwest::connect");
    }

    #[test]
    fn test_json_line_escapes_message() {
        let line = json_line(1_700_000_000_000, Level::Warn, "listing_harvest::assemble", "bad \"price\"\n");
        let value: serde_json::Value = serde_json::from_str(&line).expect("valid json");
        assert_eq!(value["ts"], 1_700_000_000_000_i64);
        assert_eq!(value["level"], "WARN");
        assert_eq!(value["target"], "assemble");
        assert_eq!(value["msg"], "bad \"price\"\n");
    }

    #[test]
    fn test_init_logger_formats_do_not_panic() {
        // Only the first install in a process succeeds; later ones must fail cleanly.
        for format in [LogFormat::Plain, LogFormat::Json] {
            let result = init_logger_with(LevelFilter::Info, format);
            assert!(result.is_ok() || matches!(result, Err(InitializationError::LoggerError(_))));
        }
    }
}
