//! Diagnostic logging on standard error.
//!
//! Library crates log through `tracing`; this installs the subscriber.
//! Program output never goes through here.

use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

/// Environment variable consulted when `--log` is absent.
pub const LOG_ENV: &str = "SIMPL_LOG";

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Remove `--log LEVEL` from `args` wherever it appears.
///
/// Falls back to `SIMPL_LOG`, then to the default. An unreadable
/// `SIMPL_LOG` is ignored; a bad `--log` is an error.
pub fn take_log_flag(args: &mut Vec<String>) -> Result<LogLevel, String> {
    let Some(idx) = args.iter().position(|a| a == "--log") else {
        let level = std::env::var(LOG_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        return Ok(level);
    };
    if idx + 1 >= args.len() {
        return Err("--log requires a level".to_string());
    }
    let value = args.remove(idx + 1);
    args.remove(idx);
    value.parse()
}

/// Install a compact stderr subscriber: level prefix, no time, no target,
/// no color.
pub fn init(level: LogLevel) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .compact()
        .with_filter(LevelFilter::from(level));

    Registry::default().with(layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_levels() {
        assert_eq!("debug".parse(), Ok(LogLevel::Debug));
        assert_eq!("WARN".parse(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn flag_is_removed_from_args() {
        let mut a = args(&["run", "--log", "trace", "prog.simpl"]);
        assert_eq!(take_log_flag(&mut a), Ok(LogLevel::Trace));
        assert_eq!(a, args(&["run", "prog.simpl"]));
    }

    #[test]
    fn flag_without_value() {
        let mut a = args(&["run", "prog.simpl", "--log"]);
        assert!(take_log_flag(&mut a).is_err());
    }
}
