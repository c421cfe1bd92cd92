//! Logging system
//!
//! Module-tagged, leveled logging to stderr. Components log through the
//! `log_*` macros with a short module tag so one resolution can be traced
//! across sources.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::config;

/// Log severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    fn label(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN ",
            LogLevel::Info => "INFO ",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Initialize the logging system, honoring the level environment variable.
pub fn init() {
    if let Ok(name) = std::env::var(config::logging::LEVEL_ENV) {
        if let Some(level) = LogLevel::from_name(&name) {
            set_level(level);
        }
    }
}

/// Override the process-wide log level.
pub fn set_level(level: LogLevel) {
    LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Current process-wide log level.
pub fn level() -> LogLevel {
    match LEVEL.load(Ordering::SeqCst) {
        0 => LogLevel::Error,
        1 => LogLevel::Warn,
        2 => LogLevel::Info,
        _ => LogLevel::Debug,
    }
}

/// Emit one log line. Used through the `log_*` macros, not directly.
pub fn write(msg_level: LogLevel, module: &str, args: fmt::Arguments<'_>) {
    if msg_level > level() {
        return;
    }
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    eprintln!("[{}] [{}] [{}] {}", timestamp, msg_level.label(), module, args);
}

#[macro_export]
macro_rules! log_error {
    ($module:expr, $($arg:tt)*) => {
        $crate::logging::write($crate::logging::LogLevel::Error, $module, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($module:expr, $($arg:tt)*) => {
        $crate::logging::write($crate::logging::LogLevel::Warn, $module, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($module:expr, $($arg:tt)*) => {
        $crate::logging::write($crate::logging::LogLevel::Info, $module, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($module:expr, $($arg:tt)*) => {
        $crate::logging::write($crate::logging::LogLevel::Debug, $module, format_args!($($arg)*))
    };
}
