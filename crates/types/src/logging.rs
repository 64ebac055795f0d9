//! Operator-facing diagnostic lines.
//!
//! The host expects diagnostics as single human-readable lines classified by
//! severity. A [`LogSink`] receives those lines; where they end up (terminal,
//! tracing subscriber, test buffer) is up to the implementation.

use std::fmt;

/// Severity of a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Prefix written in front of the message, empty for plain info lines.
    pub fn prefix(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG: ",
            LogLevel::Info => "",
            LogLevel::Warning => "WARNING: ",
            LogLevel::Error => "ERROR: ",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        f.write_str(label)
    }
}

/// Destination for one-line diagnostics.
pub trait LogSink {
    /// Write a single line at the given level.
    fn write(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.write(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.write(LogLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.write(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.write(LogLevel::Error, message);
    }
}

/// Sink that forwards every line to the `tracing` macros.
///
/// Useful when no terminal is attached, or as the default for library
/// callers that already run a subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warning => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder(RefCell<Vec<(LogLevel, String)>>);

    impl LogSink for Recorder {
        fn write(&self, level: LogLevel, message: &str) {
            self.0.borrow_mut().push((level, message.to_string()));
        }
    }

    #[test]
    fn provided_methods_tag_the_level() {
        let sink = Recorder::default();
        sink.debug("a");
        sink.info("b");
        sink.warning("c");
        sink.error("d");
        let levels: Vec<LogLevel> = sink.0.borrow().iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, vec![LogLevel::Debug, LogLevel::Info, LogLevel::Warning, LogLevel::Error]);
    }

    #[test]
    fn prefixes_match_terminal_format() {
        assert_eq!(LogLevel::Info.prefix(), "");
        assert_eq!(LogLevel::Warning.prefix(), "WARNING: ");
        assert_eq!(format!("{}", LogLevel::Error), "error");
    }
}
