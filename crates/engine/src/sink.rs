//! Terminal sink for operator diagnostics.

use std::{
    cell::RefCell,
    io::{self, Stderr, Stdout, Write},
};

use hostshell_types::{LogLevel, LogSink};

/// Writes one line per diagnostic: info and debug to the output stream,
/// warnings and errors to the error stream.
///
/// Debug lines are dropped unless `debug_logging` is set.
pub struct StdioSink<O: Write = Stdout, E: Write = Stderr> {
    out: RefCell<O>,
    err: RefCell<E>,
    debug_logging: bool,
}

impl StdioSink {
    pub fn new(debug_logging: bool) -> Self {
        Self::with_writers(io::stdout(), io::stderr(), debug_logging)
    }
}

impl<O: Write, E: Write> StdioSink<O, E> {
    pub fn with_writers(out: O, err: E, debug_logging: bool) -> Self {
        Self {
            out: RefCell::new(out),
            err: RefCell::new(err),
            debug_logging,
        }
    }

    pub fn into_writers(self) -> (O, E) {
        (self.out.into_inner(), self.err.into_inner())
    }
}

impl<O: Write, E: Write> LogSink for StdioSink<O, E> {
    fn write(&self, level: LogLevel, message: &str) {
        let result = match level {
            LogLevel::Debug if !self.debug_logging => return,
            LogLevel::Debug | LogLevel::Info => writeln!(self.out.borrow_mut(), "{}{}", level.prefix(), message),
            LogLevel::Warning | LogLevel::Error => writeln!(self.err.borrow_mut(), "{}{}", level.prefix(), message),
        };
        // Write failures never reach the caller.
        if let Err(error) = result {
            tracing::trace!(%error, "dropping diagnostic line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(debug_logging: bool, lines: &[(LogLevel, &str)]) -> (String, String) {
        let sink = StdioSink::with_writers(Vec::new(), Vec::new(), debug_logging);
        for (level, message) in lines {
            sink.write(*level, message);
        }
        let (out, err) = sink.into_writers();
        (String::from_utf8_lossy(&out).into_owned(), String::from_utf8_lossy(&err).into_owned())
    }

    #[test]
    fn levels_are_routed_and_prefixed() {
        let (out, err) = captured(
            true,
            &[
                (LogLevel::Info, "launching"),
                (LogLevel::Debug, "probe skipped"),
                (LogLevel::Warning, "alias dropped"),
                (LogLevel::Error, "no toolkit"),
            ],
        );
        assert_eq!(out, "launching\nDEBUG: probe skipped\n");
        assert_eq!(err, "WARNING: alias dropped\nERROR: no toolkit\n");
    }

    #[test]
    fn debug_lines_need_the_flag() {
        let (out, err) = captured(false, &[(LogLevel::Debug, "hidden"), (LogLevel::Info, "shown")]);
        assert_eq!(out, "shown\n");
        assert!(err.is_empty());
    }
}
