//! Leveled diagnostics emitted by the validator, catalog and scheduler
//!
//! Components never log through a process-wide level; they receive a sink
//! whose threshold is built from the validated `loglevel` config key.

use std::str::FromStr;

use tracing::{debug, error, info, warn};

/// Diagnostic severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

impl FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            _ => Err(()),
        }
    }
}

/// Consumer of (level, message) diagnostic pairs
pub trait DiagnosticSink {
    fn emit(&mut self, level: Level, message: String);
}

/// Sink forwarding diagnostics to `tracing`, dropping anything below the
/// configured threshold
pub struct TracingSink {
    threshold: Level,
}

impl TracingSink {
    pub fn new(threshold: Level) -> Self {
        Self { threshold }
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, level: Level, message: String) {
        if level < self.threshold {
            return;
        }
        match level {
            Level::Debug => debug!("{message}"),
            Level::Info => info!("{message}"),
            Level::Warning => warn!("{message}"),
            Level::Error => error!("{message}"),
        }
    }
}

/// Sink collecting diagnostics in memory; used by tests to assert on
/// emitted anomalies
#[derive(Debug, Default)]
pub struct CaptureSink {
    pub entries: Vec<(Level, String)>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages_at(&self, level: Level) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl DiagnosticSink for CaptureSink {
    fn emit(&mut self, level: Level, message: String) {
        self.entries.push((level, message));
    }
}
