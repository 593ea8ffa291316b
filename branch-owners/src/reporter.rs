//! Logging sink handed explicitly to each stage of the pipeline.

use std::fmt::Display;

use log::{Level, LevelFilter};

/// Receives log records with structured fields. Stages take a
/// `&dyn Reporter` instead of writing to a global logger.
pub trait Reporter {
    fn log(&self, level: Level, message: &str, fields: &[(&str, &dyn Display)]);

    fn error(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.log(Level::Error, message, fields);
    }

    fn warn(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.log(Level::Warn, message, fields);
    }

    fn info(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.log(Level::Info, message, fields);
    }

    fn debug(&self, message: &str, fields: &[(&str, &dyn Display)]) {
        self.log(Level::Debug, message, fields);
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn log(&self, _level: Level, _message: &str, _fields: &[(&str, &dyn Display)]) {}
}

/// Writes records to stderr, dropping anything less severe than
/// `max_level`.
#[derive(Debug, Clone, Copy)]
pub struct StderrReporter {
    max_level: LevelFilter,
}

impl StderrReporter {
    pub fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }
}

impl Reporter for StderrReporter {
    fn log(&self, level: Level, message: &str, fields: &[(&str, &dyn Display)]) {
        if self.enabled(level) {
            eprintln!("{}", format_record(level, message, fields));
        }
    }
}

/// Renders a record as `LEVEL message key=value ...`.
pub fn format_record(level: Level, message: &str, fields: &[(&str, &dyn Display)]) -> String {
    let mut line = format!("{:<5} {}", level, message);
    for (key, value) in fields {
        line.push_str(&format!(" {}={}", key, value));
    }
    line
}
