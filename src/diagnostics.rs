//! Non-fatal findings of a translation run.
//!
//! Warnings describe a lossy but usable approximation, errors a task point
//! that could not be mapped at all. Fatal failures never come through here,
//! they are returned as `Err`.

use std::fmt::{self, Display};

use itertools::Itertools as _;
use serde::Serialize;
use tracing::{error, warn};

pub trait Diagnostics {
    fn warn(&mut self, message: String);
    fn error(&mut self, message: String);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "WARNING: {}", self.message),
            Severity::Error => write!(f, "ERROR: {}", self.message),
        }
    }
}

/// Collects everything in the order it was reported, logging as it goes.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.messages(Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.messages(Severity::Error)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn messages(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
            .map(|d| d.message.as_str())
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostics.iter().join("\n"))
    }
}

impl Diagnostics for Report {
    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message,
        });
    }

    fn error(&mut self, message: String) {
        error!("{message}");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            message,
        });
    }
}

/// Only logs, for callers that watch the `tracing` output anyway.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&mut self, message: String) {
        warn!("{message}");
    }

    fn error(&mut self, message: String) {
        error!("{message}");
    }
}
