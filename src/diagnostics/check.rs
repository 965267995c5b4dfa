//! Core binding check trait and types

use std::time::Duration;

use crate::input::InputDispatcher;

/// Status of a binding check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Nothing to report
    Pass,
    /// Bindings that work but probably not as intended
    Warn,
    /// A broken registry
    Fail,
}

impl CheckStatus {
    /// Returns the status as a colored string
    pub fn as_colored_str(&self) -> String {
        use colored::Colorize;
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }
}

/// Result of a binding check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// Brief message describing the result
    pub message: String,
    /// One line per affected binding
    pub findings: Vec<String>,
    /// How long the check took
    pub duration: Duration,
}

impl CheckResult {
    fn with_status(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            findings: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Pass, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::with_status(CheckStatus::Fail, message)
    }

    /// Adds the affected bindings to the result
    pub fn with_findings(mut self, findings: Vec<String>) -> Self {
        self.findings = findings;
        self
    }

    /// Sets the duration for this check
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Findings joined for display, if there are any
    pub fn details(&self) -> Option<String> {
        (!self.findings.is_empty()).then(|| {
            self.findings
                .iter()
                .map(|finding| format!("  {}", finding))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }
}

/// Trait for lints over a dispatcher's registry
pub trait BindingCheck {
    /// Name shown in the report
    fn name(&self) -> &'static str;

    /// Inspect the registered bindings
    fn check(&self, dispatcher: &InputDispatcher) -> CheckResult;

    /// Optional description of what this check looks for
    fn description(&self) -> Option<&'static str> {
        None
    }
}
