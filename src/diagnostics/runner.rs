//! Runner for orchestrating binding checks

use std::time::Instant;

use tracing::debug;

use super::check::{BindingCheck, CheckResult, CheckStatus};
use crate::input::InputDispatcher;

/// Results from running a set of binding checks
#[derive(Debug)]
pub struct DiagnosticsReport {
    /// Individual check results with their check names
    pub results: Vec<(String, CheckResult)>,
    pub total: usize,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl DiagnosticsReport {
    /// Returns true if no check failed
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// Returns the appropriate exit code for this report
    /// 0 = all pass, 1 = any fail, 2 = any warn (but no fail)
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }

    /// Result of the check with this name
    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|(check, _)| check == name)
            .map(|(_, result)| result)
    }
}

/// Runs binding checks against one dispatcher and collects the results
pub struct DiagnosticsRunner {
    checks: Vec<Box<dyn BindingCheck>>,
}

impl DiagnosticsRunner {
    /// Creates a new runner with no checks
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Adds a check to the runner
    pub fn add_check<C: BindingCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Runs all registered checks and returns a report
    pub fn run(&self, dispatcher: &InputDispatcher) -> DiagnosticsReport {
        let mut results = Vec::with_capacity(self.checks.len());
        let (mut passed, mut warned, mut failed) = (0, 0, 0);

        for check in &self.checks {
            let start = Instant::now();
            let result = check.check(dispatcher).with_duration(start.elapsed());
            debug!(
                check = check.name(),
                description = check.description().unwrap_or_default(),
                status = ?result.status,
                findings = result.findings.len(),
                "binding check finished"
            );

            match result.status {
                CheckStatus::Pass => passed += 1,
                CheckStatus::Warn => warned += 1,
                CheckStatus::Fail => failed += 1,
            }
            results.push((check.name().to_string(), result));
        }

        DiagnosticsReport {
            total: results.len(),
            results,
            passed,
            warned,
            failed,
        }
    }
}

impl Default for DiagnosticsRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(CheckStatus);

    impl BindingCheck for Fixed {
        fn name(&self) -> &'static str {
            match self.0 {
                CheckStatus::Pass => "pass",
                CheckStatus::Warn => "warn",
                CheckStatus::Fail => "fail",
            }
        }

        fn check(&self, _: &InputDispatcher) -> CheckResult {
            match self.0 {
                CheckStatus::Pass => CheckResult::pass("ok"),
                CheckStatus::Warn => CheckResult::warn("hmm"),
                CheckStatus::Fail => CheckResult::fail("no"),
            }
        }
    }

    #[test]
    fn test_exit_codes() {
        let dispatcher = InputDispatcher::new();
        let pass = DiagnosticsRunner::new().add_check(Fixed(CheckStatus::Pass)).run(&dispatcher);
        assert_eq!(pass.exit_code(), 0);

        let warn = DiagnosticsRunner::new()
            .add_check(Fixed(CheckStatus::Pass))
            .add_check(Fixed(CheckStatus::Warn))
            .run(&dispatcher);
        assert_eq!(warn.exit_code(), 2);
        assert!(warn.is_healthy());

        let fail = DiagnosticsRunner::new()
            .add_check(Fixed(CheckStatus::Warn))
            .add_check(Fixed(CheckStatus::Fail))
            .run(&dispatcher);
        assert_eq!(fail.exit_code(), 1);
        assert_eq!((fail.total, fail.warned, fail.failed), (2, 1, 1));
        assert_eq!(fail.result("fail").map(|r| r.status), Some(CheckStatus::Fail));
    }
}
