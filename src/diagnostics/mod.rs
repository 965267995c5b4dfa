//! Binding diagnostics: lints over a dispatcher's registry
//!
//! This module provides a framework for checking a binding setup, useful for:
//! - Validating key maps loaded from config files
//! - CI checks on shipped profiles
//! - Explaining why a key does not do what a player expects
//!
//! # Example
//!
//! ```no_run
//! use platformer_input::diagnostics::{DiagnosticsRunner, checks::*};
//! use platformer_input::input::InputDispatcher;
//!
//! let dispatcher = InputDispatcher::new();
//! let report = DiagnosticsRunner::new()
//!     .add_check(AmbiguousBindingCheck::new())
//!     .add_check(KeylessBindingCheck::new())
//!     .run(&dispatcher);
//!
//! if report.is_healthy() {
//!     println!("All bindings usable");
//! }
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{BindingCheck, CheckResult, CheckStatus};
pub use reporter::{format_report, print_report};
pub use runner::{DiagnosticsReport, DiagnosticsRunner};

use crate::input::InputDispatcher;

/// Runs every built-in check against a dispatcher
pub fn run_all_checks(dispatcher: &InputDispatcher) -> DiagnosticsReport {
    DiagnosticsRunner::new()
        .add_check(checks::AmbiguousBindingCheck::new())
        .add_check(checks::KeylessBindingCheck::new())
        .add_check(checks::TextInputCheck::new())
        .add_check(checks::ListenerCheck::new())
        .run(dispatcher)
}
