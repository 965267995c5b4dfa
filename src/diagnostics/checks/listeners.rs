//! Bindings nothing listens to

use crate::diagnostics::check::{BindingCheck, CheckResult};
use crate::input::{InputDispatcher, TriggerKind};

/// Fails on key bindings with no listener of any kind and axis bindings
/// with no change listener
///
/// Such bindings belong to no group, so no key state can ever fire them.
pub struct ListenerCheck;

impl ListenerCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ListenerCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingCheck for ListenerCheck {
    fn name(&self) -> &'static str {
        "Listeners"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Bindings registered without any press, hold, release, or change listener")
    }

    fn check(&self, dispatcher: &InputDispatcher) -> CheckResult {
        let keys = dispatcher
            .bindings()
            .filter(|(_, bind)| {
                TriggerKind::ALL
                    .into_iter()
                    .all(|kind| bind.events().count(kind) == 0)
            })
            .map(|(_, bind)| format!("\"{}\" has no listeners", bind.name()));
        let axes = dispatcher
            .axis_bindings()
            .iter()
            .filter(|bind| bind.events().count() == 0)
            .map(|bind| format!("axis \"{}\" has no listeners", bind.name()));
        let findings = keys.chain(axes).collect::<Vec<_>>();

        if findings.is_empty() {
            CheckResult::pass("Every binding has listeners")
        } else {
            CheckResult::fail(format!("{} bindings never fire", findings.len())).with_findings(findings)
        }
    }
}
