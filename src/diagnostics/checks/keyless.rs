//! Bindings with no keys

use crate::diagnostics::check::{BindingCheck, CheckResult};
use crate::input::InputDispatcher;

/// Warns about bindings that have no combination, or only "no key"
///
/// They are legal and never trigger; usually they are placeholders waiting
/// for the player to assign a key, or typos in a config file.
pub struct KeylessBindingCheck;

impl KeylessBindingCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KeylessBindingCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingCheck for KeylessBindingCheck {
    fn name(&self) -> &'static str {
        "Keyless bindings"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Bindings that can never trigger because they have no keys")
    }

    fn check(&self, dispatcher: &InputDispatcher) -> CheckResult {
        let findings = dispatcher
            .bindings()
            .filter(|(_, bind)| !bind.has_keys())
            .map(|(_, bind)| format!("\"{}\" has no keys", bind.name()))
            .collect::<Vec<_>>();

        if findings.is_empty() {
            CheckResult::pass(format!("{} bindings have keys", dispatcher.binding_count()))
        } else {
            CheckResult::warn(format!("{} bindings have no keys", findings.len())).with_findings(findings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::check::CheckStatus;
    use crate::input::{KBind, KeyCode};

    #[test]
    fn test_keyless_bindings_warn() {
        let mut dispatcher = InputDispatcher::new();
        dispatcher.add_binding(KBind::key("jump", KeyCode::Space));
        assert_eq!(KeylessBindingCheck::new().check(&dispatcher).status, CheckStatus::Pass);

        dispatcher.add_binding(KBind::key("unassigned", KeyCode::None));
        dispatcher.add_binding(KBind::new("empty", []));
        let result = KeylessBindingCheck::new().check(&dispatcher);
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(
            result.findings,
            vec!["\"unassigned\" has no keys", "\"empty\" has no keys"]
        );
    }
}
