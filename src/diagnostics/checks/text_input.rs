//! Bindings silenced while a text field has focus

use crate::diagnostics::check::{BindingCheck, CheckResult};
use crate::input::{InputDispatcher, is_ambiguous_with_text_input};

/// Lists the bindings that typing could trigger
///
/// This never warns; the listing tells which actions stop working while the
/// player types.
pub struct TextInputCheck;

impl TextInputCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextInputCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingCheck for TextInputCheck {
    fn name(&self) -> &'static str {
        "Text input"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Bindings skipped while text entry has keyboard focus")
    }

    fn check(&self, dispatcher: &InputDispatcher) -> CheckResult {
        let findings = dispatcher
            .bindings()
            .filter(|(_, bind)| bind.has_keys() && is_ambiguous_with_text_input(bind))
            .map(|(_, bind)| bind.to_string())
            .collect::<Vec<_>>();

        CheckResult::pass(format!("{} bindings suppressed during text input", findings.len()))
            .with_findings(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::check::CheckStatus;
    use crate::input::{KBind, KeyCode};

    #[test]
    fn test_lists_typed_bindings() {
        let mut dispatcher = InputDispatcher::new();
        dispatcher.add_binding(KBind::key("jump", KeyCode::Space));
        dispatcher.add_binding(KBind::key("help", KeyCode::F1));
        dispatcher.add_binding(KBind::combination("save", "Ctrl+S".parse().unwrap()));

        let result = TextInputCheck::new().check(&dispatcher);
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.findings, vec!["Space \"jump\""]);
        assert_eq!(result.message, "1 bindings suppressed during text input");
    }
}
