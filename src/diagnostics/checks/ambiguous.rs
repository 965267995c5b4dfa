//! Bindings that tie for the same key in one group

use itertools::Itertools;

use crate::diagnostics::check::{BindingCheck, CheckResult};
use crate::input::{InputDispatcher, KBind, TriggerKind};

/// Warns when two bindings in a group share their first combination and
/// their priority
///
/// Such bindings fire in registration order, which is rarely intended.
/// Always-triggerable bindings are skipped since they never compete.
pub struct AmbiguousBindingCheck;

impl AmbiguousBindingCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmbiguousBindingCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingCheck for AmbiguousBindingCheck {
    fn name(&self) -> &'static str {
        "Ambiguous bindings"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Bindings in one group with the same first keys and priority")
    }

    fn check(&self, dispatcher: &InputDispatcher) -> CheckResult {
        let mut findings = Vec::new();

        for kind in TriggerKind::ALL {
            let competing = dispatcher
                .group(kind)
                .members()
                .iter()
                .filter_map(|id| dispatcher.binding_by_id(*id))
                .filter(|bind| bind.has_keys() && !bind.is_always_triggerable())
                .collect::<Vec<&KBind>>();

            // Members are in listing order, so ties are adjacent
            let runs = competing
                .into_iter()
                .chunk_by(|bind| (bind.combinations().first().cloned(), bind.priority()));
            for ((keys, priority), run) in &runs {
                let names = run.map(|bind| format!("\"{}\"", bind.name())).collect::<Vec<_>>();
                if names.len() > 1
                    && let Some(keys) = keys
                {
                    findings.push(format!(
                        "[{}] {} :{}: {}",
                        kind,
                        keys,
                        priority,
                        names.join(", ")
                    ));
                }
            }
        }

        if findings.is_empty() {
            CheckResult::pass("No ambiguous bindings")
        } else {
            CheckResult::warn(format!("{} ambiguous key assignments", findings.len()))
                .with_findings(findings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::check::CheckStatus;
    use crate::input::KeyCode;

    #[test]
    fn test_same_key_same_priority_warns() {
        let mut dispatcher = InputDispatcher::new();
        dispatcher.add_binding(KBind::key("open", KeyCode::E).on_press("open", || true));
        dispatcher.add_binding(KBind::key("talk", KeyCode::E).on_press("talk", || true));
        dispatcher.add_binding(KBind::key("jump", KeyCode::Space).on_press("jump", || true));

        let result = AmbiguousBindingCheck::new().check(&dispatcher);
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(result.findings, vec!["[press] E :1000: \"open\", \"talk\""]);
    }

    #[test]
    fn test_priority_or_always_triggerable_resolves_tie() {
        let mut dispatcher = InputDispatcher::new();
        dispatcher.add_binding(KBind::key("open", KeyCode::E).with_priority(1).on_press("open", || true));
        dispatcher.add_binding(KBind::key("talk", KeyCode::E).on_press("talk", || true));
        dispatcher.add_binding(
            KBind::key("click", KeyCode::E)
                .always_triggerable(true)
                .on_press("click", || false),
        );

        let result = AmbiguousBindingCheck::new().check(&dispatcher);
        assert_eq!(result.status, CheckStatus::Pass);
    }
}
