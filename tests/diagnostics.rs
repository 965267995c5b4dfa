//! Integration tests for binding diagnostics over the shipped profiles

use std::path::PathBuf;

use platformer_input::AppConfig;
use platformer_input::diagnostics::{
    self, BindingCheck, CheckStatus, DiagnosticsRunner, checks::*,
};
use platformer_input::input::{InputDispatcher, KBind, KeyCode, TriggerKind};

fn profile_path(profile: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join(format!("{profile}.toml"))
}

/// Loads a shipped profile with a no-op action for every configured trigger
fn profile_dispatcher(profile: &str) -> InputDispatcher {
    let config = AppConfig::from_file(&profile_path(profile)).unwrap();
    let mut dispatcher = config
        .dispatcher_with(|binding, bind| {
            binding.triggers.iter().fold(bind, |bind, kind| match kind {
                TriggerKind::Press => bind.on_press("test", || true),
                TriggerKind::Hold => bind.on_hold("test", || true),
                TriggerKind::Release => bind.on_release("test", || true),
            })
        })
        .unwrap();
    for axis in &config.axes {
        dispatcher
            .axis_binding_mut(&axis.name)
            .unwrap()
            .listen("test", |_| {});
    }
    dispatcher
}

#[test]
fn test_shipped_profiles_are_clean() {
    for profile in ["release", "debug"] {
        let dispatcher = profile_dispatcher(profile);
        let report = diagnostics::run_all_checks(&dispatcher);

        if report.exit_code() != 0 {
            eprintln!("\n{}", diagnostics::format_report(&report));
        }
        assert_eq!(report.exit_code(), 0, "profile {profile} has findings");
        assert_eq!(report.total, 4);
    }
}

#[test]
fn test_profiles_name_themselves() {
    let release = AppConfig::from_file(&profile_path("release")).unwrap();
    let debug = AppConfig::from_file(&profile_path("debug")).unwrap();

    assert_eq!(release.profile, "release");
    assert_eq!(debug.profile, "debug");
    assert!(debug.input.log_activations);
    assert!(!release.input.log_activations);
    assert!(debug.bindings.len() > release.bindings.len());
}

#[test]
fn test_text_input_check_lists_typed_keys() {
    let dispatcher = profile_dispatcher("release");
    let result = TextInputCheck::new().check(&dispatcher);

    assert_eq!(result.status, CheckStatus::Pass);
    assert!(result.findings.contains(&"Space \"jump\"".to_string()));
    assert!(!result.findings.iter().any(|finding| finding.contains("quick save")));
}

#[test]
fn test_ambiguous_bindings_warn() {
    let mut dispatcher = profile_dispatcher("release");
    dispatcher.add_binding(
        KBind::key("talk", KeyCode::E)
            .with_priority(100)
            .on_press("talk", || true),
    );

    let report = DiagnosticsRunner::new()
        .add_check(AmbiguousBindingCheck::new())
        .add_check(KeylessBindingCheck::new())
        .run(&dispatcher);

    assert_eq!(report.exit_code(), 2);
    let result = report.result("Ambiguous bindings").unwrap();
    assert_eq!(result.status, CheckStatus::Warn);
    assert_eq!(result.findings, vec!["[press] E :100: \"interact\", \"talk\""]);
    assert_eq!(report.result("Keyless bindings").unwrap().status, CheckStatus::Pass);
}

#[test]
fn test_bare_profile_is_broken() {
    let config = AppConfig::from_file(&profile_path("release")).unwrap();
    let dispatcher = config.dispatcher().unwrap();
    let result = ListenerCheck::new().check(&dispatcher);

    assert_eq!(result.status, CheckStatus::Fail);
    assert_eq!(result.findings.len(), config.bindings.len() + config.axes.len());

    let report = diagnostics::run_all_checks(&dispatcher);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(report.failed, 1);
    assert!(diagnostics::format_report(&report).contains("BROKEN BINDINGS"));
}
