//! Binding groups: per-trigger conflict resolution
//!
//! Every frame each group runs two phases. `scan` collects the bindings whose
//! combinations trigger this frame. `resolve` then sorts them, drops the
//! less specific chords sharing a primary key, and invokes the survivors
//! while tracking which keys were consumed.

use std::collections::HashMap;

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::debug;

use super::bind::KBind;
use super::combination::KCombination;
use super::events::TriggerKind;
use super::key_code::KeyCode;
use super::state::InputFrame;

/// Stable handle of a binding registered with a dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(pub(crate) u64);

/// Bindings by handle, in registration order
pub type Registry = IndexMap<BindingId, KBind>;

/// Extra per-binding gate applied during a scan
pub type ScanFilter = fn(&KBind) -> bool;

/// A change to a group's membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingChange {
    Add,
    Remove,
    /// Remove followed by Add; only the dispatcher may expand it
    Update,
}

/// Debug log switches used while resolving
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveLogging {
    /// Report runs of triggered bindings that share a primary key
    pub conflicts: bool,
    /// Report the bindings invoked by each pass
    pub activations: bool,
}

/// A binding that triggered this frame and the combination that did it
#[derive(Debug, Clone)]
struct Trigger {
    id: BindingId,
    combination: KCombination,
    priority: i32,
}

/// Outcome of invoking one binding during a resolve pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub id: BindingId,
    /// True if an action reported success
    pub handled: bool,
}

/// Bindings that listen for one trigger kind
#[derive(Debug)]
pub struct BindingGroup {
    kind: TriggerKind,
    /// Members in listing order
    members: Vec<BindingId>,
    /// Scratch: triggered this frame, cleared by every resolve
    triggered: Vec<Trigger>,
    /// Scratch: key to the binding that consumed it, cleared by every resolve
    consumed: HashMap<KeyCode, BindingId>,
}

impl BindingGroup {
    /// Creates an empty group for one trigger kind
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            members: Vec::new(),
            triggered: Vec::new(),
            consumed: HashMap::new(),
        }
    }

    pub fn kind(&self) -> TriggerKind {
        self.kind
    }

    /// Members in listing order
    pub fn members(&self) -> &[BindingId] {
        &self.members
    }

    pub fn contains(&self, id: BindingId) -> bool {
        self.members.contains(&id)
    }

    /// Whether a binding belongs in this group: it has listeners for the kind
    pub fn accepts(&self, bind: &KBind) -> bool {
        bind.events().count(self.kind) > 0
    }

    /// Applies an add or remove and reports whether membership changed
    ///
    /// # Panics
    ///
    /// Panics on [`BindingChange::Update`], which must be expanded into a
    /// remove and an add by the caller.
    pub fn apply(&mut self, id: BindingId, change: BindingChange, registry: &Registry) -> bool {
        match change {
            BindingChange::Add => {
                let Some(bind) = registry.get(&id) else {
                    return false;
                };
                if !self.accepts(bind) {
                    return false;
                }
                if self.contains(id) {
                    debug!(group = %self.kind, binding = %bind.name(), "will not add duplicate");
                    return false;
                }
                self.members.push(id);
                // Stable: equal bindings keep their insertion order
                self.members.sort_by(|a, b| match (registry.get(a), registry.get(b)) {
                    (Some(a), Some(b)) => a.listing_order(b),
                    _ => std::cmp::Ordering::Equal,
                });
                true
            }
            BindingChange::Remove => match self.members.iter().position(|member| *member == id) {
                Some(index) => {
                    self.members.remove(index);
                    true
                }
                None => false,
            },
            BindingChange::Update => {
                panic!("update is a remove followed by an add and must never be applied directly")
            }
        }
    }

    /// Collects every member that triggers this frame
    ///
    /// `filter` returning true excludes a binding. It is only consulted for
    /// bindings that actually triggered.
    pub fn scan(&mut self, registry: &Registry, frame: &mut InputFrame<'_>, filter: Option<ScanFilter>) {
        for id in &self.members {
            let Some(bind) = registry.get(id) else {
                continue;
            };
            let Some(combination) = bind.triggered(self.kind, frame) else {
                continue;
            };
            if filter.is_some_and(|excluded| excluded(bind)) {
                continue;
            }
            self.triggered.push(Trigger {
                id: *id,
                combination: combination.clone(),
                priority: bind.priority(),
            });
        }
    }

    /// Number of entries collected by the last scan and not yet resolved
    pub fn pending(&self) -> usize {
        self.triggered.len()
    }

    /// Prunes and invokes what the last scan collected
    ///
    /// Returns every binding that was invoked, in invocation order. The
    /// scratch state is always empty afterwards.
    pub fn resolve(&mut self, registry: &mut Registry, logging: ResolveLogging) -> Vec<Invocation> {
        let mut triggered = std::mem::take(&mut self.triggered);
        if triggered.is_empty() {
            return Vec::new();
        }

        // Most specific first; ties by priority, then scan order
        triggered.sort_by(|a, b| {
            a.combination
                .cmp(&b.combination)
                .then(a.priority.cmp(&b.priority))
        });

        let survivors = self.prune(triggered, registry, logging);

        let mut invoked = Vec::with_capacity(survivors.len());
        for trigger in &survivors {
            let Some(bind) = registry.get_mut(&trigger.id) else {
                continue;
            };
            let key = trigger.combination.key();
            let always = bind.is_always_triggerable();
            if !always && self.consumed.contains_key(&key) {
                continue;
            }
            let handled = bind.fire(self.kind);
            if handled && !always {
                self.consumed.insert(key, trigger.id);
            }
            invoked.push(Invocation {
                id: trigger.id,
                handled,
            });
        }

        if logging.activations {
            let names = invoked
                .iter()
                .filter_map(|invocation| registry.get(&invocation.id))
                .map(KBind::name)
                .join(", ");
            debug!(group = %self.kind, activated = %names, "resolve pass");
        }

        self.consumed.clear();
        invoked
    }

    /// Keeps only the most complex entries of each run sharing a primary key
    fn prune(&self, triggered: Vec<Trigger>, registry: &Registry, logging: ResolveLogging) -> Vec<Trigger> {
        let mut survivors = Vec::with_capacity(triggered.len());
        let runs = triggered
            .into_iter()
            .chunk_by(|trigger| trigger.combination.key());
        for (key, run) in &runs {
            let run = run.collect::<Vec<_>>();
            let keep = run
                .iter()
                .map(|trigger| trigger.combination.complexity())
                .max()
                .unwrap_or_default();

            if logging.conflicts && run.len() > 1 {
                let report = run
                    .iter()
                    .map(|trigger| {
                        let name = registry.get(&trigger.id).map_or("?", KBind::name);
                        let removed = if trigger.combination.complexity() < keep {
                            " [removed]"
                        } else {
                            ""
                        };
                        format!("{} \"{}\" {}{}", trigger.combination, name, trigger.priority, removed)
                    })
                    .join("; ");
                debug!(group = %self.kind, %key, candidates = %report, "possible conflict");
            }

            survivors.extend(
                run.into_iter()
                    .filter(|trigger| trigger.combination.complexity() == keep),
            );
        }
        survivors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::backend::ManualBackend;
    use crate::input::state::KeyStates;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn press_bind(name: &'static str, combo: &str, log: &Log, handled: bool) -> KBind {
        let l = log.clone();
        KBind::combination(name, combo.parse().unwrap()).on_press(name, move || {
            l.borrow_mut().push(name);
            handled
        })
    }

    fn register(registry: &mut Registry, group: &mut BindingGroup, bind: KBind) -> BindingId {
        let id = BindingId(registry.len() as u64 + 1);
        registry.insert(id, bind);
        group.apply(id, BindingChange::Add, registry);
        id
    }

    fn run_frame(group: &mut BindingGroup, registry: &mut Registry, keys: &mut KeyStates, backend: &ManualBackend) -> Vec<Invocation> {
        {
            let mut frame = InputFrame::new(keys, backend);
            group.scan(registry, &mut frame, None);
        }
        let invoked = group.resolve(registry, ResolveLogging::default());
        keys.advance_frame();
        invoked
    }

    #[test]
    fn test_membership_requires_listeners() {
        let mut registry = Registry::new();
        let mut group = BindingGroup::new(TriggerKind::Press);
        let log = Log::default();

        let silent = register(&mut registry, &mut group, KBind::key("silent", KeyCode::Q));
        let jump = register(&mut registry, &mut group, press_bind("jump", "Space", &log, true));

        assert!(!group.contains(silent));
        assert!(group.contains(jump));
        assert!(!group.apply(jump, BindingChange::Add, &registry));
        assert!(group.apply(jump, BindingChange::Remove, &registry));
        assert!(!group.apply(jump, BindingChange::Remove, &registry));
    }

    #[test]
    #[should_panic(expected = "remove followed by an add")]
    fn test_update_must_not_be_applied_directly() {
        let mut group = BindingGroup::new(TriggerKind::Hold);
        group.apply(BindingId(1), BindingChange::Update, &Registry::new());
    }

    #[test]
    fn test_members_kept_in_listing_order() {
        let mut registry = Registry::new();
        let mut group = BindingGroup::new(TriggerKind::Press);
        let log = Log::default();
        let w = register(&mut registry, &mut group, press_bind("w", "W", &log, true));
        let a = register(&mut registry, &mut group, press_bind("a", "A", &log, true));
        let shift_a = register(&mut registry, &mut group, press_bind("shift a", "Shift+A", &log, true));
        assert_eq!(group.members(), &[shift_a, a, w]);
    }

    #[test]
    fn test_more_specific_chord_wins() {
        let mut registry = Registry::new();
        let mut group = BindingGroup::new(TriggerKind::Press);
        let log = Log::default();
        register(&mut registry, &mut group, press_bind("walk", "W", &log, false));
        register(&mut registry, &mut group, press_bind("run", "Shift+W", &log, false));

        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.press(KeyCode::LeftShift);
        backend.press(KeyCode::W);
        let invoked = run_frame(&mut group, &mut registry, &mut keys, &backend);

        assert_eq!(invoked.len(), 1);
        assert_eq!(*log.borrow(), vec!["run"]);
        assert_eq!(group.pending(), 0);
    }

    #[test]
    fn test_consumption_suppresses_later_binding() {
        let mut registry = Registry::new();
        let mut group = BindingGroup::new(TriggerKind::Press);
        let log = Log::default();
        register(&mut registry, &mut group, press_bind("open", "E", &log, true).with_priority(10));
        register(&mut registry, &mut group, press_bind("inspect", "E", &log, true).with_priority(20));

        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.press(KeyCode::E);
        run_frame(&mut group, &mut registry, &mut keys, &backend);
        assert_eq!(*log.borrow(), vec!["open"]);
    }

    #[test]
    fn test_failed_action_does_not_consume() {
        let mut registry = Registry::new();
        let mut group = BindingGroup::new(TriggerKind::Press);
        let log = Log::default();
        register(&mut registry, &mut group, press_bind("door", "E", &log, false).with_priority(1));
        register(&mut registry, &mut group, press_bind("pickup", "E", &log, true).with_priority(2));

        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.press(KeyCode::E);
        let invoked = run_frame(&mut group, &mut registry, &mut keys, &backend);
        assert_eq!(*log.borrow(), vec!["door", "pickup"]);
        assert_eq!(invoked.iter().map(|i| i.handled).collect::<Vec<_>>(), vec![false, true]);
    }

    #[test]
    fn test_always_triggerable_ignores_consumption() {
        let mut registry = Registry::new();
        let mut group = BindingGroup::new(TriggerKind::Press);
        let log = Log::default();
        register(&mut registry, &mut group, press_bind("first", "E", &log, true).with_priority(1));
        register(
            &mut registry,
            &mut group,
            press_bind("sound", "E", &log, true).with_priority(2).always_triggerable(true),
        );
        register(&mut registry, &mut group, press_bind("last", "E", &log, true).with_priority(3));

        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.press(KeyCode::E);
        run_frame(&mut group, &mut registry, &mut keys, &backend);
        assert_eq!(*log.borrow(), vec!["first", "sound"]);
    }

    #[test]
    fn test_separate_keys_do_not_consume_each_other() {
        let mut registry = Registry::new();
        let mut group = BindingGroup::new(TriggerKind::Press);
        let log = Log::default();
        register(&mut registry, &mut group, press_bind("up", "W", &log, true));
        register(&mut registry, &mut group, press_bind("left", "A", &log, true));

        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.press(KeyCode::W);
        backend.press(KeyCode::A);
        run_frame(&mut group, &mut registry, &mut keys, &backend);
        assert_eq!(*log.borrow(), vec!["left", "up"]);
    }

    fn exclude_all(_: &KBind) -> bool {
        true
    }

    #[test]
    fn test_filter_excludes_triggered_binding() {
        let mut registry = Registry::new();
        let mut group = BindingGroup::new(TriggerKind::Press);
        let log = Log::default();
        register(&mut registry, &mut group, press_bind("jump", "Space", &log, true));

        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.press(KeyCode::Space);
        {
            let mut frame = InputFrame::new(&mut keys, &backend);
            group.scan(&registry, &mut frame, Some(exclude_all as ScanFilter));
        }
        assert_eq!(group.pending(), 0);
        assert!(group.resolve(&mut registry, ResolveLogging::default()).is_empty());
        assert!(log.borrow().is_empty());
    }
}
