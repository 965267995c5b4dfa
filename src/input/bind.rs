//! Named key bindings

use std::cmp::Ordering;
use std::fmt;

use itertools::Itertools;

use super::combination::KCombination;
use super::events::{EventSet, ListenerId, TriggerKind};
use super::key_code::KeyCode;
use super::state::InputFrame;

/// Priority given to bindings that do not set one (lower runs first)
pub const DEFAULT_PRIORITY: i32 = 1000;

/// A named binding from key combinations to press, hold, and release events
///
/// Combinations are stored least specific first: sorted with the usual
/// combination order and then reversed. The first combination satisfied in
/// that order is the one reported as triggering.
pub struct KBind {
    name: String,
    priority: i32,
    always_triggerable: bool,
    combinations: Vec<KCombination>,
    events: EventSet,
    requirement: Option<Box<dyn Fn() -> bool>>,
}

impl KBind {
    /// A binding over any of the given combinations
    pub fn new(name: impl Into<String>, combinations: impl IntoIterator<Item = KCombination>) -> Self {
        let mut bind = Self {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            always_triggerable: false,
            combinations: Vec::new(),
            events: EventSet::new(),
            requirement: None,
        };
        bind.combinations = combinations.into_iter().unique().collect();
        bind.sort_combinations();
        bind
    }

    /// A binding for a single key with no modifiers
    pub fn key(name: impl Into<String>, key: KeyCode) -> Self {
        Self::new(name, [KCombination::new(key)])
    }

    /// A binding for a single combination
    pub fn combination(name: impl Into<String>, combination: KCombination) -> Self {
        Self::new(name, [combination])
    }

    /// Builder method to rename the binding
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder method to set the priority (lower runs first)
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to exempt this binding from key consumption
    pub fn always_triggerable(mut self, always: bool) -> Self {
        self.always_triggerable = always;
        self
    }

    /// Builder method to gate triggering on an extra condition
    ///
    /// The condition is only evaluated when a combination is satisfied.
    pub fn with_requirement(mut self, requirement: impl Fn() -> bool + 'static) -> Self {
        self.requirement = Some(Box::new(requirement));
        self
    }

    /// Builder method to add a press action
    pub fn on_press(mut self, label: impl Into<String>, action: impl FnMut() -> bool + 'static) -> Self {
        self.events.add_action(TriggerKind::Press, label, action);
        self
    }

    /// Builder method to add a hold action
    pub fn on_hold(mut self, label: impl Into<String>, action: impl FnMut() -> bool + 'static) -> Self {
        self.events.add_action(TriggerKind::Hold, label, action);
        self
    }

    /// Builder method to add a release action
    pub fn on_release(
        mut self,
        label: impl Into<String>,
        action: impl FnMut() -> bool + 'static,
    ) -> Self {
        self.events.add_action(TriggerKind::Release, label, action);
        self
    }

    /// Adds a passive listener and returns its handle
    pub fn listen(
        &mut self,
        kind: TriggerKind,
        label: impl Into<String>,
        listener: impl FnMut() + 'static,
    ) -> ListenerId {
        self.events.listen(kind, label, listener)
    }

    /// Removes a listener or action by handle
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove(id)
    }

    /// Name used for lookup, removal, and display
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Sets the name if none was given
    pub fn set_name_if_empty(&mut self, name: impl Into<String>) {
        if self.name.is_empty() {
            self.name = name.into();
        }
    }

    /// Priority (lower runs first)
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns true if this binding ignores and never causes key consumption
    pub fn is_always_triggerable(&self) -> bool {
        self.always_triggerable
    }

    /// Combinations, least specific first
    pub fn combinations(&self) -> &[KCombination] {
        &self.combinations
    }

    /// Returns false when there are no combinations or only "no key"
    pub fn has_keys(&self) -> bool {
        match self.combinations.as_slice() {
            [] => false,
            [only] => !only.is_none(),
            _ => true,
        }
    }

    /// Listeners and actions
    pub fn events(&self) -> &EventSet {
        &self.events
    }

    /// Mutable access to listeners and actions
    pub fn events_mut(&mut self) -> &mut EventSet {
        &mut self.events
    }

    fn sort_combinations(&mut self) {
        self.combinations.sort();
        self.combinations.reverse();
    }

    /// Merges more combinations into this binding
    ///
    /// Duplicates are dropped. A binding that only had "no key" takes the new
    /// combinations outright.
    pub fn add_combinations(&mut self, combinations: impl IntoIterator<Item = KCombination>) {
        let replace = self.combinations.first().is_none_or(KCombination::is_none);
        let existing = if replace {
            Vec::new()
        } else {
            std::mem::take(&mut self.combinations)
        };
        self.combinations = existing.into_iter().chain(combinations).unique().collect();
        self.sort_combinations();
    }

    /// Merges a single plain key into this binding
    pub fn add_key(&mut self, key: KeyCode) {
        self.add_combinations([KCombination::new(key)]);
    }

    /// Returns true if the extra condition (if any) passes
    pub fn is_allowed(&self) -> bool {
        self.requirement.as_ref().is_none_or(|requirement| requirement())
    }

    /// The first combination satisfying `kind` this frame
    ///
    /// The extra condition is checked once, and only when some combination
    /// is satisfied.
    pub fn triggered(&self, kind: TriggerKind, frame: &mut InputFrame<'_>) -> Option<&KCombination> {
        let combination = self
            .combinations
            .iter()
            .find(|combination| match kind {
                TriggerKind::Press => combination.is_satisfied_down(frame),
                TriggerKind::Hold => combination.is_satisfied_held(frame),
                TriggerKind::Release => combination.is_satisfied_up(frame),
            })?;
        self.is_allowed().then_some(combination)
    }

    /// The combination pressed this frame, if any
    pub fn get_down(&self, frame: &mut InputFrame<'_>) -> Option<&KCombination> {
        self.triggered(TriggerKind::Press, frame)
    }

    /// The combination held this frame, if any
    pub fn get_held(&self, frame: &mut InputFrame<'_>) -> Option<&KCombination> {
        self.triggered(TriggerKind::Hold, frame)
    }

    /// The combination released this frame, if any
    pub fn get_up(&self, frame: &mut InputFrame<'_>) -> Option<&KCombination> {
        self.triggered(TriggerKind::Release, frame)
    }

    pub fn is_down(&self, frame: &mut InputFrame<'_>) -> bool {
        self.get_down(frame).is_some()
    }

    pub fn is_held(&self, frame: &mut InputFrame<'_>) -> bool {
        self.get_held(frame).is_some()
    }

    pub fn is_up(&self, frame: &mut InputFrame<'_>) -> bool {
        self.get_up(frame).is_some()
    }

    /// Invokes the listeners of one kind; true if an action reported success
    pub fn fire(&mut self, kind: TriggerKind) -> bool {
        self.events.fire(kind)
    }

    pub fn do_press(&mut self) -> bool {
        self.fire(TriggerKind::Press)
    }

    pub fn do_hold(&mut self) -> bool {
        self.fire(TriggerKind::Hold)
    }

    pub fn do_release(&mut self) -> bool {
        self.fire(TriggerKind::Release)
    }

    /// Fires the first kind that has listeners (press, else hold, else release)
    ///
    /// Used by on-screen buttons that stand in for a key.
    pub fn activate(&mut self) -> bool {
        TriggerKind::ALL
            .into_iter()
            .find(|kind| self.events.count(*kind) > 0)
            .is_some_and(|kind| self.fire(kind))
    }

    /// Combinations joined by `separator`
    pub fn short_describe(&self, separator: &str) -> String {
        self.combinations.iter().join(separator)
    }

    /// Order used for group listings: combinations pairwise, each tie broken
    /// by priority, then fewer combinations first
    pub fn listing_order(&self, other: &Self) -> Ordering {
        self.combinations
            .iter()
            .zip(&other.combinations)
            .map(|(a, b)| a.cmp(b).then(self.priority.cmp(&other.priority)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| self.combinations.len().cmp(&other.combinations.len()))
    }
}

impl fmt::Display for KBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.short_describe(" || "), self.name)
    }
}

impl fmt::Debug for KBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KBind")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("always_triggerable", &self.always_triggerable)
            .field("combinations", &self.short_describe(" | "))
            .field("events", &self.events)
            .field("has_requirement", &self.requirement.is_some())
            .finish()
    }
}
