//! Listener storage for bindings
//!
//! Each trigger kind has two channels: passive listeners, which are always
//! all invoked, and actions, whose success decides whether the binding
//! consumes its key for the rest of a resolve pass.

use std::fmt;

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

/// Which edge of a key binding a listener reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    Press,
    Hold,
    Release,
}

impl TriggerKind {
    /// All kinds in dispatch order
    pub const ALL: [TriggerKind; 3] = [Self::Press, Self::Hold, Self::Release];

    /// Lowercase name used in dumps and logs
    pub fn name(self) -> &'static str {
        match self {
            Self::Press => "press",
            Self::Hold => "hold",
            Self::Release => "release",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Self::Press => "Press:",
            Self::Hold => "Hold:",
            Self::Release => "Release:",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Stable handle for a registered listener or action
///
/// Handles are unique within the event set that issued them and are never
/// reused, even after a `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Issues the handles of one event set
#[derive(Debug, Default)]
struct IdCounter(u64);

impl IdCounter {
    fn next(&mut self) -> ListenerId {
        self.0 += 1;
        ListenerId(self.0)
    }
}

/// A callback with its handle and display label
struct Entry<F: ?Sized> {
    id: ListenerId,
    label: String,
    callback: Box<F>,
}

/// Ordered callbacks of one signature
struct Channel<F: ?Sized> {
    entries: Vec<Entry<F>>,
}

impl<F: ?Sized> Default for Channel<F> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> Channel<F> {
    fn push(&mut self, id: ListenerId, label: impl Into<String>, callback: Box<F>) -> ListenerId {
        self.entries.push(Entry {
            id,
            label: label.into(),
            callback,
        });
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }
}

type Notify = dyn FnMut();
type Action = dyn FnMut() -> bool;

/// Press, hold, and release listeners of a key binding
#[derive(Default)]
pub struct EventSet {
    listeners: EnumMap<TriggerKind, Channel<Notify>>,
    actions: EnumMap<TriggerKind, Channel<Action>>,
    ids: IdCounter,
}

impl EventSet {
    /// Creates an empty event set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a passive listener
    pub fn listen(
        &mut self,
        kind: TriggerKind,
        label: impl Into<String>,
        listener: impl FnMut() + 'static,
    ) -> ListenerId {
        let id = self.ids.next();
        self.listeners[kind].push(id, label, Box::new(listener))
    }

    /// Adds an action; it returns true when it handled the input
    pub fn add_action(
        &mut self,
        kind: TriggerKind,
        label: impl Into<String>,
        action: impl FnMut() -> bool + 'static,
    ) -> ListenerId {
        let id = self.ids.next();
        self.actions[kind].push(id, label, Box::new(action))
    }

    /// Removes a listener or action from whichever channel holds it
    pub fn remove(&mut self, id: ListenerId) -> bool {
        TriggerKind::ALL
            .into_iter()
            .any(|kind| self.listeners[kind].remove(id) || self.actions[kind].remove(id))
    }

    /// Removes every listener and action of one kind
    pub fn clear(&mut self, kind: TriggerKind) {
        self.listeners[kind] = Channel::default();
        self.actions[kind] = Channel::default();
    }

    /// Number of listeners plus actions of one kind
    pub fn count(&self, kind: TriggerKind) -> usize {
        self.listeners[kind].len() + self.actions[kind].len()
    }

    /// Invokes every listener, then every action, of one kind
    ///
    /// Returns true if any action reported success. With no actions the
    /// result is false.
    pub fn fire(&mut self, kind: TriggerKind) -> bool {
        for entry in &mut self.listeners[kind].entries {
            (entry.callback)();
        }
        let mut handled = false;
        for entry in &mut self.actions[kind].entries {
            handled |= (entry.callback)();
        }
        handled
    }

    /// Labels of listeners and actions of one kind, in registration order
    pub fn labels(&self, kind: TriggerKind) -> Vec<&str> {
        self.listeners[kind]
            .labels()
            .chain(self.actions[kind].labels())
            .collect()
    }

    /// Human-readable listing of every channel that has callbacks
    pub fn describe(&self) -> String {
        TriggerKind::ALL
            .into_iter()
            .filter(|kind| self.count(*kind) > 0)
            .map(|kind| format!("{}\n{}", kind.heading(), self.labels(kind).join("\n")))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl fmt::Debug for EventSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSet")
            .field("press", &self.count(TriggerKind::Press))
            .field("hold", &self.count(TriggerKind::Hold))
            .field("release", &self.count(TriggerKind::Release))
            .finish()
    }
}

type AxisNotify = dyn FnMut(f32);
type AxisAction = dyn FnMut(f32) -> bool;

/// Change listeners of an axis binding
#[derive(Default)]
pub struct AxisEvents {
    listeners: Channel<AxisNotify>,
    actions: Channel<AxisAction>,
    ids: IdCounter,
}

impl AxisEvents {
    /// Creates an empty listener set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a passive change listener
    pub fn listen(
        &mut self,
        label: impl Into<String>,
        listener: impl FnMut(f32) + 'static,
    ) -> ListenerId {
        let id = self.ids.next();
        self.listeners.push(id, label, Box::new(listener))
    }

    /// Adds a change action; it returns true when it handled the value
    pub fn add_action(
        &mut self,
        label: impl Into<String>,
        action: impl FnMut(f32) -> bool + 'static,
    ) -> ListenerId {
        let id = self.ids.next();
        self.actions.push(id, label, Box::new(action))
    }

    /// Removes a listener or action
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id) || self.actions.remove(id)
    }

    /// Removes everything
    pub fn clear(&mut self) {
        self.listeners = Channel::default();
        self.actions = Channel::default();
    }

    /// Number of listeners plus actions
    pub fn count(&self) -> usize {
        self.listeners.len() + self.actions.len()
    }

    /// Invokes every listener, then every action, with the value
    pub fn fire(&mut self, value: f32) -> bool {
        for entry in &mut self.listeners.entries {
            (entry.callback)(value);
        }
        let mut handled = false;
        for entry in &mut self.actions.entries {
            handled |= (entry.callback)(value);
        }
        handled
    }

    /// Labels of all callbacks, one per line
    pub fn describe(&self) -> String {
        self.listeners
            .labels()
            .chain(self.actions.labels())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Debug for AxisEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisEvents")
            .field("count", &self.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_empty_channel_reports_failure() {
        let mut events = EventSet::new();
        assert!(!events.fire(TriggerKind::Press));
        assert_eq!(events.count(TriggerKind::Press), 0);
    }

    #[test]
    fn test_listeners_run_before_actions() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut events = EventSet::new();

        let o = order.clone();
        events.add_action(TriggerKind::Press, "act", move || {
            o.borrow_mut().push("action");
            false
        });
        let o = order.clone();
        events.listen(TriggerKind::Press, "log", move || o.borrow_mut().push("listener"));

        assert!(!events.fire(TriggerKind::Press));
        assert_eq!(*order.borrow(), vec!["listener", "action"]);
    }

    #[test]
    fn test_any_action_success_handles() {
        let calls = Rc::new(Cell::new(0));
        let mut events = EventSet::new();
        for result in [true, false] {
            let c = calls.clone();
            events.add_action(TriggerKind::Hold, "step", move || {
                c.set(c.get() + 1);
                result
            });
        }
        assert!(events.fire(TriggerKind::Hold));
        assert_eq!(calls.get(), 2);
        assert!(!events.fire(TriggerKind::Release));
    }

    #[test]
    fn test_remove_by_id() {
        let mut events = EventSet::new();
        let keep = events.listen(TriggerKind::Release, "keep", || {});
        let drop = events.add_action(TriggerKind::Release, "drop", || true);
        assert_eq!(events.count(TriggerKind::Release), 2);

        assert!(events.remove(drop));
        assert!(!events.remove(drop));
        assert_eq!(events.labels(TriggerKind::Release), vec!["keep"]);
        assert!(!events.fire(TriggerKind::Release));

        assert!(events.remove(keep));
        assert_eq!(events.count(TriggerKind::Release), 0);
    }

    #[test]
    fn test_describe_lists_channels() {
        let mut events = EventSet::new();
        events.add_action(TriggerKind::Press, "jump", || true);
        events.listen(TriggerKind::Release, "land sound", || {});
        assert_eq!(events.describe(), "Press:\njump\n\nRelease:\nland sound");

        events.clear(TriggerKind::Press);
        assert_eq!(events.describe(), "Release:\nland sound");
    }

    #[test]
    fn test_axis_events_pass_value() {
        let seen = Rc::new(Cell::new(0.0));
        let mut events = AxisEvents::new();
        let s = seen.clone();
        events.listen("look", move |v| s.set(v));
        assert!(!events.fire(0.75));
        assert_eq!(seen.get(), 0.75);

        let id = events.add_action("turn", |v| v > 0.0);
        assert!(events.fire(0.5));
        assert!(!events.fire(-0.5));
        assert!(events.remove(id));
        assert_eq!(events.count(), 1);
        assert_eq!(events.describe(), "look");
    }

    #[test]
    fn test_ids_belong_to_their_set() {
        let mut first = EventSet::new();
        let mut second = EventSet::new();
        let a = first.listen(TriggerKind::Press, "a", || {});
        let b = second.listen(TriggerKind::Press, "b", || {});
        assert_eq!(a, b);

        first.clear(TriggerKind::Press);
        let c = first.add_action(TriggerKind::Press, "c", || true);
        assert_ne!(a, c);
        assert!(!first.remove(a));
        assert!(first.remove(c));
        assert!(second.remove(b));
    }
}
