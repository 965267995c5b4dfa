//! The input dispatcher: binding registry and per-frame driver

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use enum_map::EnumMap;
use tracing::{debug, trace, warn};

use super::axis::AxBind;
use super::backend::InputBackend;
use super::bind::KBind;
use super::events::TriggerKind;
use super::group::{BindingChange, BindingGroup, BindingId, Registry, ResolveLogging, ScanFilter};
use super::state::{InputFrame, KeyStates};

/// Returns true if typing into a text field could trigger this binding
///
/// That is any combination that is a bare key, or a key plus a single shift
/// modifier, unless the key is a function key.
pub fn is_ambiguous_with_text_input(bind: &KBind) -> bool {
    bind.combinations().iter().any(|combination| {
        let typed = match combination.modifiers() {
            [] => true,
            [only] => only.key().is_shift(),
            _ => false,
        };
        typed && !combination.is_none() && !combination.key().is_function_key()
    })
}

/// A registry change requested while the dispatcher was busy
enum Command {
    Add(KBind),
    Remove(String),
    Update(String, Box<dyn FnOnce(&mut KBind)>),
    AddAxis(AxBind),
    RemoveAxis(String),
}

/// Handle for queueing registry changes from inside callbacks
///
/// Callbacks cannot borrow the dispatcher that invokes them. They hold a
/// clone of this queue instead; the dispatcher applies everything queued at
/// the end of [`InputDispatcher::update`], so a change requested during a
/// frame takes effect from the next frame's scan.
#[derive(Clone, Default)]
pub struct CommandQueue {
    pending: Rc<RefCell<VecDeque<Command>>>,
}

impl CommandQueue {
    fn push(&self, command: Command) {
        self.pending.borrow_mut().push_back(command);
    }

    pub fn add_binding(&self, bind: KBind) {
        self.push(Command::Add(bind));
    }

    pub fn remove_binding(&self, name: impl Into<String>) {
        self.push(Command::Remove(name.into()));
    }

    /// Queues a change to a binding, applied as a remove and re-add
    pub fn update_binding(&self, name: impl Into<String>, change: impl FnOnce(&mut KBind) + 'static) {
        self.push(Command::Update(name.into(), Box::new(change)));
    }

    pub fn add_axis_binding(&self, bind: AxBind) {
        self.push(Command::AddAxis(bind));
    }

    pub fn remove_axis_binding(&self, name: impl Into<String>) {
        self.push(Command::RemoveAxis(name.into()));
    }

    /// Number of changes waiting
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    fn take(&self) -> VecDeque<Command> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

impl fmt::Debug for CommandQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandQueue")
            .field("pending", &self.len())
            .finish()
    }
}

/// A key binding invoked during a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub kind: TriggerKind,
    pub binding: String,
    /// True if an action reported success
    pub handled: bool,
}

/// An axis binding that delivered a new value during a frame
#[derive(Debug, Clone, PartialEq)]
pub struct AxisChange {
    pub binding: String,
    pub value: f32,
}

/// Everything that fired during one [`InputDispatcher::update`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub activations: Vec<Activation>,
    pub axis_changes: Vec<AxisChange>,
}

impl FrameReport {
    pub fn is_empty(&self) -> bool {
        self.activations.is_empty() && self.axis_changes.is_empty()
    }

    /// Names of bindings invoked for one trigger kind, in invocation order
    pub fn fired(&self, kind: TriggerKind) -> Vec<&str> {
        self.activations
            .iter()
            .filter(|activation| activation.kind == kind)
            .map(|activation| activation.binding.as_str())
            .collect()
    }
}

/// Owns every binding and drives them once per frame
///
/// ```text
/// backend ──► KeyStates ──► press/hold/release groups ──► callbacks
///                │                (scan, then resolve)
///                └──────────► axis bindings ──► change callbacks
/// ```
pub struct InputDispatcher {
    bindings: Registry,
    groups: EnumMap<TriggerKind, BindingGroup>,
    axis_bindings: Vec<AxBind>,
    keys: KeyStates,
    text_input_active: bool,
    logging: ResolveLogging,
    queue: CommandQueue,
    next_id: u64,
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDispatcher {
    /// Creates a dispatcher with no bindings
    pub fn new() -> Self {
        Self {
            bindings: Registry::new(),
            groups: EnumMap::from_fn(BindingGroup::new),
            axis_bindings: Vec::new(),
            keys: KeyStates::new(),
            text_input_active: false,
            logging: ResolveLogging::default(),
            queue: CommandQueue::default(),
            next_id: 1,
        }
    }

    /// Builder method to enable conflict and activation logging
    pub fn with_logging(mut self, logging: ResolveLogging) -> Self {
        self.logging = logging;
        self
    }

    pub fn set_logging(&mut self, logging: ResolveLogging) {
        self.logging = logging;
    }

    pub fn logging(&self) -> ResolveLogging {
        self.logging
    }

    /// A handle callbacks can use to change the registry
    pub fn commands(&self) -> CommandQueue {
        self.queue.clone()
    }

    /// Registers a binding
    ///
    /// Returns `None` if another binding already uses the same non-empty
    /// name. Bindings without a name never collide.
    pub fn add_binding(&mut self, bind: KBind) -> Option<BindingId> {
        if self.has_binding(bind.name()) {
            warn!(binding = %bind.name(), "binding name already registered");
            return None;
        }
        let id = BindingId(self.next_id);
        self.next_id += 1;
        debug!(binding = %bind.name(), keys = %bind.short_describe(" | "), "binding added");
        self.bindings.insert(id, bind);
        self.apply_change(id, BindingChange::Add);
        Some(id)
    }

    /// Unregisters the first binding with this name
    pub fn remove_binding(&mut self, name: &str) -> bool {
        self.binding_id(name)
            .and_then(|id| self.remove_binding_by_id(id))
            .is_some()
    }

    /// Unregisters a binding and hands it back
    pub fn remove_binding_by_id(&mut self, id: BindingId) -> Option<KBind> {
        if !self.bindings.contains_key(&id) {
            return None;
        }
        self.apply_change(id, BindingChange::Remove);
        let bind = self.bindings.shift_remove(&id)?;
        debug!(binding = %bind.name(), "binding removed");
        Some(bind)
    }

    /// Changes a binding in place and refreshes its group membership
    ///
    /// Group membership is recomputed by removing the binding from every
    /// group and adding it back. A rename onto a name another binding
    /// already uses is undone: the binding keeps its old name, its other
    /// edits stay, and the call returns false.
    pub fn update_binding(&mut self, name: &str, change: impl FnOnce(&mut KBind)) -> bool {
        let Some(id) = self.binding_id(name) else {
            return false;
        };
        let Some(bind) = self.bindings.get_mut(&id) else {
            return false;
        };
        let previous = bind.name().to_string();
        change(bind);
        let renamed = bind.name().to_string();

        let accepted = renamed == previous || !self.is_name_taken(&renamed, id);
        if !accepted {
            warn!(binding = %previous, rename = %renamed, "binding name already registered");
            if let Some(bind) = self.bindings.get_mut(&id) {
                bind.set_name(previous);
            }
        }
        if let Some(bind) = self.bindings.get(&id) {
            debug!(binding = %bind.name(), keys = %bind.short_describe(" | "), "binding updated");
        }
        self.apply_change(id, BindingChange::Update);
        accepted
    }

    /// Returns true if a binding other than `except` uses this non-empty name
    fn is_name_taken(&self, name: &str, except: BindingId) -> bool {
        !name.is_empty()
            && self
                .bindings
                .iter()
                .any(|(id, bind)| *id != except && bind.name() == name)
    }

    fn apply_change(&mut self, id: BindingId, change: BindingChange) -> bool {
        let mut changed = false;
        let change = if change == BindingChange::Update {
            changed |= self.apply_change(id, BindingChange::Remove);
            BindingChange::Add
        } else {
            change
        };
        for group in self.groups.values_mut() {
            changed |= group.apply(id, change, &self.bindings);
        }
        if changed {
            trace!(bindings = %self.binding_table(), "binding table changed");
        }
        changed
    }

    /// Returns true if a binding with this non-empty name is registered
    pub fn has_binding(&self, name: &str) -> bool {
        self.binding_id(name).is_some()
    }

    /// Handle of the first binding with this non-empty name
    pub fn binding_id(&self, name: &str) -> Option<BindingId> {
        if name.is_empty() {
            return None;
        }
        self.bindings
            .iter()
            .find(|(_, bind)| bind.name() == name)
            .map(|(id, _)| *id)
    }

    pub fn binding(&self, name: &str) -> Option<&KBind> {
        self.binding_id(name).and_then(|id| self.bindings.get(&id))
    }

    pub fn binding_by_id(&self, id: BindingId) -> Option<&KBind> {
        self.bindings.get(&id)
    }

    /// Every binding in registration order
    pub fn bindings(&self) -> impl Iterator<Item = (BindingId, &KBind)> {
        self.bindings.iter().map(|(id, bind)| (*id, bind))
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn group(&self, kind: TriggerKind) -> &BindingGroup {
        &self.groups[kind]
    }

    /// Registers an axis binding; false if the name is already taken
    pub fn add_axis_binding(&mut self, bind: AxBind) -> bool {
        if self.axis_binding(bind.name()).is_some() {
            warn!(binding = %bind.name(), "axis binding name already registered");
            return false;
        }
        debug!(binding = %bind.name(), axes = %bind.short_describe(" | "), "axis binding added");
        self.axis_bindings.push(bind);
        true
    }

    pub fn remove_axis_binding(&mut self, name: &str) -> bool {
        let Some(index) = self.axis_bindings.iter().position(|bind| bind.name() == name) else {
            return false;
        };
        self.axis_bindings.remove(index);
        debug!(binding = %name, "axis binding removed");
        true
    }

    pub fn axis_binding(&self, name: &str) -> Option<&AxBind> {
        self.axis_bindings.iter().find(|bind| bind.name() == name)
    }

    pub fn axis_binding_mut(&mut self, name: &str) -> Option<&mut AxBind> {
        self.axis_bindings.iter_mut().find(|bind| bind.name() == name)
    }

    pub fn axis_bindings(&self) -> &[AxBind] {
        &self.axis_bindings
    }

    /// Marks whether a text field has keyboard focus
    ///
    /// While active, bindings that typing could trigger are skipped.
    pub fn set_text_input_active(&mut self, active: bool) {
        if self.text_input_active != active {
            debug!(active, "text input focus changed");
        }
        self.text_input_active = active;
    }

    pub fn is_text_input_active(&self) -> bool {
        self.text_input_active
    }

    /// Key states as of the end of the last update
    pub fn key_states(&self) -> &KeyStates {
        &self.keys
    }

    /// Runs one frame against the backend
    ///
    /// Order: every group scans, every group resolves, key states advance,
    /// axis bindings update, then queued registry changes apply.
    pub fn update(&mut self, backend: &dyn InputBackend) -> FrameReport {
        let filter = self
            .text_input_active
            .then_some(is_ambiguous_with_text_input as ScanFilter);

        let mut frame = InputFrame::new(&mut self.keys, backend);
        for group in self.groups.values_mut() {
            group.scan(&self.bindings, &mut frame, filter);
        }

        let mut report = FrameReport::default();
        for (kind, group) in self.groups.iter_mut() {
            for invocation in group.resolve(&mut self.bindings, self.logging) {
                if let Some(bind) = self.bindings.get(&invocation.id) {
                    report.activations.push(Activation {
                        kind,
                        binding: bind.name().to_string(),
                        handled: invocation.handled,
                    });
                }
            }
        }

        self.keys.advance_frame();

        let mut frame = InputFrame::new(&mut self.keys, backend);
        for bind in &mut self.axis_bindings {
            if let Some(value) = bind.update(&mut frame) {
                report.axis_changes.push(AxisChange {
                    binding: bind.name().to_string(),
                    value,
                });
            }
        }

        self.apply_queued();
        report
    }

    /// Number of queued registry changes
    pub fn pending_changes(&self) -> usize {
        self.queue.len()
    }

    fn apply_queued(&mut self) {
        for command in self.queue.take() {
            match command {
                Command::Add(bind) => {
                    self.add_binding(bind);
                }
                Command::Remove(name) => {
                    self.remove_binding(&name);
                }
                Command::Update(name, change) => {
                    self.update_binding(&name, change);
                }
                Command::AddAxis(bind) => {
                    self.add_axis_binding(bind);
                }
                Command::RemoveAxis(name) => {
                    self.remove_axis_binding(&name);
                }
            }
        }
    }

    /// Human-readable listing of every group's members
    pub fn describe_bindings(&self) -> String {
        self.binding_table().to_string()
    }

    fn binding_table(&self) -> BindingTable<'_> {
        BindingTable { dispatcher: self }
    }
}

impl fmt::Debug for InputDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputDispatcher")
            .field("bindings", &self.bindings.len())
            .field("axis_bindings", &self.axis_bindings.len())
            .field("text_input_active", &self.text_input_active)
            .field("logging", &self.logging)
            .field("queue", &self.queue)
            .finish()
    }
}

/// The binding listing, one section per trigger kind
///
/// Each line is `keys :priority: name`. The priority is only shown when a
/// neighbouring line starts with the same combination, or when the binding
/// has no keys.
struct BindingTable<'a> {
    dispatcher: &'a InputDispatcher,
}

impl fmt::Display for BindingTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dispatcher = self.dispatcher;
        for (kind, group) in &dispatcher.groups {
            writeln!(f, "[{kind}]")?;
            let members = group
                .members()
                .iter()
                .filter_map(|id| dispatcher.bindings.get(id))
                .collect::<Vec<_>>();
            for (index, bind) in members.iter().enumerate() {
                let first = bind
                    .has_keys()
                    .then(|| bind.combinations().first())
                    .flatten();
                let needs_priority = first.is_none_or(|keys| {
                    let prev = index.checked_sub(1).and_then(|i| members.get(i));
                    let next = members.get(index + 1);
                    [prev, next]
                        .into_iter()
                        .flatten()
                        .any(|neighbour| neighbour.combinations().first() == Some(keys))
                });
                match first {
                    Some(_) => f.write_str(&bind.short_describe(" | "))?,
                    None => f.write_str("(no keys)")?,
                }
                f.write_str(" :")?;
                if needs_priority {
                    write!(f, "{}", bind.priority())?;
                }
                writeln!(f, ": {}", bind.name())?;
            }
        }
        Ok(())
    }
}
