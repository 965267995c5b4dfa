//! Analog axis bindings

use std::fmt;

use itertools::Itertools;

use super::combination::{Modifier, modifiers_held, write_modifier_prefix};
use super::events::{AxisEvents, ListenerId};
use super::key_code::KeyCode;
use super::state::InputFrame;

/// One named axis source, optionally gated by held modifier keys
#[derive(Debug, Clone)]
pub struct Axis {
    name: String,
    multiplier: f32,
    use_raw_value: bool,
    retain_value_without_modifiers: bool,
    modifiers: Vec<Modifier>,
    /// Value delivered last; `None` until the first sample is marked known
    known_value: Option<f32>,
    cached_value: f32,
}

impl Axis {
    /// An ungated axis read raw with a multiplier of 1
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            multiplier: 1.0,
            use_raw_value: true,
            retain_value_without_modifiers: false,
            modifiers: Vec::new(),
            known_value: None,
            cached_value: 0.0,
        }
    }

    /// Builder method to scale delivered values
    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Builder method to choose raw (true) or smoothed (false) sampling
    pub fn with_raw_value(mut self, use_raw_value: bool) -> Self {
        self.use_raw_value = use_raw_value;
        self
    }

    /// Builder method to require modifier keys to be held
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = KeyCode>) -> Self {
        self.modifiers = modifiers.into_iter().map(Modifier).sorted().dedup().collect();
        self
    }

    /// Builder method to keep the last value, rather than zero, while the
    /// modifiers are not held
    pub fn retain_value_without_modifiers(mut self, retain: bool) -> Self {
        self.retain_value_without_modifiers = retain;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Value sampled by the last [`Axis::is_value_changed`]
    pub fn cached_value(&self) -> f32 {
        self.cached_value
    }

    /// Value last marked known
    pub fn known_value(&self) -> Option<f32> {
        self.known_value
    }

    /// Cached value scaled by the multiplier
    pub fn value(&self) -> f32 {
        self.cached_value * self.multiplier
    }

    /// Samples the axis and reports whether it differs from the known value
    ///
    /// Without the modifiers held the sample is 0 (or the previous cached
    /// value when configured to retain it). Values compare exactly.
    pub fn is_value_changed(&mut self, frame: &mut InputFrame<'_>) -> bool {
        if modifiers_held(frame, &self.modifiers) {
            self.cached_value = if self.use_raw_value {
                frame.axis_raw(&self.name)
            } else {
                frame.axis(&self.name)
            };
        } else if !self.retain_value_without_modifiers {
            self.cached_value = 0.0;
        }
        self.known_value != Some(self.cached_value)
    }

    /// Records the cached value as delivered
    pub fn mark_value_as_known(&mut self) {
        self.known_value = Some(self.cached_value);
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_modifier_prefix(f, &self.modifiers)?;
        f.write_str(&self.name)
    }
}

/// A named binding that fires when any of its axes changes value
///
/// Axes are alternative sources for one logical axis: an update delivers
/// the first changed axis only.
pub struct AxBind {
    name: String,
    axes: Vec<Axis>,
    disabled: bool,
    events: AxisEvents,
    requirement: Option<Box<dyn Fn() -> bool>>,
}

impl AxBind {
    /// A binding over the given axes (duplicates by name are dropped)
    pub fn new(name: impl Into<String>, axes: impl IntoIterator<Item = Axis>) -> Self {
        Self {
            name: name.into(),
            axes: axes
                .into_iter()
                .unique_by(|axis| axis.name.clone())
                .collect(),
            disabled: false,
            events: AxisEvents::new(),
            requirement: None,
        }
    }

    /// A binding over a single raw axis
    pub fn axis(name: impl Into<String>, axis_name: impl Into<String>) -> Self {
        Self::new(name, [Axis::new(axis_name)])
    }

    /// Builder method to add a change action
    pub fn on_change(
        mut self,
        label: impl Into<String>,
        action: impl FnMut(f32) -> bool + 'static,
    ) -> Self {
        self.events.add_action(label, action);
        self
    }

    /// Builder method to gate updates on an extra condition
    pub fn with_requirement(mut self, requirement: impl Fn() -> bool + 'static) -> Self {
        self.requirement = Some(Box::new(requirement));
        self
    }

    /// Adds a passive change listener and returns its handle
    pub fn listen(&mut self, label: impl Into<String>, listener: impl FnMut(f32) + 'static) -> ListenerId {
        self.events.listen(label, listener)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn events(&self) -> &AxisEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut AxisEvents {
        &mut self.events
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enables or disables this binding without removing it
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Returns true if enabled and the extra condition (if any) passes
    pub fn is_allowed(&self) -> bool {
        !self.disabled && self.requirement.as_ref().is_none_or(|requirement| requirement())
    }

    /// Merges more axes, dropping any whose name is already present
    pub fn add_axes(&mut self, axes: impl IntoIterator<Item = Axis>) {
        let existing = std::mem::take(&mut self.axes);
        self.axes = existing
            .into_iter()
            .chain(axes)
            .unique_by(|axis| axis.name.clone())
            .collect();
    }

    /// The first axis whose value changed, marked known
    ///
    /// The extra condition is checked only when some axis changed.
    pub fn active_axis(&mut self, frame: &mut InputFrame<'_>) -> Option<&Axis> {
        let index = self
            .axes
            .iter_mut()
            .position(|axis| axis.is_value_changed(frame))?;
        if !self.is_allowed() {
            return None;
        }
        self.axes[index].mark_value_as_known();
        Some(&self.axes[index])
    }

    pub fn is_active(&mut self, frame: &mut InputFrame<'_>) -> bool {
        self.active_axis(frame).is_some()
    }

    /// Delivers the first changed axis, scaled by its multiplier
    ///
    /// Returns the delivered value, or `None` if nothing changed or the
    /// binding is not allowed.
    pub fn update(&mut self, frame: &mut InputFrame<'_>) -> Option<f32> {
        if !self.is_allowed() {
            return None;
        }
        for axis in &mut self.axes {
            if axis.is_value_changed(frame) {
                axis.mark_value_as_known();
                let value = axis.value();
                self.events.fire(value);
                return Some(value);
            }
        }
        None
    }

    /// Invokes the change listeners directly
    pub fn fire(&mut self, value: f32) -> bool {
        self.events.fire(value)
    }

    /// Fires the change listeners with 0.0, for on-screen controls
    pub fn activate(&mut self) -> bool {
        self.events.count() > 0 && self.fire(0.0)
    }

    /// Axes joined by `separator`
    pub fn short_describe(&self, separator: &str) -> String {
        self.axes.iter().join(separator)
    }
}

impl fmt::Display for AxBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.short_describe(" || "), self.name)
    }
}

impl fmt::Debug for AxBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxBind")
            .field("name", &self.name)
            .field("axes", &self.axes)
            .field("disabled", &self.disabled)
            .field("events", &self.events)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::backend::{HORIZONTAL, MOUSE_X, ManualBackend};
    use crate::input::state::KeyStates;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(bind: &mut AxBind) -> Rc<RefCell<Vec<f32>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        bind.listen("record", move |v| s.borrow_mut().push(v));
        seen
    }

    fn step(bind: &mut AxBind, keys: &mut KeyStates, backend: &ManualBackend) -> Option<f32> {
        let mut frame = InputFrame::new(keys, backend);
        let delivered = bind.update(&mut frame);
        keys.advance_frame();
        delivered
    }

    #[test]
    fn test_first_sample_is_a_change() {
        let mut bind = AxBind::axis("move", HORIZONTAL);
        let seen = recorder(&mut bind);
        let backend = ManualBackend::new();
        let mut keys = KeyStates::new();

        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.0));
        assert_eq!(step(&mut bind, &mut keys, &backend), None);
        assert_eq!(*seen.borrow(), vec![0.0]);
    }

    #[test]
    fn test_smoothed_value_fires_only_on_change() {
        let mut bind = AxBind::new("move", [Axis::new(HORIZONTAL).with_raw_value(false)]);
        let seen = recorder(&mut bind);
        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();

        backend.set_axis_values(HORIZONTAL, 0.25, 1.0);
        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.25));
        assert_eq!(step(&mut bind, &mut keys, &backend), None);

        // raw value changes but the smoothed one does not
        backend.set_axis_values(HORIZONTAL, 0.25, 0.0);
        assert_eq!(step(&mut bind, &mut keys, &backend), None);

        backend.set_axis_values(HORIZONTAL, 0.5, 1.0);
        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.5));
        assert_eq!(*seen.borrow(), vec![0.25, 0.5]);
    }

    #[test]
    fn test_multiplier_scales_delivered_value() {
        let mut bind = AxBind::new("look", [Axis::new(MOUSE_X).with_multiplier(-2.0)]);
        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.set_axis(MOUSE_X, 0.5);
        assert_eq!(step(&mut bind, &mut keys, &backend), Some(-1.0));
        assert_eq!(bind.axes()[0].known_value(), Some(0.5));
    }

    #[test]
    fn test_modifier_gate_zeroes_value() {
        let mut bind = AxBind::new(
            "orbit",
            [Axis::new(MOUSE_X).with_modifiers([KeyCode::Mouse1])],
        );
        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.set_axis(MOUSE_X, 0.75);

        // button not held: value reads as zero
        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.0));

        // pressed this frame is not yet held
        backend.press(KeyCode::Mouse1);
        assert_eq!(step(&mut bind, &mut keys, &backend), None);

        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.75));

        backend.release(KeyCode::Mouse1);
        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.0));
    }

    #[test]
    fn test_modifier_gate_can_retain_value() {
        let mut bind = AxBind::new(
            "orbit",
            [Axis::new(MOUSE_X)
                .with_modifiers([KeyCode::AnyShift])
                .retain_value_without_modifiers(true)],
        );
        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.press(KeyCode::LeftShift);
        backend.set_axis(MOUSE_X, 0.5);
        step(&mut bind, &mut keys, &backend);
        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.5));

        backend.release(KeyCode::LeftShift);
        backend.set_axis(MOUSE_X, 0.9);
        assert_eq!(step(&mut bind, &mut keys, &backend), None);
        assert_eq!(bind.axes()[0].cached_value(), 0.5);
    }

    #[test]
    fn test_alternative_axes_stop_at_first_change() {
        let mut bind = AxBind::new("turn", [Axis::new(HORIZONTAL), Axis::new(MOUSE_X)]);
        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();

        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.0));
        assert_eq!(bind.axes()[1].known_value(), None);

        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.0));
        assert_eq!(bind.axes()[1].known_value(), Some(0.0));

        backend.set_axis(MOUSE_X, 0.3);
        assert_eq!(step(&mut bind, &mut keys, &backend), Some(0.3));
    }

    #[test]
    fn test_disabled_and_requirement() {
        let mut bind = AxBind::axis("move", HORIZONTAL).with_requirement(|| false);
        let backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        assert_eq!(step(&mut bind, &mut keys, &backend), None);
        {
            let mut frame = InputFrame::new(&mut keys, &backend);
            assert!(!bind.is_active(&mut frame));
        }

        let mut bind = AxBind::axis("move", HORIZONTAL);
        bind.set_disabled(true);
        assert_eq!(step(&mut bind, &mut keys, &backend), None);
        bind.set_disabled(false);
        let mut frame = InputFrame::new(&mut keys, &backend);
        assert_eq!(bind.active_axis(&mut frame).map(Axis::name), Some(HORIZONTAL));
    }

    #[test]
    fn test_add_axes_dedupes_by_name_and_display() {
        let mut bind = AxBind::axis("look", MOUSE_X);
        bind.add_axes([
            Axis::new(MOUSE_X).with_multiplier(3.0),
            Axis::new("Mouse Y").with_modifiers([KeyCode::AnyShift]),
        ]);
        assert_eq!(bind.axes().len(), 2);
        assert_eq!(bind.axes()[0].multiplier(), 1.0);
        assert_eq!(bind.to_string(), "Mouse X || Shift+Mouse Y \"look\"");
    }

    #[test]
    fn test_activate_sends_zero() {
        let mut bind = AxBind::axis("look", MOUSE_X).on_change("turn", |v| v == 0.0);
        assert!(bind.activate());
        assert!(!AxBind::axis("idle", MOUSE_X).activate());
    }
}
