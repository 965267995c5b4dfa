//! Raw input sources
//!
//! The input core never talks to a device directly. Each frame it asks an
//! [`InputBackend`] whether a key is physically pressed and what value a
//! named axis currently has.

use std::collections::{HashMap, HashSet};

use super::key_code::KeyCode;

/// Axis reporting the scroll wheel delta
pub const MOUSE_SCROLL_WHEEL: &str = "Mouse ScrollWheel";
/// Axis reporting horizontal mouse movement
pub const MOUSE_X: &str = "Mouse X";
/// Axis reporting vertical mouse movement
pub const MOUSE_Y: &str = "Mouse Y";
/// Virtual left/right axis
pub const HORIZONTAL: &str = "Horizontal";
/// Virtual down/up axis
pub const VERTICAL: &str = "Vertical";

/// Source of raw key and axis state
///
/// Queries may happen at any point during a frame and must be answerable on
/// demand. Implementations only need to report physical codes; composite
/// codes are derived by [`InputBackend::sample`].
pub trait InputBackend {
    /// Whether a physical key or button is pressed right now
    fn is_pressed(&self, code: KeyCode) -> bool;

    /// Smoothed value of a named axis (0.0 when unknown)
    fn axis(&self, name: &str) -> f32;

    /// Unsmoothed value of a named axis (0.0 when unknown)
    fn axis_raw(&self, name: &str) -> f32;

    /// Pressed state of any code, composite codes included
    ///
    /// Composite codes are recomputed from their sources on every call.
    fn sample(&self, code: KeyCode) -> bool {
        match code {
            KeyCode::None => false,
            KeyCode::AnyShift | KeyCode::AnyControl | KeyCode::AnyAlt | KeyCode::AnyCommand => code
                .physical_sources()
                .iter()
                .any(|source| self.is_pressed(*source)),
            KeyCode::MouseWheelUp => self.axis(MOUSE_SCROLL_WHEEL) > 0.0,
            KeyCode::MouseWheelDown => self.axis(MOUSE_SCROLL_WHEEL) < 0.0,
            KeyCode::MouseXUp => self.axis(MOUSE_X) > 0.0,
            KeyCode::MouseXDown => self.axis(MOUSE_X) < 0.0,
            KeyCode::MouseYUp => self.axis(MOUSE_Y) > 0.0,
            KeyCode::MouseYDown => self.axis(MOUSE_Y) < 0.0,
            physical => self.is_pressed(physical),
        }
    }
}

/// Axis value pair held by [`ManualBackend`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisValue {
    smoothed: f32,
    raw: f32,
}

/// In-memory backend driven by explicit calls
///
/// Used by tests, the replay tool, and anything that already has its own
/// event source and only needs to mirror it.
#[derive(Debug, Clone, Default)]
pub struct ManualBackend {
    pressed: HashSet<KeyCode>,
    axes: HashMap<String, AxisValue>,
}

impl ManualBackend {
    /// Creates a backend with nothing pressed and no axes
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as pressed
    pub fn press(&mut self, code: KeyCode) {
        self.pressed.insert(code);
    }

    /// Marks a key as released
    pub fn release(&mut self, code: KeyCode) {
        self.pressed.remove(&code);
    }

    /// Sets a key's pressed state
    pub fn set_pressed(&mut self, code: KeyCode, pressed: bool) {
        if pressed {
            self.press(code);
        } else {
            self.release(code);
        }
    }

    /// Releases every key
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    /// Sets both the smoothed and raw value of an axis
    pub fn set_axis(&mut self, name: impl Into<String>, value: f32) {
        self.axes.insert(
            name.into(),
            AxisValue {
                smoothed: value,
                raw: value,
            },
        );
    }

    /// Sets the smoothed and raw value of an axis independently
    pub fn set_axis_values(&mut self, name: impl Into<String>, smoothed: f32, raw: f32) {
        self.axes.insert(name.into(), AxisValue { smoothed, raw });
    }

    /// Resets every axis to zero
    pub fn clear_axes(&mut self) {
        self.axes.clear();
    }

    /// Keys currently pressed
    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.pressed.iter().copied()
    }
}

impl InputBackend for ManualBackend {
    fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    fn axis(&self, name: &str) -> f32 {
        self.axes.get(name).map_or(0.0, |value| value.smoothed)
    }

    fn axis_raw(&self, name: &str) -> f32 {
        self.axes.get(name).map_or(0.0, |value| value.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_shift_is_or_of_physical_keys() {
        let mut backend = ManualBackend::new();
        assert!(!backend.sample(KeyCode::AnyShift));

        backend.press(KeyCode::RightShift);
        assert!(backend.sample(KeyCode::AnyShift));
        assert!(!backend.sample(KeyCode::AnyControl));

        backend.release(KeyCode::RightShift);
        backend.press(KeyCode::LeftShift);
        assert!(backend.sample(KeyCode::AnyShift));
    }

    #[test]
    fn test_wheel_direction_thresholds() {
        let mut backend = ManualBackend::new();
        backend.set_axis(MOUSE_SCROLL_WHEEL, 0.25);
        assert!(backend.sample(KeyCode::MouseWheelUp));
        assert!(!backend.sample(KeyCode::MouseWheelDown));

        backend.set_axis(MOUSE_SCROLL_WHEEL, -1.0);
        assert!(backend.sample(KeyCode::MouseWheelDown));

        backend.set_axis(MOUSE_SCROLL_WHEEL, 0.0);
        assert!(!backend.sample(KeyCode::MouseWheelUp));
        assert!(!backend.sample(KeyCode::MouseWheelDown));
    }

    #[test]
    fn test_none_is_never_pressed() {
        let mut backend = ManualBackend::new();
        backend.press(KeyCode::None);
        assert!(!backend.sample(KeyCode::None));
    }

    #[test]
    fn test_raw_and_smoothed_axes() {
        let mut backend = ManualBackend::new();
        backend.set_axis_values(HORIZONTAL, 0.3, 1.0);
        assert_eq!(backend.axis(HORIZONTAL), 0.3);
        assert_eq!(backend.axis_raw(HORIZONTAL), 1.0);
        assert_eq!(backend.axis(VERTICAL), 0.0);
    }
}
