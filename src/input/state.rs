//! Per-key press state tracking

use std::collections::HashMap;

use super::backend::InputBackend;
use super::key_code::KeyCode;

/// Press state of a single key with edge detection
///
/// `Down` and `Up` last exactly one frame; `Held` and `Released` are steady.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KState {
    #[default]
    Released,
    /// Pressed this frame (edge)
    Down,
    /// Held down (multiple frames)
    Held,
    /// Released this frame (edge)
    Up,
}

impl KState {
    /// Advance state for next frame (transitions edges to steady states)
    pub fn advance(self) -> Self {
        match self {
            Self::Down => Self::Held,
            Self::Up => Self::Released,
            state => state,
        }
    }

    /// Applies a physical sample taken this frame
    ///
    /// Only steady states react; an edge already entered this frame stays put
    /// until [`KState::advance`].
    pub fn observe(self, pressed: bool) -> Self {
        match (self, pressed) {
            (Self::Released, true) => Self::Down,
            (Self::Held, false) => Self::Up,
            (state, _) => state,
        }
    }

    /// Returns true if the key is down (just pressed or held)
    pub fn is_pressed(self) -> bool {
        matches!(self, Self::Down | Self::Held)
    }

    /// Returns true for the one-frame states
    pub fn is_edge(self) -> bool {
        matches!(self, Self::Down | Self::Up)
    }
}

/// Tracks [`KState`] for every key that has been queried
///
/// The table only holds keys that are not `Released`; a missing entry reads
/// as `Released`.
#[derive(Debug, Clone, Default)]
pub struct KeyStates {
    states: HashMap<KeyCode, KState>,
}

impl KeyStates {
    /// Creates an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Last recorded state, without sampling the backend
    pub fn current(&self, code: KeyCode) -> KState {
        self.states.get(&code).copied().unwrap_or_default()
    }

    fn set(&mut self, code: KeyCode, state: KState) {
        if state == KState::Released {
            self.states.remove(&code);
        } else {
            self.states.insert(code, state);
        }
    }

    /// Samples the key and returns its state for this frame
    pub fn state(&mut self, backend: &dyn InputBackend, code: KeyCode) -> KState {
        let pressed = backend.sample(code);
        let state = self.current(code).observe(pressed);
        self.set(code, state);
        state
    }

    /// Physical pressed state, recording any edge it implies
    pub fn get_key(&mut self, backend: &dyn InputBackend, code: KeyCode) -> bool {
        let pressed = backend.sample(code);
        let state = self.current(code).observe(pressed);
        self.set(code, state);
        pressed
    }

    /// True only during the frame the key went from released to pressed
    pub fn get_key_down(&mut self, backend: &dyn InputBackend, code: KeyCode) -> bool {
        let state = self.current(code);
        if matches!(state, KState::Held | KState::Up) {
            return false;
        }
        let pressed = backend.sample(code);
        if pressed && state == KState::Released {
            self.set(code, KState::Down);
        }
        pressed
    }

    /// True only during the frame the key went from held to released
    pub fn get_key_up(&mut self, backend: &dyn InputBackend, code: KeyCode) -> bool {
        let state = self.current(code);
        if matches!(state, KState::Released | KState::Down) {
            return false;
        }
        let pressed = backend.sample(code);
        if !pressed && state == KState::Held {
            self.set(code, KState::Up);
        }
        !pressed
    }

    /// End-of-frame step: `Down` becomes `Held`, `Up` becomes `Released`
    ///
    /// Must run exactly once per frame, after every consumer has read state.
    pub fn advance_frame(&mut self) {
        self.states.retain(|_, state| {
            *state = state.advance();
            *state != KState::Released
        });
    }

    /// Forgets every tracked key
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Number of keys not in the `Released` state
    pub fn tracked_count(&self) -> usize {
        self.states.len()
    }
}

/// Everything a binding needs to evaluate itself during one frame
///
/// Bundles the tracker with the backend it samples from.
pub struct InputFrame<'a> {
    keys: &'a mut KeyStates,
    backend: &'a dyn InputBackend,
}

impl<'a> InputFrame<'a> {
    /// Creates a frame view over a tracker and a backend
    pub fn new(keys: &'a mut KeyStates, backend: &'a dyn InputBackend) -> Self {
        Self { keys, backend }
    }

    /// State of a key this frame
    pub fn state(&mut self, code: KeyCode) -> KState {
        self.keys.state(self.backend, code)
    }

    /// Returns true if the key is in the steady `Held` state
    pub fn is_held(&mut self, code: KeyCode) -> bool {
        self.state(code) == KState::Held
    }

    /// See [`KeyStates::get_key`]
    pub fn key(&mut self, code: KeyCode) -> bool {
        self.keys.get_key(self.backend, code)
    }

    /// See [`KeyStates::get_key_down`]
    pub fn key_down(&mut self, code: KeyCode) -> bool {
        self.keys.get_key_down(self.backend, code)
    }

    /// See [`KeyStates::get_key_up`]
    pub fn key_up(&mut self, code: KeyCode) -> bool {
        self.keys.get_key_up(self.backend, code)
    }

    /// Smoothed axis value
    pub fn axis(&self, name: &str) -> f32 {
        self.backend.axis(name)
    }

    /// Unsmoothed axis value
    pub fn axis_raw(&self, name: &str) -> f32 {
        self.backend.axis_raw(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::backend::ManualBackend;

    #[test]
    fn test_state_advance() {
        assert_eq!(KState::Down.advance(), KState::Held);
        assert_eq!(KState::Up.advance(), KState::Released);
        assert_eq!(KState::Held.advance(), KState::Held);
        assert_eq!(KState::Released.advance(), KState::Released);
    }

    #[test]
    fn test_state_observe_ignores_edges() {
        assert_eq!(KState::Released.observe(true), KState::Down);
        assert_eq!(KState::Held.observe(false), KState::Up);
        assert_eq!(KState::Down.observe(false), KState::Down);
        assert_eq!(KState::Up.observe(true), KState::Up);
    }

    #[test]
    fn test_scripted_press_hold_release() {
        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        let script = [true, true, true, true, true, false, false, false];
        let mut observed = Vec::new();

        for pressed in script {
            backend.set_pressed(KeyCode::W, pressed);
            let down = keys.get_key_down(&backend, KeyCode::W);
            let up = keys.get_key_up(&backend, KeyCode::W);
            let held = keys.get_key(&backend, KeyCode::W);
            observed.push((down, held, up, keys.current(KeyCode::W)));
            keys.advance_frame();
        }

        assert_eq!(observed[0], (true, true, false, KState::Down));
        for frame in &observed[1..5] {
            assert_eq!(*frame, (false, true, false, KState::Held));
        }
        assert_eq!(observed[5], (false, false, true, KState::Up));
        for frame in &observed[6..] {
            assert_eq!(*frame, (false, false, false, KState::Released));
        }
    }

    #[test]
    fn test_repeated_queries_in_one_frame_agree() {
        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();
        backend.press(KeyCode::Space);

        assert!(keys.get_key_down(&backend, KeyCode::Space));
        assert!(keys.get_key_down(&backend, KeyCode::Space));
        assert_eq!(keys.state(&backend, KeyCode::Space), KState::Down);

        keys.advance_frame();
        assert!(!keys.get_key_down(&backend, KeyCode::Space));
        assert_eq!(keys.state(&backend, KeyCode::Space), KState::Held);
    }

    #[test]
    fn test_tap_within_one_frame_pair() {
        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();

        backend.press(KeyCode::E);
        assert_eq!(keys.state(&backend, KeyCode::E), KState::Down);
        keys.advance_frame();

        backend.release(KeyCode::E);
        assert_eq!(keys.state(&backend, KeyCode::E), KState::Up);
        keys.advance_frame();

        assert_eq!(keys.state(&backend, KeyCode::E), KState::Released);
        assert_eq!(keys.tracked_count(), 0);
    }

    #[test]
    fn test_composite_code_tracks_edges() {
        let mut backend = ManualBackend::new();
        let mut keys = KeyStates::new();

        backend.press(KeyCode::LeftShift);
        assert_eq!(keys.state(&backend, KeyCode::AnyShift), KState::Down);
        keys.advance_frame();

        backend.release(KeyCode::LeftShift);
        backend.press(KeyCode::RightShift);
        assert_eq!(keys.state(&backend, KeyCode::AnyShift), KState::Held);
    }

    #[test]
    fn test_frame_view_reads_axes() {
        let mut backend = ManualBackend::new();
        backend.set_axis_values("Horizontal", 0.5, 1.0);
        let mut keys = KeyStates::new();
        let frame = InputFrame::new(&mut keys, &backend);
        assert_eq!(frame.axis("Horizontal"), 0.5);
        assert_eq!(frame.axis_raw("Horizontal"), 1.0);
    }
}
