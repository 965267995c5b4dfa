//! Raw input collection from winit events

use std::collections::HashSet;

use tracing::trace;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

use super::backend::{HORIZONTAL, InputBackend, MOUSE_SCROLL_WHEEL, MOUSE_X, MOUSE_Y, VERTICAL};
use super::key_code::KeyCode;

/// Default rate (units per second) a virtual axis moves toward its target
pub const DEFAULT_SENSITIVITY: f32 = 3.0;
/// Default rate (units per second) a virtual axis falls back to zero
pub const DEFAULT_GRAVITY: f32 = 3.0;

/// Pixels treated as one scroll line for pixel-precise wheels
const PIXELS_PER_LINE: f32 = 20.0;

/// A keyboard-driven axis with a raw value in {-1, 0, 1} and a smoothed value
#[derive(Debug, Clone)]
struct VirtualAxis {
    name: &'static str,
    negative: [KeyCode; 2],
    positive: [KeyCode; 2],
    smoothed: f32,
}

impl VirtualAxis {
    fn new(name: &'static str, negative: [KeyCode; 2], positive: [KeyCode; 2]) -> Self {
        Self {
            name,
            negative,
            positive,
            smoothed: 0.0,
        }
    }

    fn raw(&self, pressed: &HashSet<KeyCode>) -> f32 {
        let held = |keys: &[KeyCode; 2]| keys.iter().any(|key| pressed.contains(key));
        match (held(&self.negative), held(&self.positive)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Moves the smoothed value toward the raw one
    fn step(&mut self, raw: f32, dt: f32, sensitivity: f32, gravity: f32) {
        let rate = if raw == 0.0 { gravity } else { sensitivity };
        let max_delta = rate * dt;
        let delta = raw - self.smoothed;
        self.smoothed = if delta.abs() <= max_delta {
            raw
        } else {
            self.smoothed + max_delta.copysign(delta)
        };
    }
}

/// Collects raw input from winit events and serves it as an [`InputBackend`]
///
/// Feed it every `WindowEvent`, run the input dispatcher, then call
/// [`WinitCollector::advance_frame`] once per frame.
#[derive(Debug, Clone)]
pub struct WinitCollector {
    pressed: HashSet<KeyCode>,
    scale_factor: f32,
    /// Last cursor position in logical pixels
    cursor: Option<[f32; 2]>,
    /// Cursor movement this frame, y up
    mouse_delta: [f32; 2],
    /// Scroll lines this frame, positive away from the user
    scroll_delta: f32,
    axes: [VirtualAxis; 2],
    sensitivity: f32,
    gravity: f32,
}

impl WinitCollector {
    /// Creates a collector with default axis smoothing
    pub fn new() -> Self {
        Self::with_smoothing(DEFAULT_SENSITIVITY, DEFAULT_GRAVITY)
    }

    /// Creates a collector with the given virtual axis rates
    pub fn with_smoothing(sensitivity: f32, gravity: f32) -> Self {
        Self {
            pressed: HashSet::new(),
            scale_factor: 1.0,
            cursor: None,
            mouse_delta: [0.0, 0.0],
            scroll_delta: 0.0,
            axes: [
                VirtualAxis::new(HORIZONTAL, [KeyCode::A, KeyCode::Left], [KeyCode::D, KeyCode::Right]),
                VirtualAxis::new(VERTICAL, [KeyCode::S, KeyCode::Down], [KeyCode::W, KeyCode::Up]),
            ],
            sensitivity,
            gravity,
        }
    }

    /// Update scale factor (DPI scaling)
    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    /// Handle a winit window event
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    match KeyCode::try_from(code) {
                        Ok(key) => self.on_key(key, event.state == ElementState::Pressed),
                        Err(err) => trace!(?code, %err, "ignoring unmapped key"),
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let key = match button {
                    MouseButton::Left => KeyCode::Mouse0,
                    MouseButton::Right => KeyCode::Mouse1,
                    MouseButton::Middle => KeyCode::Mouse2,
                    _ => return,
                };
                self.on_key(key, *state == ElementState::Pressed);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.on_scroll(lines);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(
                    position.x as f32 / self.scale_factor,
                    position.y as f32 / self.scale_factor,
                );
            }

            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }

            WindowEvent::Focused(false) => {
                // Key-up events are lost while unfocused
                self.pressed.clear();
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_scale_factor(*scale_factor as f32);
            }

            _ => {}
        }
    }

    /// Records a key or mouse button transition
    pub fn on_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    /// Accumulates scroll in lines
    pub fn on_scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }

    /// Accumulates cursor movement from a new logical position
    pub fn on_cursor_moved(&mut self, x: f32, y: f32) {
        if let Some([last_x, last_y]) = self.cursor {
            self.mouse_delta[0] += x - last_x;
            // Window y grows downward; the axis grows upward
            self.mouse_delta[1] -= y - last_y;
        }
        self.cursor = Some([x, y]);
    }

    /// Last cursor position in logical pixels
    pub fn cursor(&self) -> Option<[f32; 2]> {
        self.cursor
    }

    /// Advance to next frame: clear per-frame deltas and step axis smoothing
    pub fn advance_frame(&mut self, dt: f32) {
        self.mouse_delta = [0.0, 0.0];
        self.scroll_delta = 0.0;
        for axis in &mut self.axes {
            let raw = axis.raw(&self.pressed);
            axis.step(raw, dt, self.sensitivity, self.gravity);
        }
    }

    fn virtual_axis(&self, name: &str) -> Option<&VirtualAxis> {
        self.axes.iter().find(|axis| axis.name == name)
    }
}

impl Default for WinitCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBackend for WinitCollector {
    fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    fn axis(&self, name: &str) -> f32 {
        match name {
            MOUSE_X => self.mouse_delta[0],
            MOUSE_Y => self.mouse_delta[1],
            MOUSE_SCROLL_WHEEL => self.scroll_delta,
            _ => self.virtual_axis(name).map_or(0.0, |axis| axis.smoothed),
        }
    }

    fn axis_raw(&self, name: &str) -> f32 {
        match self.virtual_axis(name) {
            Some(axis) => axis.raw(&self.pressed),
            None => self.axis(name),
        }
    }
}
