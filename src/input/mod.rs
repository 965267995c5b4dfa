//! Input binding system
//!
//! Maps raw per-frame key and axis state onto named, prioritized bindings:
//! - Tracks press edges for every queried key code, composites included
//! - Matches key combinations (a primary key plus held modifiers)
//! - Resolves conflicts so the most specific chord on a key wins
//! - Lets a binding whose action succeeded consume its key for the frame
//! - Fires axis bindings when a sampled axis value changes
//! - Reads scripted frames for replays
//!
//! # Architecture
//!
//! ```text
//! Raw Input (winit) → WinitCollector ─┐
//!                     ManualBackend ──┤ InputBackend
//!                                     ↓
//!                               InputDispatcher
//!                          KeyStates → BindingGroups
//!                          (press / hold / release)
//!                                     ↓
//!                          KBind / AxBind callbacks
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut dispatcher = InputDispatcher::new();
//! dispatcher.add_binding(KBind::key("jump", KeyCode::Space).on_press("jump", || true));
//!
//! // In window_event()
//! collector.handle_window_event(&event);
//!
//! // Each frame, before simulation update
//! dispatcher.update(&collector);
//! collector.advance_frame(dt);
//! ```

mod axis;
mod backend;
mod bind;
mod collector;
mod combination;
mod dispatcher;
mod error;
mod events;
mod group;
mod key_code;
mod replay;
mod state;

// Re-export public API
pub use axis::{AxBind, Axis};
pub use backend::{HORIZONTAL, InputBackend, MOUSE_SCROLL_WHEEL, MOUSE_X, MOUSE_Y, ManualBackend, VERTICAL};
pub use bind::{DEFAULT_PRIORITY, KBind};
pub use collector::{DEFAULT_GRAVITY, DEFAULT_SENSITIVITY, WinitCollector};
pub use combination::{KCombination, Modifier};
pub use dispatcher::{
    Activation, AxisChange, CommandQueue, FrameReport, InputDispatcher, is_ambiguous_with_text_input,
};
pub use error::InputError;
pub use events::{AxisEvents, EventSet, ListenerId, TriggerKind};
pub use group::{BindingChange, BindingGroup, BindingId, Invocation, ResolveLogging};
pub use key_code::KeyCode;
pub use replay::{ReplayFrame, parse_script};
pub use state::{InputFrame, KState, KeyStates};
