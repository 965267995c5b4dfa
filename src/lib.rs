//! Platformer Input
//!
//! Key-binding resolution for games: chords, priorities, and key consumption
//! on top of any raw input source.

/// Build-time information (version, target, timestamp, etc.)
pub mod build_info;

/// Profile configuration and configured key bindings
pub mod config;

/// Lints over a dispatcher's binding registry
pub mod diagnostics;

/// Key states, combinations, bindings, and the input dispatcher
pub mod input;

pub use config::AppConfig;
