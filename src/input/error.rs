//! Errors raised while parsing key names, combinations, configs, and replays

use thiserror::Error;

/// Errors produced by the input core
///
/// Registering a duplicate name on a dispatcher is not an error; it is
/// reported through the return value of the registration call. Loading a
/// config that repeats a name is one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A key name did not match any known key code
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),

    /// Combination text was empty or only whitespace
    #[error("empty key combination")]
    EmptyCombination,

    /// A `+`-separated segment of a combination was empty (e.g. `"Ctrl++A"`)
    #[error("empty key segment in combination {0:?}")]
    EmptySegment(String),

    /// A configured binding did not name any keys
    #[error("binding {0:?} has no keys")]
    NoKeys(String),

    /// Two configured bindings of the same kind share a name
    #[error("binding name {0:?} is used more than once")]
    DuplicateName(String),

    /// A replay entry of the form `Axis Name=value` had no name or no number
    #[error("invalid axis entry {0:?}")]
    InvalidAxis(String),

    /// A replay script line could not be read
    #[error("replay line {line}: {source}")]
    ScriptLine {
        line: usize,
        source: Box<InputError>,
    },
}
