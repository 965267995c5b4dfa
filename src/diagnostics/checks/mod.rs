//! Built-in binding checks

pub mod ambiguous;
pub mod keyless;
pub mod listeners;
pub mod text_input;

pub use ambiguous::AmbiguousBindingCheck;
pub use keyless::KeylessBindingCheck;
pub use listeners::ListenerCheck;
pub use text_input::TextInputCheck;
