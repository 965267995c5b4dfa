//! Key codes for physical keys and synthetic input sources

use std::fmt;
use std::str::FromStr;

use super::error::InputError;

/// Identifier for a physical key or a synthetic input source
///
/// Ordering follows declaration order and is what combination sorting and
/// conflict grouping compare. Codes outside the named set can be expressed
/// with [`KeyCode::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyCode {
    /// No key; never pressed
    None,

    // Common keys
    Backspace,
    Tab,
    Enter,
    Escape,
    Space,

    // Numbers
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,

    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Arrows
    Left,
    Right,
    Up,
    Down,

    // Navigation
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,

    // Physical modifiers
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    LeftCommand,
    RightCommand,

    // Mouse buttons
    Mouse0,
    Mouse1,
    Mouse2,

    // Composite codes, derived from other sources on every query
    AnyControl,
    AnyShift,
    AnyAlt,
    AnyCommand,
    MouseWheelUp,
    MouseWheelDown,
    MouseXUp,
    MouseXDown,
    MouseYUp,
    MouseYDown,

    /// Application-defined source outside the named set
    Custom(u16),
}

impl KeyCode {
    /// Every named code, in order
    pub const NAMED: &'static [KeyCode] = &[
        Self::None,
        Self::Backspace,
        Self::Tab,
        Self::Enter,
        Self::Escape,
        Self::Space,
        Self::Num0,
        Self::Num1,
        Self::Num2,
        Self::Num3,
        Self::Num4,
        Self::Num5,
        Self::Num6,
        Self::Num7,
        Self::Num8,
        Self::Num9,
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::O,
        Self::P,
        Self::Q,
        Self::R,
        Self::S,
        Self::T,
        Self::U,
        Self::V,
        Self::W,
        Self::X,
        Self::Y,
        Self::Z,
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::Insert,
        Self::Delete,
        Self::Home,
        Self::End,
        Self::PageUp,
        Self::PageDown,
        Self::F1,
        Self::F2,
        Self::F3,
        Self::F4,
        Self::F5,
        Self::F6,
        Self::F7,
        Self::F8,
        Self::F9,
        Self::F10,
        Self::F11,
        Self::F12,
        Self::F13,
        Self::F14,
        Self::F15,
        Self::LeftShift,
        Self::RightShift,
        Self::LeftControl,
        Self::RightControl,
        Self::LeftAlt,
        Self::RightAlt,
        Self::LeftCommand,
        Self::RightCommand,
        Self::Mouse0,
        Self::Mouse1,
        Self::Mouse2,
        Self::AnyControl,
        Self::AnyShift,
        Self::AnyAlt,
        Self::AnyCommand,
        Self::MouseWheelUp,
        Self::MouseWheelDown,
        Self::MouseXUp,
        Self::MouseXDown,
        Self::MouseYUp,
        Self::MouseYDown,
    ];

    /// Display name used in combination strings
    ///
    /// Returns `None` for [`KeyCode::Custom`], which is displayed as `Key{n}`.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::None => "None",
            Self::Backspace => "Backspace",
            Self::Tab => "Tab",
            Self::Enter => "Enter",
            Self::Escape => "Escape",
            Self::Space => "Space",
            Self::Num0 => "0",
            Self::Num1 => "1",
            Self::Num2 => "2",
            Self::Num3 => "3",
            Self::Num4 => "4",
            Self::Num5 => "5",
            Self::Num6 => "6",
            Self::Num7 => "7",
            Self::Num8 => "8",
            Self::Num9 => "9",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
            Self::J => "J",
            Self::K => "K",
            Self::L => "L",
            Self::M => "M",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::Q => "Q",
            Self::R => "R",
            Self::S => "S",
            Self::T => "T",
            Self::U => "U",
            Self::V => "V",
            Self::W => "W",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Insert => "Insert",
            Self::Delete => "Delete",
            Self::Home => "Home",
            Self::End => "End",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::F1 => "F1",
            Self::F2 => "F2",
            Self::F3 => "F3",
            Self::F4 => "F4",
            Self::F5 => "F5",
            Self::F6 => "F6",
            Self::F7 => "F7",
            Self::F8 => "F8",
            Self::F9 => "F9",
            Self::F10 => "F10",
            Self::F11 => "F11",
            Self::F12 => "F12",
            Self::F13 => "F13",
            Self::F14 => "F14",
            Self::F15 => "F15",
            Self::LeftShift => "LeftShift",
            Self::RightShift => "RightShift",
            Self::LeftControl => "LeftCtrl",
            Self::RightControl => "RightCtrl",
            Self::LeftAlt => "LeftAlt",
            Self::RightAlt => "RightAlt",
            Self::LeftCommand => "LeftCmd",
            Self::RightCommand => "RightCmd",
            Self::Mouse0 => "Mouse0",
            Self::Mouse1 => "Mouse1",
            Self::Mouse2 => "Mouse2",
            Self::AnyShift => "Shift",
            Self::AnyControl => "Ctrl",
            Self::AnyAlt => "Alt",
            Self::AnyCommand => "Cmd",
            Self::MouseWheelUp => "MouseWheelUp",
            Self::MouseWheelDown => "MouseWheelDown",
            Self::MouseXUp => "MouseXUp",
            Self::MouseXDown => "MouseXDown",
            Self::MouseYUp => "MouseYUp",
            Self::MouseYDown => "MouseYDown",
            Self::Custom(_) => return None,
        };
        Some(name)
    }

    /// Returns true for F1 through F15
    pub fn is_function_key(self) -> bool {
        (Self::F1..=Self::F15).contains(&self)
    }

    /// Returns true for either physical shift key or the composite shift
    pub fn is_shift(self) -> bool {
        matches!(self, Self::LeftShift | Self::RightShift | Self::AnyShift)
    }

    /// Returns true for codes derived from other sources rather than sampled directly
    pub fn is_composite(self) -> bool {
        (Self::AnyControl..=Self::MouseYDown).contains(&self)
    }

    /// Physical codes a composite code is the logical OR of
    ///
    /// Empty for non-composite codes and for the axis-threshold composites.
    pub fn physical_sources(self) -> &'static [KeyCode] {
        match self {
            Self::AnyShift => &[Self::LeftShift, Self::RightShift],
            Self::AnyControl => &[Self::LeftControl, Self::RightControl],
            Self::AnyAlt => &[Self::LeftAlt, Self::RightAlt],
            Self::AnyCommand => &[Self::LeftCommand, Self::RightCommand],
            _ => &[],
        }
    }

    fn from_alias(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        let code = match lower.as_str() {
            "shift" => Self::AnyShift,
            "ctrl" | "control" => Self::AnyControl,
            "alt" | "option" => Self::AnyAlt,
            "cmd" | "command" | "super" | "meta" => Self::AnyCommand,
            "esc" => Self::Escape,
            "return" => Self::Enter,
            "leftcontrol" => Self::LeftControl,
            "rightcontrol" => Self::RightControl,
            "leftcommand" => Self::LeftCommand,
            "rightcommand" => Self::RightCommand,
            "leftarrow" => Self::Left,
            "rightarrow" => Self::Right,
            "uparrow" => Self::Up,
            "downarrow" => Self::Down,
            _ => {
                let digits = lower
                    .strip_prefix("num")
                    .or_else(|| lower.strip_prefix("alpha"))?;
                match digits.parse::<u8>().ok()? {
                    0 => Self::Num0,
                    1 => Self::Num1,
                    2 => Self::Num2,
                    3 => Self::Num3,
                    4 => Self::Num4,
                    5 => Self::Num5,
                    6 => Self::Num6,
                    7 => Self::Num7,
                    8 => Self::Num8,
                    9 => Self::Num9,
                    _ => return None,
                }
            }
        };
        Some(code)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), self) {
            (Some(name), _) => f.write_str(name),
            (None, Self::Custom(id)) => write!(f, "Key{}", id),
            (None, _) => write!(f, "{:?}", self),
        }
    }
}

impl FromStr for KeyCode {
    type Err = InputError;

    /// Parses a key name case-insensitively, accepting display names and common aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(code) = Self::NAMED
            .iter()
            .copied()
            .find(|code| code.name().is_some_and(|n| n.eq_ignore_ascii_case(name)))
        {
            return Ok(code);
        }
        if let Some(code) = Self::from_alias(name) {
            return Ok(code);
        }
        if let Some(prefix) = name.get(..3)
            && prefix.eq_ignore_ascii_case("key")
            && let Ok(id) = name[3..].parse::<u16>()
        {
            return Ok(Self::Custom(id));
        }
        Err(InputError::UnknownKey(name.to_string()))
    }
}

/// Convert from a winit physical key code
impl TryFrom<winit::keyboard::KeyCode> for KeyCode {
    type Error = InputError;

    fn try_from(key: winit::keyboard::KeyCode) -> Result<Self, Self::Error> {
        use winit::keyboard::KeyCode as WK;
        let code = match key {
            WK::Backspace => Self::Backspace,
            WK::Tab => Self::Tab,
            WK::Enter | WK::NumpadEnter => Self::Enter,
            WK::Escape => Self::Escape,
            WK::Space => Self::Space,

            WK::Digit0 => Self::Num0,
            WK::Digit1 => Self::Num1,
            WK::Digit2 => Self::Num2,
            WK::Digit3 => Self::Num3,
            WK::Digit4 => Self::Num4,
            WK::Digit5 => Self::Num5,
            WK::Digit6 => Self::Num6,
            WK::Digit7 => Self::Num7,
            WK::Digit8 => Self::Num8,
            WK::Digit9 => Self::Num9,

            WK::KeyA => Self::A,
            WK::KeyB => Self::B,
            WK::KeyC => Self::C,
            WK::KeyD => Self::D,
            WK::KeyE => Self::E,
            WK::KeyF => Self::F,
            WK::KeyG => Self::G,
            WK::KeyH => Self::H,
            WK::KeyI => Self::I,
            WK::KeyJ => Self::J,
            WK::KeyK => Self::K,
            WK::KeyL => Self::L,
            WK::KeyM => Self::M,
            WK::KeyN => Self::N,
            WK::KeyO => Self::O,
            WK::KeyP => Self::P,
            WK::KeyQ => Self::Q,
            WK::KeyR => Self::R,
            WK::KeyS => Self::S,
            WK::KeyT => Self::T,
            WK::KeyU => Self::U,
            WK::KeyV => Self::V,
            WK::KeyW => Self::W,
            WK::KeyX => Self::X,
            WK::KeyY => Self::Y,
            WK::KeyZ => Self::Z,

            WK::ArrowLeft => Self::Left,
            WK::ArrowRight => Self::Right,
            WK::ArrowUp => Self::Up,
            WK::ArrowDown => Self::Down,

            WK::Insert => Self::Insert,
            WK::Delete => Self::Delete,
            WK::Home => Self::Home,
            WK::End => Self::End,
            WK::PageUp => Self::PageUp,
            WK::PageDown => Self::PageDown,

            WK::F1 => Self::F1,
            WK::F2 => Self::F2,
            WK::F3 => Self::F3,
            WK::F4 => Self::F4,
            WK::F5 => Self::F5,
            WK::F6 => Self::F6,
            WK::F7 => Self::F7,
            WK::F8 => Self::F8,
            WK::F9 => Self::F9,
            WK::F10 => Self::F10,
            WK::F11 => Self::F11,
            WK::F12 => Self::F12,
            WK::F13 => Self::F13,
            WK::F14 => Self::F14,
            WK::F15 => Self::F15,

            WK::ShiftLeft => Self::LeftShift,
            WK::ShiftRight => Self::RightShift,
            WK::ControlLeft => Self::LeftControl,
            WK::ControlRight => Self::RightControl,
            WK::AltLeft => Self::LeftAlt,
            WK::AltRight => Self::RightAlt,
            WK::SuperLeft => Self::LeftCommand,
            WK::SuperRight => Self::RightCommand,

            other => return Err(InputError::UnknownKey(format!("{:?}", other))),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        for code in KeyCode::NAMED {
            let text = code.to_string();
            assert_eq!(text.parse::<KeyCode>(), Ok(*code), "round trip of {}", text);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("f1".parse::<KeyCode>(), Ok(KeyCode::F1));
        assert_eq!("SPACE".parse::<KeyCode>(), Ok(KeyCode::Space));
        assert_eq!(" w ".parse::<KeyCode>(), Ok(KeyCode::W));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("control".parse::<KeyCode>(), Ok(KeyCode::AnyControl));
        assert_eq!("option".parse::<KeyCode>(), Ok(KeyCode::AnyAlt));
        assert_eq!("esc".parse::<KeyCode>(), Ok(KeyCode::Escape));
        assert_eq!("Alpha7".parse::<KeyCode>(), Ok(KeyCode::Num7));
        assert_eq!("num0".parse::<KeyCode>(), Ok(KeyCode::Num0));
    }

    #[test]
    fn test_custom_codes() {
        assert_eq!(KeyCode::Custom(42).to_string(), "Key42");
        assert_eq!("key42".parse::<KeyCode>(), Ok(KeyCode::Custom(42)));
        assert!(KeyCode::Custom(1) > KeyCode::MouseYDown);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            "Hyper".parse::<KeyCode>(),
            Err(InputError::UnknownKey("Hyper".to_string()))
        );
        assert!("Num12".parse::<KeyCode>().is_err());
    }

    #[test]
    fn test_classification() {
        assert!(KeyCode::F1.is_function_key());
        assert!(KeyCode::F15.is_function_key());
        assert!(!KeyCode::Escape.is_function_key());
        assert!(KeyCode::RightShift.is_shift());
        assert!(!KeyCode::AnyControl.is_shift());
        assert!(KeyCode::MouseWheelUp.is_composite());
        assert!(!KeyCode::Mouse0.is_composite());
        assert_eq!(
            KeyCode::AnyAlt.physical_sources(),
            &[KeyCode::LeftAlt, KeyCode::RightAlt]
        );
    }

    #[test]
    fn test_from_winit() {
        use winit::keyboard::KeyCode as WK;
        assert_eq!(KeyCode::try_from(WK::KeyW), Ok(KeyCode::W));
        assert_eq!(KeyCode::try_from(WK::ShiftLeft), Ok(KeyCode::LeftShift));
        assert!(KeyCode::try_from(WK::CapsLock).is_err());
    }
}
