//! Key combinations: a primary key plus modifier keys

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::InputError;
use super::key_code::KeyCode;
use super::state::{InputFrame, KState};

/// A key that must be held alongside a combination's primary key
///
/// Compared, ordered, and hashed by its key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Modifier(pub KeyCode);

impl Modifier {
    /// The modifier's key code
    pub fn key(self) -> KeyCode {
        self.0
    }
}

impl From<KeyCode> for Modifier {
    fn from(key: KeyCode) -> Self {
        Self(key)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Primary key plus an ordered set of modifiers (a chord)
///
/// Modifiers are always sorted and never repeat a key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KCombination {
    key: KeyCode,
    modifiers: Vec<Modifier>,
}

impl KCombination {
    /// A combination of a single key with no modifiers
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Vec::new(),
        }
    }

    /// A combination of a key and any number of modifiers
    pub fn with_modifiers(key: KeyCode, modifiers: impl IntoIterator<Item = KeyCode>) -> Self {
        let mut combination = Self::new(key);
        for modifier in modifiers {
            combination.add_modifier(modifier);
        }
        combination
    }

    /// The "no key" combination
    pub fn none() -> Self {
        Self::new(KeyCode::None)
    }

    /// Returns true for the "no key" combination
    pub fn is_none(&self) -> bool {
        self.key == KeyCode::None && self.modifiers.is_empty()
    }

    /// The primary key
    pub fn key(&self) -> KeyCode {
        self.key
    }

    /// Modifiers in sorted order
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    /// Number of modifiers; more means more specific
    pub fn complexity(&self) -> usize {
        self.modifiers.len()
    }

    /// Adds a modifier, keeping the set sorted
    ///
    /// Returns false if the modifier was already present.
    pub fn add_modifier(&mut self, key: KeyCode) -> bool {
        let modifier = Modifier(key);
        match self.modifiers.binary_search(&modifier) {
            Ok(_) => false,
            Err(index) => {
                self.modifiers.insert(index, modifier);
                true
            }
        }
    }

    /// Returns true if the modifier is part of this combination
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.binary_search(&modifier).is_ok()
    }

    /// Returns true if this combination's modifier set is exactly `modifiers`
    pub fn has_modifiers(&self, modifiers: &[Modifier]) -> bool {
        self.modifiers.len() == modifiers.len()
            && modifiers.iter().all(|modifier| self.has_modifier(*modifier))
    }

    /// Pressed this frame: some participant is `Down` and none is `Released`
    ///
    /// A participant that is `Released` vetoes the chord even when another
    /// participant went down this frame.
    pub fn is_satisfied_down(&self, frame: &mut InputFrame<'_>) -> bool {
        self.is_satisfied_edge(frame, KState::Down)
    }

    /// Held: the primary key and every modifier are `Held`
    pub fn is_satisfied_held(&self, frame: &mut InputFrame<'_>) -> bool {
        let key_held = frame.is_held(self.key);
        modifiers_held(frame, &self.modifiers) && key_held
    }

    /// Released this frame: some participant is `Up` and none is `Released`
    pub fn is_satisfied_up(&self, frame: &mut InputFrame<'_>) -> bool {
        self.is_satisfied_edge(frame, KState::Up)
    }

    /// The primary key followed by every modifier
    pub fn participants(&self) -> impl Iterator<Item = KeyCode> + '_ {
        std::iter::once(self.key).chain(self.modifiers.iter().map(|modifier| modifier.key()))
    }

    // Every participant is sampled, even after a veto, so that each key's
    // edge is recorded on the frame it happens.
    fn is_satisfied_edge(&self, frame: &mut InputFrame<'_>, edge: KState) -> bool {
        let mut any_edge = false;
        let mut vetoed = false;
        for code in self.participants() {
            match frame.state(code) {
                KState::Released => vetoed = true,
                state if state == edge => any_edge = true,
                _ => {}
            }
        }
        any_edge && !vetoed
    }
}

/// Returns true if every modifier is `Held`; an empty set is always held
///
/// Samples every modifier rather than stopping at the first one not held.
pub fn modifiers_held(frame: &mut InputFrame<'_>, modifiers: &[Modifier]) -> bool {
    modifiers
        .iter()
        .fold(true, |held, modifier| frame.is_held(modifier.key()) && held)
}

/// Writes modifiers as `Ctrl+Shift+` (each followed by `+`)
pub(crate) fn write_modifier_prefix(
    f: &mut fmt::Formatter<'_>,
    modifiers: &[Modifier],
) -> fmt::Result {
    for modifier in modifiers {
        write!(f, "{}+", modifier)?;
    }
    Ok(())
}

impl Ord for KCombination {
    /// Primary key ascending, then modifiers element-wise; when one modifier
    /// list is a prefix of the other, the longer (more specific) one sorts first
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key).then_with(|| {
            self.modifiers
                .iter()
                .zip(&other.modifiers)
                .map(|(a, b)| a.cmp(b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| other.modifiers.len().cmp(&self.modifiers.len()))
        })
    }
}

impl PartialOrd for KCombination {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<KeyCode> for KCombination {
    fn from(key: KeyCode) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for KCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_modifier_prefix(f, &self.modifiers)?;
        self.key.fmt(f)
    }
}

impl FromStr for KCombination {
    type Err = InputError;

    /// Parses `"Ctrl+Shift+F1"`: the last segment is the key, the rest are modifiers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(InputError::EmptyCombination);
        }
        let mut segments = text.split('+').map(str::trim).collect::<Vec<_>>();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(InputError::EmptySegment(text.to_string()));
        }
        let key = segments
            .pop()
            .ok_or(InputError::EmptyCombination)?
            .parse::<KeyCode>()?;
        let mut combination = Self::new(key);
        for segment in segments {
            combination.add_modifier(segment.parse()?);
        }
        Ok(combination)
    }
}
