//! Scripted input for replays and tests
//!
//! A script has one frame per line. Entries are comma separated: a key name
//! is held during that frame and `Axis Name=value` sets an axis. A blank
//! line is a frame with nothing held. `#` starts a comment, and a line that
//! holds only a comment is not a frame.

use super::backend::ManualBackend;
use super::error::InputError;
use super::key_code::KeyCode;

/// Input held during one scripted frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayFrame {
    /// 1-based line the frame came from
    pub line: usize,
    pub keys: Vec<KeyCode>,
    pub axes: Vec<(String, f32)>,
}

impl ReplayFrame {
    /// Parses the entries of one line, comment already stripped
    pub fn parse(entries: &str, line: usize) -> Result<Self, InputError> {
        let mut frame = Self {
            line,
            ..Self::default()
        };
        for entry in entries.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            match entry.split_once('=') {
                Some((axis, value)) => {
                    let axis = axis.trim();
                    let value = value
                        .trim()
                        .parse::<f32>()
                        .ok()
                        .filter(|_| !axis.is_empty())
                        .ok_or_else(|| InputError::InvalidAxis(entry.to_string()))?;
                    frame.axes.push((axis.to_string(), value));
                }
                None => frame.keys.push(entry.parse()?),
            }
        }
        Ok(frame)
    }

    /// Replaces everything the backend holds with this frame's input
    pub fn apply(&self, backend: &mut ManualBackend) {
        backend.release_all();
        backend.clear_axes();
        for &key in &self.keys {
            backend.press(key);
        }
        for (axis, value) in &self.axes {
            backend.set_axis(axis.clone(), *value);
        }
    }
}

/// Parses a whole script into frames
///
/// Errors carry the 1-based line number they were found on.
pub fn parse_script(text: &str) -> Result<Vec<ReplayFrame>, InputError> {
    let mut frames = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let entries = match raw.split_once('#') {
            Some((entries, _)) if entries.trim().is_empty() => continue,
            Some((entries, _)) => entries,
            None => raw,
        };
        let frame = ReplayFrame::parse(entries, line).map_err(|source| InputError::ScriptLine {
            line,
            source: Box::new(source),
        })?;
        frames.push(frame);
    }
    Ok(frames)
}
