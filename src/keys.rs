//! Raw key events, modifier snapshots, and the key-code tables.
//!
//! This module defines the vocabulary shared by event sources and the
//! [`ChordRecognizer`](crate::chord::ChordRecognizer): a [`KeyEvent`] is
//! what an input tap delivers, [`ModifierState`] is the modifier snapshot
//! taken with it, and [`disposition`] decides whether the tap should
//! swallow the OS event or let it through.
//!
//! # Wire format
//!
//! ```json
//! {"key_code":71,"phase":"Down","modifiers":{"control":true,"option":true},"timestamp_ms":1200}
//! ```

use crate::grid::GridCell;
use crate::layout::KeySet;
use serde::{Deserialize, Serialize};

/// Whether a key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyPhase {
    Down,
    Up,
}

/// Which modifiers were held when an event was generated.
///
/// Missing fields deserialize as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierState {
    pub control: bool,
    /// Option / Alt.
    pub option: bool,
    pub command: bool,
    pub shift: bool,
    /// The secondary-function (fn / Globe) key.
    pub function: bool,
}

/// The modifier combinations the recognizer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordProfile {
    /// Control + fn: single keys select grid cells.
    ControlFunction { shift: bool },
    /// Control + option: single keys select corners, halves, full screen.
    ControlOption { shift: bool },
}

impl ChordProfile {
    /// Classify a modifier snapshot.
    ///
    /// Command disqualifies the chord, and so does holding fn and option
    /// together since the two profiles would overlap.
    pub fn classify(m: ModifierState) -> Option<Self> {
        if !m.control || m.command {
            return None;
        }
        match (m.function, m.option) {
            (true, false) => Some(ChordProfile::ControlFunction { shift: m.shift }),
            (false, true) => Some(ChordProfile::ControlOption { shift: m.shift }),
            _ => None,
        }
    }

    /// Shift selects the third tables for multi-key chords.
    pub fn third_mode(self) -> bool {
        match self {
            ChordProfile::ControlFunction { shift } | ChordProfile::ControlOption { shift } => shift,
        }
    }

    pub fn option(self) -> bool {
        matches!(self, ChordProfile::ControlOption { .. })
    }
}

/// Which key-code numbering the event source speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyCodeSet {
    /// Linux input event codes (`KEY_1`, `KEY_KP1`, …).
    #[default]
    Evdev,
    /// macOS virtual key codes.
    Mac,
}

impl KeyCodeSet {
    /// Map a key code to a grid label.  Both the number row and the numeric
    /// keypad are recognised.
    pub fn cell(self, key_code: u16) -> Option<GridCell> {
        let label = match self {
            KeyCodeSet::Evdev => match key_code {
                // Number row: KEY_1 = 2 … KEY_9 = 10
                2..=10 => key_code - 1,
                79 => 1,
                80 => 2,
                81 => 3,
                75 => 4,
                76 => 5,
                77 => 6,
                71 => 7,
                72 => 8,
                73 => 9,
                _ => return None,
            },
            KeyCodeSet::Mac => match key_code {
                83 => 1,
                84 => 2,
                85 => 3,
                86 => 4,
                87 => 5,
                88 => 6,
                89 => 7,
                91 => 8,
                92 => 9,
                18 => 1,
                19 => 2,
                20 => 3,
                21 => 4,
                23 => 5,
                22 => 6,
                26 => 7,
                28 => 8,
                25 => 9,
                _ => return None,
            },
        };
        GridCell::from_label(label as u8)
    }
}

/// A single key transition as delivered by an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key_code: u16,
    pub phase: KeyPhase,
    #[serde(default)]
    pub modifiers: ModifierState,
    /// Monotonic timestamp in milliseconds.
    pub timestamp_ms: u64,
}

/// What the input tap should do with the OS event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Swallow the event; other applications never see it.
    Consume,
    /// Forward the event unchanged.
    PassThrough,
}

/// Decide whether `event` belongs to us.
///
/// Any event on a grid key with an accepted modifier profile is consumed,
/// whether or not it ends up resolving an action.  Everything else passes
/// through.  Key-up follows the same rule.
pub fn disposition(event: &KeyEvent, key_codes: KeyCodeSet) -> Disposition {
    match (key_codes.cell(event.key_code), ChordProfile::classify(event.modifiers)) {
        (Some(_), Some(_)) => Disposition::Consume,
        _ => Disposition::PassThrough,
    }
}

/// [`disposition`] with memory, one per input-tap connection.
///
/// A key whose down event was consumed stays consumed until its up event,
/// even when the modifiers were let go first; otherwise the focused
/// application would see a key-up (or repeats) without the key-down.
#[derive(Debug, Clone, Default)]
pub struct TapFilter {
    key_codes: KeyCodeSet,
    consumed: KeySet,
}

impl TapFilter {
    pub fn new(key_codes: KeyCodeSet) -> Self {
        Self {
            key_codes,
            consumed: KeySet::EMPTY,
        }
    }

    /// Decide the disposition of `event` and remember consumed key-downs.
    pub fn decide(&mut self, event: &KeyEvent) -> Disposition {
        let base = disposition(event, self.key_codes);
        let Some(cell) = self.key_codes.cell(event.key_code) else {
            return base;
        };
        match event.phase {
            KeyPhase::Down => {
                if base == Disposition::Consume || self.consumed.contains(cell) {
                    self.consumed.insert(cell);
                    Disposition::Consume
                } else {
                    base
                }
            }
            KeyPhase::Up => {
                if self.consumed.remove(cell) {
                    Disposition::Consume
                } else {
                    base
                }
            }
        }
    }
}

//  Tests
