//! Turns a stream of raw key events into [`LayoutIntent`]s.
//!
//! # How key events become intents
//!
//! The recognizer keeps the set of grid keys currently held down, the
//! timestamp of the last action it emitted, and one toggle for the centre
//! key.  For every event:
//!
//! 1. **Key-up** → the key leaves the held set (whatever the modifiers are,
//!    so a dropped event can never leave a key stuck).  Nothing is emitted.
//! 2. **Key-down without an accepted modifier profile** → ignored, no state
//!    change.
//! 3. **Key-down within the debounce window** of the last action →
//!    swallowed, no state change.  This absorbs OS key repeat.
//! 4. Otherwise the key joins the held set and:
//!    - with **two or more** keys held, the whole set is looked up in the
//!      combo tables ([`lookup_combo`]);
//!    - with **one** key held, the single-key tables decide
//!      ([`single_key`]).  Under control+option the centre key alternates
//!      between full screen and the centred half.
//!
//! Adding a key to a held chord re-evaluates the larger set, so a second,
//! different action may fire before anything is released.

use crate::grid::GridCell;
use crate::keys::{ChordProfile, KeyCodeSet, KeyEvent, KeyPhase};
use crate::layout::{lookup_combo, single_key, KeySet, LayoutPosition};
use crate::traits::Event;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Tuning knobs for chord recognition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordConfig {
    /// Minimum time between two emitted actions (ms).  Default: `100`.
    pub debounce_ms: u64,
    /// Key-code numbering of incoming events.  Default: `evdev`.
    pub key_codes: KeyCodeSet,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            key_codes: KeyCodeSet::Evdev,
        }
    }
}

/// A resolved request to move the active window into `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutIntent {
    pub position: LayoutPosition,
    /// The held keys that produced the intent; empty for direct requests.
    pub keys: KeySet,
}

impl LayoutIntent {
    /// An intent that did not come from a chord (e.g. a menu selection).
    pub fn direct(position: LayoutPosition) -> Self {
        Self {
            position,
            keys: KeySet::EMPTY,
        }
    }
}

/// Mutable recognizer state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordState {
    held: KeySet,
    last_action_ms: Option<u64>,
    /// Next solo centre press under control+option picks the centred half.
    center_toggle: bool,
    /// A multi-key combo fired since the held set was last empty.
    combo_fired: bool,
}

impl ChordState {
    pub fn held(&self) -> KeySet {
        self.held
    }

    pub fn last_action_ms(&self) -> Option<u64> {
        self.last_action_ms
    }

    pub fn centered_next(&self) -> bool {
        self.center_toggle
    }

    pub fn combo_fired(&self) -> bool {
        self.combo_fired
    }
}

/// The chord state machine.
#[derive(Debug, Clone, Default)]
pub struct ChordRecognizer {
    config: ChordConfig,
    state: ChordState,
}

impl ChordRecognizer {
    pub fn new(config: ChordConfig) -> Self {
        Self {
            config,
            state: ChordState::default(),
        }
    }

    pub fn state(&self) -> &ChordState {
        &self.state
    }

    /// Forget held keys, the debounce timer and the centre toggle.
    pub fn reset(&mut self) {
        self.state = ChordState::default();
    }

    /// Route one event from an [`EventSource`](crate::traits::EventSource).
    ///
    /// Key events go through [`handle`](Self::handle), snap requests become
    /// direct intents, and a closed connection resets the recognizer since
    /// the key-ups of its held keys will never arrive.
    pub fn on_event(&mut self, event: &Event) -> Option<LayoutIntent> {
        match event {
            Event::Key(key) => self.handle(key),
            Event::Snap(position) => Some(LayoutIntent::direct(*position)),
            Event::Disconnected => {
                if !self.state.held.is_empty() {
                    debug!("source disconnected with {:?} held", self.state.held);
                }
                self.reset();
                None
            }
        }
    }

    /// Feed one key event.  Returns the intent it resolves, if any.
    pub fn handle(&mut self, event: &KeyEvent) -> Option<LayoutIntent> {
        let cell = self.config.key_codes.cell(event.key_code)?;

        if event.phase == KeyPhase::Up {
            self.release(cell);
            return None;
        }

        let Some(profile) = ChordProfile::classify(event.modifiers) else {
            debug!("key {} with {:?}: not a chord", cell.label(), event.modifiers);
            return None;
        };

        if let Some(last) = self.state.last_action_ms {
            if event.timestamp_ms < last {
                // The source restarted its clock; the old anchor is meaningless.
                debug!("timestamp {} before last action {}, clearing debounce", event.timestamp_ms, last);
                self.state.last_action_ms = None;
            } else if event.timestamp_ms - last < self.config.debounce_ms {
                let elapsed = event.timestamp_ms - last;
                debug!("key {} debounced ({} ms after last action)", cell.label(), elapsed);
                return None;
            }
        }

        self.state.held.insert(cell);
        let held = self.state.held;

        let position = if held.len() >= 2 {
            let Some(position) = lookup_combo(held, profile.third_mode()) else {
                debug!("no combo for {:?}", held);
                return None;
            };
            if self.state.combo_fired {
                debug!("held set grew to {:?}, firing again", held);
            }
            self.state.combo_fired = true;
            position
        } else {
            self.resolve_single(cell, profile)
        };

        self.state.last_action_ms = Some(event.timestamp_ms);
        info!("keys {} -> {}", held, position);
        Some(LayoutIntent { position, keys: held })
    }

    fn resolve_single(&mut self, cell: GridCell, profile: ChordProfile) -> LayoutPosition {
        let position = single_key(cell, profile.option(), self.state.center_toggle);
        if profile.option() && cell == GridCell::Center {
            self.state.center_toggle = !self.state.center_toggle;
        }
        position
    }

    fn release(&mut self, cell: GridCell) {
        self.state.held.remove(cell);
        if self.state.held.is_empty() {
            self.state.combo_fired = false;
        }
    }
}

//  Tests
