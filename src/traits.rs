//! Core traits that decouple splitview from any specific window system or
//! input transport.
//!
//! Every concrete backend (Hyprland, a Unix-socket listener, a test harness,
//! …) implements one of these traits.  The
//! [`LayoutEngine`](crate::engine::LayoutEngine) only depends on these
//! abstractions.

use crate::geometry::{Rect, ScreenArea};
use crate::keys::KeyEvent;
use crate::layout::LayoutPosition;
use serde::{Deserialize, Serialize};
use std::sync::mpsc;

/// Something that can move and resize the frontmost window.
pub trait WindowPlacer {
    /// The error type produced by this placer.
    type Error: std::error::Error + Send + 'static;

    /// Set the frontmost window's frame to `rect`, given in placement space
    /// (origin top-left of the reference display, y down).
    ///
    /// Returns `Ok(false)` when there is no frontmost window to move.
    fn place(&self, rect: Rect) -> Result<bool, Self::Error>;
}

/// Something that knows the geometry of the display holding the frontmost
/// window.
pub trait ScreenProvider {
    type Error: std::error::Error + Send + 'static;

    /// Return the current usable area and the reference display's top edge.
    ///
    /// Called once per placement; implementations must not cache, since
    /// displays come and go.
    fn screen_area(&self) -> Result<ScreenArea, Self::Error>;
}

/// Audible (or otherwise noticeable) signal that a placement failed.
pub trait Feedback: Send {
    fn failure(&self);
}

//  Event Source

/// Input arriving from an [`EventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A raw key transition, to be fed through the chord recognizer.
    Key(KeyEvent),
    /// A direct request for a position, bypassing chord recognition.
    Snap(LayoutPosition),
    /// The client delivering key events went away; any keys it reported
    /// as held are no longer known to be down.
    Disconnected,
}

/// A source of [`Event`]s.
///
/// # Contract
///
/// * [`run`](EventSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received event must be sent through `sink` exactly once, in the
///   order it arrived.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait EventSource: Send {
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Event`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Event>) -> Result<(), Self::Error>;
}
