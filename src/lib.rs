//! **splitview** snaps the active window into regions of a 3×3 grid with
//! modifier + number-key chords.
//!
//! The screen is divided like a numeric keypad: `7 8 9` on top, `1 2 3` at
//! the bottom.  Holding control + fn and pressing one number moves the
//! window into that cell; holding control + option picks corners, halves and
//! full screen instead.  Pressing several numbers together selects the
//! region they span (halves, quarters, thirds, …).
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! KeyEvent → ChordRecognizer → LayoutIntent → LayoutEngine → WindowPlacer
//! ```
//!
//! * [`chord::ChordRecognizer`] is the only stateful piece: held keys,
//!   debounce and the centre-key toggle.
//! * [`layout`] and [`geometry`] are pure: position tables, fractional
//!   rectangles and the coordinate flip.
//! * [`engine::LayoutEngine`] is generic over the [`traits::WindowPlacer`]
//!   and [`traits::ScreenProvider`] seams;
//!   [`dispatch::PlacementWorker`] runs it off the input path.
//!
//! Concrete implementations live in [`hyprland`] (Hyprland IPC) and
//! [`ipc`] (Unix-socket event listener).

pub mod chord;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod geometry;
pub mod grid;
pub mod hyprland;
pub mod ipc;
pub mod keys;
pub mod layout;
pub mod traits;
