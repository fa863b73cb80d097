//! The composition root that turns a [`LayoutIntent`] into a placement call.
//!
//! [`LayoutEngine`] asks the [`ScreenProvider`] for the current screen area,
//! resolves the intent's position to a rectangle, converts it into
//! placement space and hands it to the [`WindowPlacer`].

use crate::chord::LayoutIntent;
use crate::geometry::{rectangle, to_placement_space, Rect};
use crate::traits::{ScreenProvider, WindowPlacer};
use log::{debug, info, warn};

/// Possible errors from the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The screen provider could not describe the target display.
    #[error("screen provider error: {0}")]
    Screen(String),
    /// The window placer failed outright.
    #[error("window placer error: {0}")]
    Placement(String),
}

/// Outcome of one successful [`LayoutEngine::apply`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// The frontmost window was moved to this placement-space rectangle.
    Placed(Rect),
    /// There was no window to move.
    NoWindow,
}

/// Places windows according to resolved intents.
///
/// Generic over the placement backend and the screen geometry source, so it
/// is independent of Hyprland or any other concrete window system.
///
/// ```ignore
/// let backend = HyprlandPlacer::new(PlacementConfig::default())?;
/// let engine = LayoutEngine::new(backend.clone(), backend);
/// engine.apply(LayoutIntent::direct(LayoutPosition::FullScreen))?;
/// ```
pub struct LayoutEngine<P: WindowPlacer, S: ScreenProvider> {
    placer: P,
    screens: S,
}

impl<P: WindowPlacer, S: ScreenProvider> LayoutEngine<P, S> {
    pub fn new(placer: P, screens: S) -> Self {
        Self { placer, screens }
    }

    pub fn placer(&self) -> &P {
        &self.placer
    }

    pub fn screens(&self) -> &S {
        &self.screens
    }

    /// Place the frontmost window according to `intent`.
    ///
    /// The screen area is fetched on every call and never cached.
    pub fn apply(&self, intent: LayoutIntent) -> Result<Placement, EngineError> {
        let area = self
            .screens
            .screen_area()
            .map_err(|e| EngineError::Screen(e.to_string()))?;

        if area.usable.is_degenerate() {
            return Err(EngineError::Screen(format!(
                "usable area {:?} is empty",
                area.usable
            )));
        }

        let usable_rect = rectangle(intent.position, &area.usable);
        let placed = to_placement_space(&usable_rect, area.reference_top);
        debug!(
            "{}: usable {:?} -> placement {:?} (reference top {})",
            intent.position, usable_rect, placed, area.reference_top
        );

        let moved = self
            .placer
            .place(placed)
            .map_err(|e| EngineError::Placement(e.to_string()))?;

        if moved {
            info!("placed window at {}", intent.position);
            Ok(Placement::Placed(placed))
        } else {
            warn!("no window to place at {}", intent.position);
            Ok(Placement::NoWindow)
        }
    }
}

//  Tests
