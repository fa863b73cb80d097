//! Rectangle arithmetic: layout positions to concrete rectangles, and the
//! conversion into the coordinate space window placement expects.
//!
//! Two coordinate spaces are involved:
//!
//! * **usable space**: origin at the bottom-left, y grows upward.  The
//!   usable rectangle of a display (the area not taken by panels, bars or
//!   docks) is expressed here, and so is every rectangle the
//!   [`rectangle`] function returns.
//! * **placement space**: origin at the top-left of the *reference*
//!   (primary) display, y grows downward.  This is what a
//!   [`WindowPlacer`](crate::traits::WindowPlacer) receives.
//!
//! The x axis is shared; only y is flipped, around the top edge of the
//! reference display.

use crate::layout::LayoutPosition;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// `y + height`: the upper edge in usable space, the lower edge in
    /// placement space.
    #[inline]
    pub fn far_y(&self) -> f64 {
        self.y + self.height
    }

    /// Whether `inner` lies within `self`, allowing `eps` of slack for
    /// floating-point error.
    pub fn contains(&self, inner: &Rect, eps: f64) -> bool {
        inner.x >= self.x - eps
            && inner.y >= self.y - eps
            && inner.right() <= self.right() + eps
            && inner.far_y() <= self.far_y() + eps
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// The target display as seen at the moment of one placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenArea {
    /// Usable rectangle of the target display, in usable space.
    pub usable: Rect,
    /// Top edge of the reference display, in usable space.
    pub reference_top: f64,
}

/// Compute the rectangle `position` occupies within `usable`.
///
/// No rounding happens here; fractional pixel values are left to the
/// placement backend.
pub fn rectangle(position: LayoutPosition, usable: &Rect) -> Rect {
    let unit = position.unit_rect();
    Rect {
        x: usable.x + unit.x.of(usable.width),
        y: usable.y + unit.y.of(usable.height),
        width: unit.width.of(usable.width),
        height: unit.height.of(usable.height),
    }
}

/// Convert a usable-space rectangle into placement space.
pub fn to_placement_space(rect: &Rect, reference_top: f64) -> Rect {
    Rect {
        x: rect.x,
        y: reference_top - rect.y - rect.height,
        width: rect.width,
        height: rect.height,
    }
}

/// Inverse of [`to_placement_space`].
pub fn from_placement_space(rect: &Rect, reference_top: f64) -> Rect {
    // The flip is its own inverse.
    to_placement_space(rect, reference_top)
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridCell;
    use crate::layout::{Column, Corner, Row, Side};

    const EPS: f64 = 1e-9;

    fn usable() -> Rect {
        Rect::new(0.0, 0.0, 1200.0, 900.0)
    }

    #[test]
    fn every_position_fits_inside_usable_area() {
        let areas = [
            usable(),
            Rect::new(1920.0, -300.0, 1000.0, 700.0),
            Rect::new(13.5, 27.25, 1279.0, 773.0),
            Rect::new(0.0, 0.0, 1.0, 1.0),
        ];
        for area in &areas {
            for p in LayoutPosition::all() {
                let r = rectangle(p, area);
                assert!(r.width > 0.0 && r.height > 0.0, "{} degenerate in {:?}", p, area);
                assert!(area.contains(&r, EPS), "{} = {:?} escapes {:?}", p, r, area);
            }
        }
    }

    #[test]
    fn top_left_cell_scenario() {
        let r = rectangle(LayoutPosition::Cell(GridCell::TopLeft), &usable());
        assert_eq!(r, Rect::new(0.0, 600.0, 400.0, 300.0));
        assert_eq!(to_placement_space(&r, 900.0), Rect::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn left_half_scenario() {
        let r = rectangle(LayoutPosition::ScreenHalf(Side::Left), &usable());
        assert_eq!(r, Rect::new(0.0, 0.0, 600.0, 900.0));
        assert_eq!(to_placement_space(&r, 900.0), Rect::new(0.0, 0.0, 600.0, 900.0));
    }

    #[test]
    fn thirds_use_exact_division() {
        let area = Rect::new(0.0, 0.0, 1000.0, 700.0);
        let r = rectangle(LayoutPosition::ColumnThird(Column::Right), &area);
        assert!((r.x - 2000.0 / 3.0).abs() < EPS);
        assert!((r.width - 1000.0 / 3.0).abs() < EPS);
        assert!((r.right() - 1000.0).abs() < EPS);
        let r = rectangle(LayoutPosition::RowThird(Row::Top), &area);
        assert!((r.far_y() - 700.0).abs() < EPS);
    }

    #[test]
    fn origin_offset_is_added() {
        let area = Rect::new(100.0, 50.0, 1200.0, 900.0);
        let r = rectangle(LayoutPosition::ScreenCorner(Corner::TopRight), &area);
        assert_eq!(r, Rect::new(700.0, 500.0, 600.0, 450.0));
        let r = rectangle(LayoutPosition::CenteredHalf, &area);
        assert_eq!(r, Rect::new(400.0, 275.0, 600.0, 450.0));
    }

    #[test]
    fn conversion_on_reference_display_with_dock() {
        // Reference display 1440x900; a 70px dock at the bottom and a 25px
        // menu bar at the top leave 805px of usable height starting at y=70.
        let area = Rect::new(0.0, 70.0, 1440.0, 805.0);
        let r = rectangle(LayoutPosition::FullScreen, &area);
        let placed = to_placement_space(&r, 900.0);
        assert_eq!(placed, Rect::new(0.0, 25.0, 1440.0, 805.0));
    }

    #[test]
    fn conversion_on_secondary_display() {
        // A 1920x1080 display to the right of a 1440x900 reference display,
        // bottoms aligned; it extends 180px above the reference.
        let area = Rect::new(1440.0, 0.0, 1920.0, 1080.0);
        let r = rectangle(LayoutPosition::ScreenHalf(Side::Top), &area);
        assert_eq!(r, Rect::new(1440.0, 540.0, 1920.0, 540.0));
        let placed = to_placement_space(&r, 900.0);
        assert_eq!(placed, Rect::new(1440.0, -180.0, 1920.0, 540.0));

        // Display below the reference.
        let below = Rect::new(0.0, -768.0, 1024.0, 768.0);
        let r = rectangle(LayoutPosition::FullScreen, &below);
        assert_eq!(to_placement_space(&r, 900.0), Rect::new(0.0, 900.0, 1024.0, 768.0));
    }

    #[test]
    fn conversion_round_trips() {
        for top in [0.0, 900.0, 1080.0, -250.5] {
            for p in LayoutPosition::all() {
                let r = rectangle(p, &Rect::new(-600.0, 36.0, 1200.0, 912.0));
                let back = from_placement_space(&to_placement_space(&r, top), top);
                assert_eq!(back, r, "{} with reference top {}", p, top);
            }
        }
    }

    #[test]
    fn degenerate_detection() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(!usable().is_degenerate());
    }
}
