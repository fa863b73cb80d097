//! Layout positions and the chord lookup tables.
//!
//! A [`LayoutPosition`] is a named region of the usable screen area.  Its
//! only essential attribute is its [`UnitRect`]: the region expressed as
//! exact fractions of the usable width and height, with the origin in the
//! bottom-left corner.
//!
//! The tables at the bottom of this module map held-key sets to positions.
//! They are plain static slices of `(KeySet, LayoutPosition)` pairs searched
//! linearly; a set never has more than four members.
//!
//! | Keys (no shift)   | Position                          |
//! |-------------------|-----------------------------------|
//! | two adjacent      | edge half (2/3 × 1/3 or 1/3 × 2/3) |
//! | centre + corner   | corner quarter (2/3 × 2/3)        |
//! | two opposite ends | screen half                       |
//! | corner L-shape    | screen corner (1/2 × 1/2)         |
//! | `1 3 7 9`         | full screen                       |
//!
//! With shift held, any two or three keys of one grid row or column select
//! that row or column third.  When the held set is missing from the table of
//! the active mode, the table of the other mode is tried.

use crate::grid::GridCell;
use serde::{Deserialize, Serialize};
use std::fmt;

//  Fractions

/// An exact fraction of the usable width or height.
///
/// Equality compares values, so `0/1 == 0/3`.
#[derive(Debug, Clone, Copy)]
pub struct Fraction {
    pub num: u8,
    pub den: u8,
}

impl Fraction {
    pub const ZERO: Fraction = Fraction::new(0, 1);
    pub const ONE: Fraction = Fraction::new(1, 1);
    pub const HALF: Fraction = Fraction::new(1, 2);
    pub const QUARTER: Fraction = Fraction::new(1, 4);
    pub const THIRD: Fraction = Fraction::new(1, 3);
    pub const TWO_THIRDS: Fraction = Fraction::new(2, 3);

    pub const fn new(num: u8, den: u8) -> Self {
        Self { num, den }
    }

    /// Apply the fraction to `extent`.
    ///
    /// Multiplies before dividing so that extents divisible by the
    /// denominator produce exact results.
    pub fn of(self, extent: f64) -> f64 {
        extent * f64::from(self.num) / f64::from(self.den)
    }

    /// The fraction as a float.
    pub fn value(self) -> f64 {
        self.of(1.0)
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        u16::from(self.num) * u16::from(other.den) == u16::from(other.num) * u16::from(self.den)
    }
}

impl Eq for Fraction {}

/// A rectangle in the normalised unit square (bottom-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitRect {
    pub x: Fraction,
    pub y: Fraction,
    pub width: Fraction,
    pub height: Fraction,
}

impl UnitRect {
    const fn new(x: Fraction, y: Fraction, width: Fraction, height: Fraction) -> Self {
        Self { x, y, width, height }
    }
}

/// Offset of grid line `index` (0, 1 or 2) in thirds.
const fn third_offset(index: u8) -> Fraction {
    Fraction::new(index, 3)
}

//  Positions

/// Two adjacent cells forming a 2/3 × 1/3 or 1/3 × 2/3 strip.
///
/// The first word names the row (for wide strips) or the column (for tall
/// strips), the second word the end of that line the strip sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeHalf {
    TopLeft,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomRight,
    LeftTop,
    LeftBottom,
    CenterTop,
    CenterBottom,
    RightTop,
    RightBottom,
}

impl EdgeHalf {
    pub const ALL: [EdgeHalf; 12] = [
        EdgeHalf::TopLeft,
        EdgeHalf::TopRight,
        EdgeHalf::MiddleLeft,
        EdgeHalf::MiddleRight,
        EdgeHalf::BottomLeft,
        EdgeHalf::BottomRight,
        EdgeHalf::LeftTop,
        EdgeHalf::LeftBottom,
        EdgeHalf::CenterTop,
        EdgeHalf::CenterBottom,
        EdgeHalf::RightTop,
        EdgeHalf::RightBottom,
    ];

    /// Whether the strip is wide (2/3 × 1/3) rather than tall.
    pub fn is_horizontal(self) -> bool {
        matches!(
            self,
            EdgeHalf::TopLeft
                | EdgeHalf::TopRight
                | EdgeHalf::MiddleLeft
                | EdgeHalf::MiddleRight
                | EdgeHalf::BottomLeft
                | EdgeHalf::BottomRight
        )
    }

    /// Bottom-left cell of the strip.
    fn anchor(self) -> GridCell {
        match self {
            EdgeHalf::TopLeft => GridCell::TopLeft,
            EdgeHalf::TopRight => GridCell::TopCenter,
            EdgeHalf::MiddleLeft => GridCell::MiddleLeft,
            EdgeHalf::MiddleRight => GridCell::Center,
            EdgeHalf::BottomLeft => GridCell::BottomLeft,
            EdgeHalf::BottomRight => GridCell::BottomCenter,
            EdgeHalf::LeftTop => GridCell::MiddleLeft,
            EdgeHalf::LeftBottom => GridCell::BottomLeft,
            EdgeHalf::CenterTop => GridCell::Center,
            EdgeHalf::CenterBottom => GridCell::BottomCenter,
            EdgeHalf::RightTop => GridCell::MiddleRight,
            EdgeHalf::RightBottom => GridCell::BottomRight,
        }
    }
}

/// A corner of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    fn is_right(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// An edge of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Top, Side::Bottom];
}

/// A grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Left,
    Center,
    Right,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Left, Column::Center, Column::Right];

    fn index(self) -> u8 {
        match self {
            Column::Left => 0,
            Column::Center => 1,
            Column::Right => 2,
        }
    }
}

/// A grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Row {
    Top,
    Middle,
    Bottom,
}

impl Row {
    pub const ALL: [Row; 3] = [Row::Top, Row::Middle, Row::Bottom];

    /// Row index counted from the bottom.
    fn index(self) -> u8 {
        match self {
            Row::Bottom => 0,
            Row::Middle => 1,
            Row::Top => 2,
        }
    }
}

/// Every region a window can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutPosition {
    /// One 1/3 × 1/3 cell.
    Cell(GridCell),
    EdgeHalf(EdgeHalf),
    /// A 2/3 × 2/3 block anchored at a corner.
    CornerQuarter(Corner),
    /// Exactly half of the screen.
    ScreenHalf(Side),
    /// A 1/2 × 1/2 block at a corner.
    ScreenCorner(Corner),
    FullScreen,
    /// A 1/2 × 1/2 block centred on the screen.
    CenteredHalf,
    /// 1/3 of the width, full height.
    ColumnThird(Column),
    /// Full width, 1/3 of the height.
    RowThird(Row),
}

impl LayoutPosition {
    /// Every position, in declaration order.
    pub fn all() -> Vec<LayoutPosition> {
        let mut all: Vec<LayoutPosition> = GridCell::ALL.iter().map(|&c| LayoutPosition::Cell(c)).collect();
        all.extend(EdgeHalf::ALL.iter().map(|&h| LayoutPosition::EdgeHalf(h)));
        all.extend(Corner::ALL.iter().map(|&c| LayoutPosition::CornerQuarter(c)));
        all.extend(Side::ALL.iter().map(|&s| LayoutPosition::ScreenHalf(s)));
        all.extend(Corner::ALL.iter().map(|&c| LayoutPosition::ScreenCorner(c)));
        all.push(LayoutPosition::FullScreen);
        all.push(LayoutPosition::CenteredHalf);
        all.extend(Column::ALL.iter().map(|&c| LayoutPosition::ColumnThird(c)));
        all.extend(Row::ALL.iter().map(|&r| LayoutPosition::RowThird(r)));
        all
    }

    /// The fractional rectangle of this position in the unit square.
    pub fn unit_rect(self) -> UnitRect {
        use Fraction as F;
        match self {
            LayoutPosition::Cell(cell) => UnitRect::new(
                third_offset(cell.column()),
                third_offset(cell.row()),
                F::THIRD,
                F::THIRD,
            ),
            LayoutPosition::EdgeHalf(half) => {
                let anchor = half.anchor();
                let (width, height) = if half.is_horizontal() {
                    (F::TWO_THIRDS, F::THIRD)
                } else {
                    (F::THIRD, F::TWO_THIRDS)
                };
                UnitRect::new(third_offset(anchor.column()), third_offset(anchor.row()), width, height)
            }
            LayoutPosition::CornerQuarter(corner) => UnitRect::new(
                if corner.is_right() { F::THIRD } else { F::ZERO },
                if corner.is_top() { F::THIRD } else { F::ZERO },
                F::TWO_THIRDS,
                F::TWO_THIRDS,
            ),
            LayoutPosition::ScreenHalf(side) => match side {
                Side::Left => UnitRect::new(F::ZERO, F::ZERO, F::HALF, F::ONE),
                Side::Right => UnitRect::new(F::HALF, F::ZERO, F::HALF, F::ONE),
                Side::Top => UnitRect::new(F::ZERO, F::HALF, F::ONE, F::HALF),
                Side::Bottom => UnitRect::new(F::ZERO, F::ZERO, F::ONE, F::HALF),
            },
            LayoutPosition::ScreenCorner(corner) => UnitRect::new(
                if corner.is_right() { F::HALF } else { F::ZERO },
                if corner.is_top() { F::HALF } else { F::ZERO },
                F::HALF,
                F::HALF,
            ),
            LayoutPosition::FullScreen => UnitRect::new(F::ZERO, F::ZERO, F::ONE, F::ONE),
            LayoutPosition::CenteredHalf => UnitRect::new(F::QUARTER, F::QUARTER, F::HALF, F::HALF),
            LayoutPosition::ColumnThird(column) => {
                UnitRect::new(third_offset(column.index()), F::ZERO, F::THIRD, F::ONE)
            }
            LayoutPosition::RowThird(row) => {
                UnitRect::new(F::ZERO, third_offset(row.index()), F::ONE, F::THIRD)
            }
        }
    }

    /// Whether this is a wide edge half.
    pub fn is_horizontal(self) -> bool {
        matches!(self, LayoutPosition::EdgeHalf(h) if h.is_horizontal())
    }

    /// Whether this is a column or row third.
    pub fn is_third(self) -> bool {
        matches!(self, LayoutPosition::ColumnThird(_) | LayoutPosition::RowThird(_))
    }

    /// Whether this is anchored at a screen corner (quarter or 1/2 corner).
    pub fn is_corner(self) -> bool {
        matches!(self, LayoutPosition::CornerQuarter(_) | LayoutPosition::ScreenCorner(_))
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            LayoutPosition::Cell(cell) => cell.display_name(),
            LayoutPosition::EdgeHalf(half) => match half {
                EdgeHalf::TopLeft => "Top Left Half",
                EdgeHalf::TopRight => "Top Right Half",
                EdgeHalf::MiddleLeft => "Middle Left Half",
                EdgeHalf::MiddleRight => "Middle Right Half",
                EdgeHalf::BottomLeft => "Bottom Left Half",
                EdgeHalf::BottomRight => "Bottom Right Half",
                EdgeHalf::LeftTop => "Left Top Half",
                EdgeHalf::LeftBottom => "Left Bottom Half",
                EdgeHalf::CenterTop => "Center Top Half",
                EdgeHalf::CenterBottom => "Center Bottom Half",
                EdgeHalf::RightTop => "Right Top Half",
                EdgeHalf::RightBottom => "Right Bottom Half",
            },
            LayoutPosition::CornerQuarter(corner) => match corner {
                Corner::TopLeft => "Top Left Quarter",
                Corner::TopRight => "Top Right Quarter",
                Corner::BottomLeft => "Bottom Left Quarter",
                Corner::BottomRight => "Bottom Right Quarter",
            },
            LayoutPosition::ScreenHalf(side) => match side {
                Side::Left => "Left Half",
                Side::Right => "Right Half",
                Side::Top => "Top Half",
                Side::Bottom => "Bottom Half",
            },
            LayoutPosition::ScreenCorner(corner) => match corner {
                Corner::TopLeft => "Top Left Corner",
                Corner::TopRight => "Top Right Corner",
                Corner::BottomLeft => "Bottom Left Corner",
                Corner::BottomRight => "Bottom Right Corner",
            },
            LayoutPosition::FullScreen => "Full Screen",
            LayoutPosition::CenteredHalf => "Centered Half",
            LayoutPosition::ColumnThird(column) => match column {
                Column::Left => "Left Third",
                Column::Center => "Center Third",
                Column::Right => "Right Third",
            },
            LayoutPosition::RowThird(row) => match row {
                Row::Top => "Top Third",
                Row::Middle => "Middle Third",
                Row::Bottom => "Bottom Third",
            },
        }
    }
}

impl fmt::Display for LayoutPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Parse a position name (case-insensitive; accepts "left-half",
/// "Top Left Corner", "full_screen", etc.).
pub fn parse_position(s: &str) -> Option<LayoutPosition> {
    fn normalize(s: &str) -> String {
        s.trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(|c| c.to_lowercase())
            .collect()
    }
    let wanted = normalize(s);
    LayoutPosition::all()
        .into_iter()
        .find(|p| normalize(p.display_name()) == wanted)
}

//  Key sets

/// An unordered set of grid labels.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeySet(u16);

impl KeySet {
    pub const EMPTY: KeySet = KeySet(0);

    /// Build a set from labels; labels outside `1..=9` are ignored.
    pub const fn of(labels: &[u8]) -> Self {
        let mut bits = 0u16;
        let mut i = 0;
        while i < labels.len() {
            if labels[i] >= 1 && labels[i] <= 9 {
                bits |= 1u16 << labels[i];
            }
            i += 1;
        }
        Self(bits)
    }

    /// Add a cell; returns `false` if it was already present.
    pub fn insert(&mut self, cell: GridCell) -> bool {
        let had = self.contains(cell);
        self.0 |= 1u16 << cell.label();
        !had
    }

    /// Remove a cell; returns `false` if it was absent.
    pub fn remove(&mut self, cell: GridCell) -> bool {
        let had = self.contains(cell);
        self.0 &= !(1u16 << cell.label());
        had
    }

    pub fn contains(self, cell: GridCell) -> bool {
        self.0 & (1u16 << cell.label()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_subset(self, other: KeySet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Members in label order.
    pub fn cells(self) -> impl Iterator<Item = GridCell> {
        GridCell::ALL.into_iter().filter(move |&c| self.contains(c))
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.cells().map(GridCell::label)).finish()
    }
}

impl fmt::Display for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in self.cells() {
            write!(f, "{}", cell.label())?;
        }
        Ok(())
    }
}

//  Tables

use LayoutPosition as P;

/// Multi-key combos for half / quarter / corner mode (no shift).
pub static HALF_COMBOS: &[(KeySet, LayoutPosition)] = &[
    // Wide edge halves
    (KeySet::of(&[7, 8]), P::EdgeHalf(EdgeHalf::TopLeft)),
    (KeySet::of(&[8, 9]), P::EdgeHalf(EdgeHalf::TopRight)),
    (KeySet::of(&[4, 5]), P::EdgeHalf(EdgeHalf::MiddleLeft)),
    (KeySet::of(&[5, 6]), P::EdgeHalf(EdgeHalf::MiddleRight)),
    (KeySet::of(&[1, 2]), P::EdgeHalf(EdgeHalf::BottomLeft)),
    (KeySet::of(&[2, 3]), P::EdgeHalf(EdgeHalf::BottomRight)),
    // Tall edge halves
    (KeySet::of(&[7, 4]), P::EdgeHalf(EdgeHalf::LeftTop)),
    (KeySet::of(&[4, 1]), P::EdgeHalf(EdgeHalf::LeftBottom)),
    (KeySet::of(&[8, 5]), P::EdgeHalf(EdgeHalf::CenterTop)),
    (KeySet::of(&[5, 2]), P::EdgeHalf(EdgeHalf::CenterBottom)),
    (KeySet::of(&[9, 6]), P::EdgeHalf(EdgeHalf::RightTop)),
    (KeySet::of(&[6, 3]), P::EdgeHalf(EdgeHalf::RightBottom)),
    // Corner quarters: centre plus a corner
    (KeySet::of(&[7, 5]), P::CornerQuarter(Corner::TopLeft)),
    (KeySet::of(&[9, 5]), P::CornerQuarter(Corner::TopRight)),
    (KeySet::of(&[1, 5]), P::CornerQuarter(Corner::BottomLeft)),
    (KeySet::of(&[3, 5]), P::CornerQuarter(Corner::BottomRight)),
    // Screen halves: both ends of an outer edge
    (KeySet::of(&[7, 1]), P::ScreenHalf(Side::Left)),
    (KeySet::of(&[9, 3]), P::ScreenHalf(Side::Right)),
    (KeySet::of(&[7, 9]), P::ScreenHalf(Side::Top)),
    (KeySet::of(&[1, 3]), P::ScreenHalf(Side::Bottom)),
    // Screen corners: the L of cells around a corner
    (KeySet::of(&[7, 8, 4]), P::ScreenCorner(Corner::TopLeft)),
    (KeySet::of(&[8, 9, 6]), P::ScreenCorner(Corner::TopRight)),
    (KeySet::of(&[4, 1, 2]), P::ScreenCorner(Corner::BottomLeft)),
    (KeySet::of(&[2, 3, 6]), P::ScreenCorner(Corner::BottomRight)),
    (KeySet::of(&[1, 3, 7, 9]), P::FullScreen),
];

/// Multi-key combos for third mode (shift held).
///
/// Every pair and the full triple of a row or column are aliases for the
/// same third.
pub static THIRD_COMBOS: &[(KeySet, LayoutPosition)] = &[
    (KeySet::of(&[7, 4, 1]), P::ColumnThird(Column::Left)),
    (KeySet::of(&[7, 1]), P::ColumnThird(Column::Left)),
    (KeySet::of(&[7, 4]), P::ColumnThird(Column::Left)),
    (KeySet::of(&[4, 1]), P::ColumnThird(Column::Left)),
    (KeySet::of(&[8, 5, 2]), P::ColumnThird(Column::Center)),
    (KeySet::of(&[8, 2]), P::ColumnThird(Column::Center)),
    (KeySet::of(&[8, 5]), P::ColumnThird(Column::Center)),
    (KeySet::of(&[5, 2]), P::ColumnThird(Column::Center)),
    (KeySet::of(&[9, 6, 3]), P::ColumnThird(Column::Right)),
    (KeySet::of(&[9, 3]), P::ColumnThird(Column::Right)),
    (KeySet::of(&[9, 6]), P::ColumnThird(Column::Right)),
    (KeySet::of(&[6, 3]), P::ColumnThird(Column::Right)),
    (KeySet::of(&[7, 8, 9]), P::RowThird(Row::Top)),
    (KeySet::of(&[7, 9]), P::RowThird(Row::Top)),
    (KeySet::of(&[7, 8]), P::RowThird(Row::Top)),
    (KeySet::of(&[8, 9]), P::RowThird(Row::Top)),
    (KeySet::of(&[4, 5, 6]), P::RowThird(Row::Middle)),
    (KeySet::of(&[4, 6]), P::RowThird(Row::Middle)),
    (KeySet::of(&[4, 5]), P::RowThird(Row::Middle)),
    (KeySet::of(&[5, 6]), P::RowThird(Row::Middle)),
    (KeySet::of(&[1, 2, 3]), P::RowThird(Row::Bottom)),
    (KeySet::of(&[1, 3]), P::RowThird(Row::Bottom)),
    (KeySet::of(&[1, 2]), P::RowThird(Row::Bottom)),
    (KeySet::of(&[2, 3]), P::RowThird(Row::Bottom)),
];

/// Single keys with option held, except the centre key.
static OPTION_SINGLE: &[(GridCell, LayoutPosition)] = &[
    (GridCell::TopLeft, P::ScreenCorner(Corner::TopLeft)),
    (GridCell::TopRight, P::ScreenCorner(Corner::TopRight)),
    (GridCell::BottomLeft, P::ScreenCorner(Corner::BottomLeft)),
    (GridCell::BottomRight, P::ScreenCorner(Corner::BottomRight)),
    (GridCell::MiddleLeft, P::ScreenHalf(Side::Left)),
    (GridCell::MiddleRight, P::ScreenHalf(Side::Right)),
    (GridCell::TopCenter, P::ScreenHalf(Side::Top)),
    (GridCell::BottomCenter, P::ScreenHalf(Side::Bottom)),
];

fn find(table: &[(KeySet, LayoutPosition)], held: KeySet) -> Option<LayoutPosition> {
    table.iter().find(|(keys, _)| *keys == held).map(|(_, p)| *p)
}

/// Resolve a multi-key held set.
///
/// The whole set is the lookup key; the active mode's table is consulted
/// first, then the other one.
pub fn lookup_combo(held: KeySet, third_mode: bool) -> Option<LayoutPosition> {
    let (primary, fallback) = if third_mode {
        (THIRD_COMBOS, HALF_COMBOS)
    } else {
        (HALF_COMBOS, THIRD_COMBOS)
    };
    find(primary, held).or_else(|| find(fallback, held))
}

/// Resolve a single held key.
///
/// Without option every key is its own cell.  With option the outer keys
/// select screen corners and halves and the centre key selects full screen,
/// or the centred half when `centered` is set.
pub fn single_key(cell: GridCell, option: bool, centered: bool) -> LayoutPosition {
    if !option {
        return P::Cell(cell);
    }
    if cell == GridCell::Center {
        return if centered { P::CenteredHalf } else { P::FullScreen };
    }
    OPTION_SINGLE
        .iter()
        .find(|(c, _)| *c == cell)
        .map(|(_, p)| *p)
        .unwrap_or(P::Cell(cell))
}

//  Tests
