//! The 3×3 layout grid.
//!
//! Cells are labelled like a numeric keypad: `1` is the bottom-left cell,
//! `9` the top-right one.  Rows are counted from the **bottom** because the
//! layout space has its origin in the bottom-left corner (see
//! [`geometry`](crate::geometry)).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell of the 3×3 grid, identified by its keypad label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GridCell {
    BottomLeft = 1,
    BottomCenter = 2,
    BottomRight = 3,
    MiddleLeft = 4,
    Center = 5,
    MiddleRight = 6,
    TopLeft = 7,
    TopCenter = 8,
    TopRight = 9,
}

impl GridCell {
    /// All cells in label order.
    pub const ALL: [GridCell; 9] = [
        GridCell::BottomLeft,
        GridCell::BottomCenter,
        GridCell::BottomRight,
        GridCell::MiddleLeft,
        GridCell::Center,
        GridCell::MiddleRight,
        GridCell::TopLeft,
        GridCell::TopCenter,
        GridCell::TopRight,
    ];

    /// Look up a cell by its keypad label (`1..=9`).
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            1..=9 => Some(Self::ALL[(label - 1) as usize]),
            _ => None,
        }
    }

    /// The keypad label of this cell.
    pub fn label(self) -> u8 {
        self as u8
    }

    /// Column index, `0` = left.
    pub fn column(self) -> u8 {
        (self.label() - 1) % 3
    }

    /// Row index, `0` = bottom.
    pub fn row(self) -> u8 {
        (self.label() - 1) / 3
    }

    /// Human-readable name, as shown in the menu.
    pub fn display_name(self) -> &'static str {
        match self {
            GridCell::TopLeft => "Top Left",
            GridCell::TopCenter => "Top Center",
            GridCell::TopRight => "Top Right",
            GridCell::MiddleLeft => "Middle Left",
            GridCell::Center => "Center",
            GridCell::MiddleRight => "Middle Right",
            GridCell::BottomLeft => "Bottom Left",
            GridCell::BottomCenter => "Bottom Center",
            GridCell::BottomRight => "Bottom Right",
        }
    }

    /// The chord that reaches this cell, e.g. `⌃fn7`.
    pub fn shortcut_description(self) -> String {
        format!("⌃fn{}", self.label())
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One line of the snap menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub cell: GridCell,
    pub name: &'static str,
    pub shortcut: String,
}

/// Menu entries for every single-cell position, top row first, left to
/// right within a row.
pub fn menu_entries() -> Vec<MenuEntry> {
    (0..3u8)
        .rev()
        .flat_map(|row| (0..3u8).map(move |col| row * 3 + col + 1))
        .filter_map(GridCell::from_label)
        .map(|cell| MenuEntry {
            cell,
            name: cell.display_name(),
            shortcut: cell.shortcut_description(),
        })
        .collect()
}

//  Tests
