//! Grid coordinate type.
//!
//! `GridPos` uses `u16` row/column indices — a 65,535² grid is far beyond any
//! practical scenario while keeping the type 4 bytes and `Copy`.
//!
//! The derived `Ord` is row-major (row first, then column).  Several places
//! rely on this for determinism: heap tie-breaks in the planners and sorted
//! iteration over intent groups in the coordinator.

use std::fmt;

/// A cell coordinate on the simulation grid.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos {
    pub row: u16,
    pub col: u16,
}

impl GridPos {
    #[inline]
    pub fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Manhattan (L1) distance in cells — the A* heuristic for 4-connected
    /// grids with unit step length.
    #[inline]
    pub fn manhattan(self, other: GridPos) -> u32 {
        let dr = (self.row as i32 - other.row as i32).unsigned_abs();
        let dc = (self.col as i32 - other.col as i32).unsigned_abs();
        dr + dc
    }

    /// `true` if `other` is exactly one orthogonal step away.
    #[inline]
    pub fn is_neighbor(self, other: GridPos) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
