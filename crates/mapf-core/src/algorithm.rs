//! Search algorithm tags.

use std::fmt;

/// The three path-search strategies agents can choose between.
///
/// The declaration order is the fixed preference order: it is both the
/// fallback order after the selector's first choice fails and the tie-break
/// order when Q-values are equal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    #[default]
    AStar,
    Bfs,
    Dijkstra,
}

impl Algorithm {
    /// All algorithms in fixed preference order (`A* > BFS > Dijkstra`).
    pub const ALL: [Algorithm; 3] = [Algorithm::AStar, Algorithm::Bfs, Algorithm::Dijkstra];

    /// Index into per-algorithm arrays (Q-value tables).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Algorithm::AStar    => 0,
            Algorithm::Bfs      => 1,
            Algorithm::Dijkstra => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::AStar    => "a_star",
            Algorithm::Bfs      => "bfs",
            Algorithm::Dijkstra => "dijkstra",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
