//! Read-only view of the board that movement strategies query.
//!
//! The board itself is owned by the game; strategies only need cell kinds,
//! the board extent and where the player currently stands.

use crate::components::{Displacement, GridPosition};

/// What occupies a board cell. Only `Ground` can be stepped onto by enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Ground,
    Wall,
    Door,
    Key,
    Fire,
    Water,
    Tree,
    Goal,
}

impl CellKind {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            ' ' | '.' => Some(CellKind::Ground),
            '#' => Some(CellKind::Wall),
            'D' => Some(CellKind::Door),
            'K' => Some(CellKind::Key),
            'F' => Some(CellKind::Fire),
            'W' => Some(CellKind::Water),
            'T' => Some(CellKind::Tree),
            'G' => Some(CellKind::Goal),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            CellKind::Ground => ' ',
            CellKind::Wall => '#',
            CellKind::Door => 'D',
            CellKind::Key => 'K',
            CellKind::Fire => 'F',
            CellKind::Water => 'W',
            CellKind::Tree => 'T',
            CellKind::Goal => 'G',
        }
    }

    /// Plain ground: no obstacle, door, pickup, hazard or goal marker.
    pub fn is_plain_ground(&self) -> bool {
        matches!(self, CellKind::Ground)
    }
}

/// The eight neighbour offsets in A* expansion order: the row above
/// (centre, left, right), then left and right, then the row below. The
/// order decides which of two equal-cost routes wins.
pub const NEIGHBOR_OFFSETS: [Displacement; 8] = [
    Displacement::new(0, -1),
    Displacement::new(-1, -1),
    Displacement::new(1, -1),
    Displacement::new(-1, 0),
    Displacement::new(1, 0),
    Displacement::new(0, 1),
    Displacement::new(-1, 1),
    Displacement::new(1, 1),
];

pub trait GridProvider {
    /// Cell at `pos`, or `None` when `pos` is outside the board.
    fn cell_at(&self, pos: GridPosition) -> Option<CellKind>;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn player_position(&self) -> GridPosition;

    fn in_bounds(&self, pos: GridPosition) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width() && (pos.y as usize) < self.height()
    }

    /// Out-of-bounds cells are never ground.
    fn is_plain_ground(&self, pos: GridPosition) -> bool {
        self.cell_at(pos).is_some_and(|c| c.is_plain_ground())
    }

    /// True when none of the eight cells around `pos` can be entered.
    fn is_enclosed(&self, pos: GridPosition) -> bool {
        NEIGHBOR_OFFSETS
            .iter()
            .all(|d| !self.is_plain_ground(pos + *d))
    }

    /// Whether the game should let an actor at `from` take `step`.
    fn accepts(&self, from: GridPosition, step: Displacement) -> bool {
        step.is_zero() || (step.is_single_step() && self.is_plain_ground(from + step))
    }
}
