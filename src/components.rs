use std::fmt;
use std::ops::Add;

use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Grid and spatial
// ---------------------------------------------------------------------------

/// A cell on the board. `x` is the column, `y` the row (row 0 at the top).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset from `self` to `other`.
    pub fn displacement_to(&self, other: GridPosition) -> Displacement {
        Displacement {
            dx: other.x - self.x,
            dy: other.y - self.y,
        }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add<Displacement> for GridPosition {
    type Output = GridPosition;

    fn add(self, d: Displacement) -> GridPosition {
        GridPosition {
            x: self.x + d.dx,
            y: self.y + d.dy,
        }
    }
}

/// One grid step: a unit or diagonal vector, or zero for "stay put".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Displacement {
    pub dx: i32,
    pub dy: i32,
}

impl Displacement {
    pub const ZERO: Displacement = Displacement { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    pub fn is_diagonal(&self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    /// True for the zero vector and the eight neighbour offsets.
    pub fn is_single_step(&self) -> bool {
        self.dx.abs() <= 1 && self.dy.abs() <= 1
    }
}

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

/// Cardinal direction for movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid offset for this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn displacement(&self) -> Displacement {
        let (dx, dy) = self.delta();
        Displacement { dx, dy }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Heading implied by a displacement. The horizontal component wins for
    /// diagonals; zero has no heading.
    pub fn from_displacement(d: Displacement) -> Option<Direction> {
        if d.dx > 0 {
            Some(Direction::Right)
        } else if d.dx < 0 {
            Some(Direction::Left)
        } else if d.dy > 0 {
            Some(Direction::Down)
        } else if d.dy < 0 {
            Some(Direction::Up)
        } else {
            None
        }
    }

    /// Single-letter code used in record lines.
    pub fn code(&self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    pub fn from_code(code: &str) -> Option<Direction> {
        match code {
            "U" => Some(Direction::Up),
            "D" => Some(Direction::Down),
            "L" => Some(Direction::Left),
            "R" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// A validated move waiting to be committed at the end of the turn.
/// Renderers read it to animate before the logical position changes.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingMove(pub crate::ai::PlannedMove);
