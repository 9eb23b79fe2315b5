//! Wall follower. Keeps an obstacle alongside by probing the diagonal
//! corners around it and turning into the gap next to a blocked corner.
//!
//! Two flags damp oscillation: a redirect started on one turn is allowed to
//! play out over the next commit before the follower may start another.

use micromegas_tracing::prelude::*;

use crate::components::{Direction, Displacement, GridPosition};
use crate::grid::GridProvider;

use super::PlannedMove;

/// Probing gives up after this many empty corners when no redirect is pending.
const PROBES_BEFORE_REDIRECT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallFollowState {
    pub facing: Direction,
    pub must_redirect: bool,
    pub has_redirected: bool,
}

impl WallFollowState {
    pub fn new(facing: Direction) -> Self {
        Self {
            facing,
            must_redirect: false,
            has_redirected: true,
        }
    }

    /// Adopt the heading of the committed step, then advance the
    /// redirect toggle.
    pub fn commit(&mut self, mv: &PlannedMove) {
        if let Some(facing) = Direction::from_displacement(mv.displacement) {
            self.facing = facing;
        }
        if mv.redirect {
            self.must_redirect = true;
            self.has_redirected = false;
        }
        if !self.has_redirected {
            self.has_redirected = true;
        } else {
            self.has_redirected = false;
            self.must_redirect = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    UpLeft,
    UpRight,
    DownRight,
    DownLeft,
}

impl Corner {
    /// First corner probed for a given heading.
    fn first_for(facing: Direction) -> Corner {
        match facing {
            Direction::Up => Corner::UpLeft,
            Direction::Right => Corner::UpRight,
            Direction::Down => Corner::DownRight,
            Direction::Left => Corner::DownLeft,
        }
    }

    fn next_clockwise(self) -> Corner {
        match self {
            Corner::UpLeft => Corner::UpRight,
            Corner::UpRight => Corner::DownRight,
            Corner::DownRight => Corner::DownLeft,
            Corner::DownLeft => Corner::UpLeft,
        }
    }

    fn horizontal(self) -> Direction {
        match self {
            Corner::UpLeft | Corner::DownLeft => Direction::Left,
            Corner::UpRight | Corner::DownRight => Direction::Right,
        }
    }

    fn vertical(self) -> Direction {
        match self {
            Corner::UpLeft | Corner::UpRight => Direction::Up,
            Corner::DownLeft | Corner::DownRight => Direction::Down,
        }
    }

    fn diagonal(self) -> Displacement {
        let (dx, _) = self.horizontal().delta();
        let (_, dy) = self.vertical().delta();
        Displacement::new(dx, dy)
    }

    /// Heading that ends the clockwise sweep after this corner.
    fn halts_when_facing(self) -> Direction {
        match self {
            Corner::UpLeft => Direction::Right,
            Corner::UpRight => Direction::Down,
            Corner::DownRight => Direction::Left,
            Corner::DownLeft => Direction::Up,
        }
    }
}

/// Preferred then fallback perpendicular when the way ahead is blocked.
fn perpendiculars(facing: Direction) -> [Direction; 2] {
    match facing {
        Direction::Up => [Direction::Left, Direction::Right],
        Direction::Down => [Direction::Right, Direction::Left],
        Direction::Right => [Direction::Down, Direction::Up],
        Direction::Left => [Direction::Up, Direction::Down],
    }
}

#[derive(Debug)]
enum Probe {
    Step(Displacement),
    /// Gave up on the corners and raised a redirect.
    Redirect,
    Exhausted,
}

/// Sweep the corners clockwise from the one matching `state.facing`.
fn probe_corners<G: GridProvider>(state: &WallFollowState, at: GridPosition, grid: &G) -> Probe {
    let facing = state.facing;
    let mut corner = Corner::first_for(facing);
    let mut checks = 0;
    loop {
        if !grid.is_plain_ground(at + corner.diagonal()) {
            let sides = if facing == corner.horizontal().opposite() {
                [corner.vertical(), corner.horizontal()]
            } else {
                [corner.horizontal(), corner.vertical()]
            };
            if let Some(side) = sides
                .into_iter()
                .find(|side| grid.is_plain_ground(at + side.displacement()))
            {
                return Probe::Step(side.displacement());
            }
        }
        checks += 1;
        if checks == PROBES_BEFORE_REDIRECT && !state.must_redirect {
            return Probe::Redirect;
        }
        if facing == corner.halts_when_facing() {
            return Probe::Exhausted;
        }
        corner = corner.next_clockwise();
    }
}

#[span_fn]
pub fn plan<G: GridProvider>(state: &WallFollowState, at: GridPosition, grid: &G) -> PlannedMove {
    let facing = state.facing;
    let forward = facing.displacement();

    if !grid.is_plain_ground(at + forward) {
        let displacement = perpendiculars(facing)
            .into_iter()
            .map(|d| d.displacement())
            .find(|d| grid.is_plain_ground(at + *d))
            .unwrap_or(facing.opposite().displacement());
        return PlannedMove {
            displacement,
            facing: None,
            redirect: true,
        };
    }

    match probe_corners(state, at, grid) {
        Probe::Step(displacement) => PlannedMove::step(displacement),
        Probe::Redirect => PlannedMove {
            displacement: forward,
            facing: None,
            redirect: true,
        },
        Probe::Exhausted => PlannedMove::step(forward),
    }
}
