//! Straight-line patrol. Walks in its facing direction and bounces back
//! off the first cell it cannot enter.

use micromegas_tracing::prelude::*;

use crate::components::{Direction, GridPosition};
use crate::grid::GridProvider;

use super::PlannedMove;

/// The reversal is planned even when the cell behind is blocked too; the
/// game validates it and the new facing survives a rejection.
#[span_fn]
pub fn plan<G: GridProvider>(facing: Direction, at: GridPosition, grid: &G) -> PlannedMove {
    if grid.is_plain_ground(at + facing.displacement()) {
        PlannedMove::step(facing.displacement())
    } else {
        PlannedMove::heading(facing.opposite())
    }
}
