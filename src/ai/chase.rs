//! Direct chase: close the vertical gap to the player first, then the
//! horizontal one. Never diagonal, never off plain ground.

use micromegas_tracing::prelude::*;

use crate::components::{Displacement, GridPosition};
use crate::grid::GridProvider;

use super::PlannedMove;

/// One greedy step toward the player, or zero when both candidate cells
/// are blocked or the actor already shares a row and column with them.
pub fn greedy_step<G: GridProvider>(at: GridPosition, grid: &G) -> Displacement {
    let player = grid.player_position();
    let dx = (player.x - at.x).signum();
    let dy = (player.y - at.y).signum();

    let vertical = Displacement::new(0, dy);
    if dy != 0 && grid.is_plain_ground(at + vertical) {
        return vertical;
    }
    let horizontal = Displacement::new(dx, 0);
    if dx != 0 && grid.is_plain_ground(at + horizontal) {
        return horizontal;
    }
    Displacement::ZERO
}

#[span_fn]
pub fn plan<G: GridProvider>(at: GridPosition, grid: &G) -> PlannedMove {
    PlannedMove::step(greedy_step(at, grid))
}
