//! Smart chase: follow the first step of the A* route to the player.

use micromegas_tracing::prelude::*;

use crate::components::GridPosition;
use crate::grid::GridProvider;

use super::PlannedMove;
use super::chase;
use super::search::{PathfindingEngine, StepCosts};

/// Falls back to the greedy chase step when no route exists.
#[span_fn]
pub fn plan<G: GridProvider>(costs: StepCosts, at: GridPosition, grid: &G) -> PlannedMove {
    let engine = PathfindingEngine::new(costs);
    match engine.next_step(grid, at) {
        Some(step) => PlannedMove::step(step),
        None => {
            debug!("no route from ({}, {}), chasing greedily", at.x, at.y);
            chase::plan(at, grid)
        }
    }
}
