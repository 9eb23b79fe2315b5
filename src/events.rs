//! Turn events. `TurnAdvanced` drives the enemies; the other two report
//! what each enemy is about to do so a renderer can animate it.

use bevy::prelude::*;

use crate::components::{Displacement, GridPosition};

/// The game advanced one turn. Every enemy plans against the current board.
#[derive(Event, Debug, Clone, Copy)]
pub struct TurnAdvanced;

/// An enemy's validated move, triggered before the move is committed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyMoveScheduled {
    pub enemy: Entity,
    pub from: GridPosition,
    pub displacement: Displacement,
}

/// The board refused an enemy's planned step; it stays put this turn.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyMoveRejected {
    pub enemy: Entity,
    pub at: GridPosition,
    pub attempted: Displacement,
}
