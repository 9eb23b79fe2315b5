//! Enemy actors: a position plus the movement strategy bound at spawn.

use std::fmt;
use std::str::FromStr;

use bevy::prelude::*;
use thiserror::Error;

use crate::ai::search::StepCosts;
use crate::ai::{MovementStrategy, PlannedMove};
use crate::components::{Direction, Displacement, GridPosition};
use crate::grid::GridProvider;

// ---------------------------------------------------------------------------
// Enemy kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Shortest-path chaser.
    Smart,
    /// Greedy chaser.
    Dumb,
    /// Back-and-forth patroller.
    StraightLine,
    WallFollowing,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Smart,
        EnemyKind::Dumb,
        EnemyKind::StraightLine,
        EnemyKind::WallFollowing,
    ];

    /// Record-line code.
    pub fn code(&self) -> &'static str {
        match self {
            EnemyKind::Smart => "ST",
            EnemyKind::Dumb => "DT",
            EnemyKind::StraightLine => "SL",
            EnemyKind::WallFollowing => "WF",
        }
    }

    pub fn from_code(code: &str) -> Option<EnemyKind> {
        EnemyKind::ALL.into_iter().find(|k| k.code() == code)
    }

    pub fn identity_tag(&self) -> &'static str {
        match self {
            EnemyKind::Smart => "SmartTargetingEnemy",
            EnemyKind::Dumb => "DumbTargetingEnemy",
            EnemyKind::StraightLine => "StraightLineEnemy",
            EnemyKind::WallFollowing => "WallFollowingEnemy",
        }
    }

    pub fn art_asset_path(&self) -> String {
        format!("assets/images/{}.png", self.identity_tag())
    }

    /// Whether the record line carries a facing direction.
    pub fn has_facing(&self) -> bool {
        matches!(self, EnemyKind::StraightLine | EnemyKind::WallFollowing)
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// An enemy on the board. The strategy cannot be swapped after spawn.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    position: GridPosition,
    strategy: MovementStrategy,
}

impl Actor {
    pub fn new(position: GridPosition, strategy: MovementStrategy) -> Self {
        Self { position, strategy }
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// Teleport, e.g. on level reset. Strategy state is left alone.
    pub fn set_position(&mut self, position: GridPosition) {
        self.position = position;
    }

    pub fn strategy(&self) -> &MovementStrategy {
        &self.strategy
    }

    pub fn kind(&self) -> EnemyKind {
        match self.strategy {
            MovementStrategy::DirectChase => EnemyKind::Dumb,
            MovementStrategy::Patrol { .. } => EnemyKind::StraightLine,
            MovementStrategy::WallFollow(_) => EnemyKind::WallFollowing,
            MovementStrategy::ShortestPath { .. } => EnemyKind::Smart,
        }
    }

    pub fn identity_tag(&self) -> &'static str {
        self.kind().identity_tag()
    }

    pub fn plan<G: GridProvider>(&self, grid: &G) -> PlannedMove {
        self.strategy.plan(self.position, grid)
    }

    /// The step this actor wants to take. Repeatable until `apply_move`.
    pub fn compute_next_move<G: GridProvider>(&self, grid: &G) -> Displacement {
        self.plan(grid).displacement
    }

    /// Commit a planned (and possibly rejected) move.
    pub fn apply_move(&mut self, mv: &PlannedMove) {
        self.position = self.position + mv.displacement;
        self.strategy.commit(mv);
    }
}

/// Save-format record line.
impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Enemy {} {} {}",
            self.position.y,
            self.position.x,
            self.kind().code()
        )?;
        match self.strategy.facing() {
            Some(facing) => write!(f, " {facing}"),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record lines
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record does not start with 'Enemy': {0:?}")]
    NotAnEnemy(String),
    #[error("record is missing the {0} field")]
    MissingField(&'static str),
    #[error("invalid {field} coordinate {value:?}")]
    BadCoordinate { field: &'static str, value: String },
    #[error("unknown enemy code {0:?}")]
    UnknownCode(String),
    #[error("invalid direction {0:?}")]
    BadDirection(String),
    #[error("unexpected trailing field {0:?}")]
    TrailingField(String),
}

/// A parsed `Enemy <row> <col> <CODE> [<dir>]` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyRecord {
    pub position: GridPosition,
    pub kind: EnemyKind,
    pub facing: Option<Direction>,
}

impl EnemyRecord {
    pub fn into_actor(self, costs: StepCosts) -> Actor {
        let facing = self.facing.unwrap_or(Direction::Up);
        let strategy = match self.kind {
            EnemyKind::Smart => MovementStrategy::ShortestPath { costs },
            EnemyKind::Dumb => MovementStrategy::DirectChase,
            EnemyKind::StraightLine => MovementStrategy::patrol(facing),
            EnemyKind::WallFollowing => MovementStrategy::wall_follow(facing),
        };
        Actor::new(self.position, strategy)
    }
}

fn coordinate(field: &'static str, value: Option<&str>) -> Result<i32, RecordError> {
    let value = value.ok_or(RecordError::MissingField(field))?;
    value.parse().map_err(|_| RecordError::BadCoordinate {
        field,
        value: value.to_string(),
    })
}

impl FromStr for EnemyRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("Enemy") {
            return Err(RecordError::NotAnEnemy(line.to_string()));
        }
        let y = coordinate("row", fields.next())?;
        let x = coordinate("column", fields.next())?;
        let code = fields.next().ok_or(RecordError::MissingField("code"))?;
        let kind =
            EnemyKind::from_code(code).ok_or_else(|| RecordError::UnknownCode(code.to_string()))?;

        let facing = if kind.has_facing() {
            let dir = fields.next().ok_or(RecordError::MissingField("direction"))?;
            Some(Direction::from_code(dir).ok_or_else(|| RecordError::BadDirection(dir.to_string()))?)
        } else {
            None
        };
        if let Some(extra) = fields.next() {
            return Err(RecordError::TrailingField(extra.to_string()));
        }

        Ok(EnemyRecord {
            position: GridPosition::new(x, y),
            kind,
            facing,
        })
    }
}
