//! Enemy AI modules. Each enemy kind binds one movement strategy for life.

pub mod chase;
pub mod patrol;
pub mod search;
pub mod shortest_path;
pub mod wall_follow;

use crate::components::{Direction, Displacement, GridPosition};
use crate::grid::GridProvider;

use search::StepCosts;
use wall_follow::WallFollowState;

/// The outcome of asking a strategy for its next step.
///
/// Planning never mutates the actor. The facing change and redirect
/// trigger decided while planning travel with the displacement and are
/// committed together by `Actor::apply_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMove {
    pub displacement: Displacement,
    /// New heading to adopt on commit, if the strategy decided one.
    pub facing: Option<Direction>,
    /// Wall follower only: a redirect was started this turn.
    pub redirect: bool,
}

impl PlannedMove {
    pub const STAY: PlannedMove = PlannedMove {
        displacement: Displacement::ZERO,
        facing: None,
        redirect: false,
    };

    pub fn step(displacement: Displacement) -> Self {
        Self {
            displacement,
            facing: None,
            redirect: false,
        }
    }

    pub fn heading(direction: Direction) -> Self {
        Self {
            displacement: direction.displacement(),
            facing: Some(direction),
            redirect: false,
        }
    }

    /// The game refused the move. The actor stays put but still commits
    /// the facing and redirect decisions it made.
    pub fn rejected(self) -> Self {
        Self {
            displacement: Displacement::ZERO,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementStrategy {
    /// Greedy one-step chase, vertical gap first.
    DirectChase,
    /// Walk straight, bounce off walls.
    Patrol { facing: Direction },
    /// Trace the boundary of whatever obstacle is alongside.
    WallFollow(WallFollowState),
    /// A* toward the player, greedy fallback when there is no route.
    ShortestPath { costs: StepCosts },
}

impl MovementStrategy {
    pub fn patrol(facing: Direction) -> Self {
        MovementStrategy::Patrol { facing }
    }

    pub fn wall_follow(facing: Direction) -> Self {
        MovementStrategy::WallFollow(WallFollowState::new(facing))
    }

    pub fn shortest_path() -> Self {
        MovementStrategy::ShortestPath {
            costs: StepCosts::default(),
        }
    }

    /// Decide the next step for an actor at `at`. Pure: calling it twice
    /// against the same board yields the same plan.
    pub fn plan<G: GridProvider>(&self, at: GridPosition, grid: &G) -> PlannedMove {
        if grid.is_enclosed(at) {
            return PlannedMove::STAY;
        }
        match self {
            MovementStrategy::DirectChase => chase::plan(at, grid),
            MovementStrategy::Patrol { facing } => patrol::plan(*facing, at, grid),
            MovementStrategy::WallFollow(state) => wall_follow::plan(state, at, grid),
            MovementStrategy::ShortestPath { costs } => shortest_path::plan(*costs, at, grid),
        }
    }

    /// Fold a committed move into the strategy's state.
    pub fn commit(&mut self, mv: &PlannedMove) {
        match self {
            MovementStrategy::DirectChase | MovementStrategy::ShortestPath { .. } => {}
            MovementStrategy::Patrol { facing } => {
                if let Some(next) = mv.facing {
                    *facing = next;
                }
            }
            MovementStrategy::WallFollow(state) => state.commit(mv),
        }
    }

    /// Current heading, for strategies that have one.
    pub fn facing(&self) -> Option<Direction> {
        match self {
            MovementStrategy::Patrol { facing } => Some(*facing),
            MovementStrategy::WallFollow(state) => Some(state.facing),
            _ => None,
        }
    }
}
